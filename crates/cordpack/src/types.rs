//! Core types for cordpack.
//!
//! - [`CordovaError`] - Error type for every app operation
//! - [`Platform`] - Cordova platform name passed to the tool
//! - [`Subcommand`] - `build` or `run`

use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

use cordpack_templates::TemplateError;

/// Error types for cordpack operations.
///
/// Each `build` or `run` call yields exactly one of these on failure. A
/// template failure means the Cordova tool was never started.
///
/// # Example
///
/// ```ignore
/// use cordpack::{CordovaApp, CordovaError};
///
/// match app.build() {
///     Ok(()) => println!("built"),
///     Err(CordovaError::Exited { status, .. }) => eprintln!("cordova failed: {status}"),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CordovaError {
    /// Template compilation failed before the tool was invoked.
    #[error("template compilation failed: {0}")]
    Template(#[from] TemplateError),

    /// The Cordova executable could not be started.
    ///
    /// Usually the tool is not installed at the resolved location.
    #[error("failed to launch {}: {source}. Check that cordova is installed", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The Cordova process ran and exited unsuccessfully.
    #[error("cordova {subcommand} {platform} failed ({status})")]
    Exited {
        subcommand: Subcommand,
        platform: Platform,
        status: ExitStatus,
    },

    /// The tool location could not be resolved from the host environment.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CordovaError {
    /// Exit code of a failed tool run, if the process exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CordovaError::Exited { status, .. } => status.code(),
            _ => None,
        }
    }
}

/// Cordova platform name, such as `android` or `ios`.
///
/// The name is handed to the tool as-is. [`Platform::default`] is
/// `android`.
///
/// ```
/// use cordpack::Platform;
///
/// assert_eq!(Platform::default().as_str(), "android");
/// assert_eq!(Platform::from("ios").as_str(), "ios");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform(String);

impl Platform {
    pub const ANDROID: &'static str = "android";
    pub const IOS: &'static str = "ios";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new(Self::ANDROID)
    }
}

impl From<&str> for Platform {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Platform {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cordova CLI subcommand issued by the invoker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    /// `cordova build <platform>`
    Build,
    /// `cordova run <platform>`
    Run,
}

impl Subcommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subcommand::Build => "build",
            Subcommand::Run => "run",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
