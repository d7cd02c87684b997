//! Location of the Cordova executable.
//!
//! The location is resolved once and handed to the [`crate::Invoker`]; nothing
//! reads the environment while a build is running.
//!
//! Host defaults:
//!
//! | Host | Executable |
//! |------|------------|
//! | Windows | `%APPDATA%\npm\node_modules\cordova\bin\cordova.cmd` |
//! | other | `cordova`, looked up on `PATH` |

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::types::CordovaError;

/// Executable name used when the tool is looked up on `PATH`.
pub const CORDOVA_BIN: &str = "cordova";

/// Program (plus leading arguments) that is spawned for every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLocation {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl ToolLocation {
    /// Uses `program` directly.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before the subcommand, e.g. the script path when the
    /// program is `node`.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Cordova installed globally with npm under `prefix`.
    ///
    /// npm puts global packages in `<prefix>/node_modules` on Windows and in
    /// `<prefix>/lib/node_modules` elsewhere.
    pub fn from_npm_prefix(prefix: impl AsRef<Path>) -> Self {
        let prefix = prefix.as_ref();
        if cfg!(windows) {
            Self::new(
                prefix
                    .join("node_modules")
                    .join("cordova")
                    .join("bin")
                    .join("cordova.cmd"),
            )
        } else {
            Self::new(
                prefix
                    .join("lib")
                    .join("node_modules")
                    .join("cordova")
                    .join("bin")
                    .join(CORDOVA_BIN),
            )
        }
    }

    /// Resolves the default location for the host.
    ///
    /// # Errors
    ///
    /// On Windows, returns [`CordovaError::Config`] when `APPDATA` is unset.
    pub fn for_host() -> Result<Self, CordovaError> {
        if cfg!(windows) {
            let appdata = env::var_os("APPDATA").ok_or_else(|| {
                CordovaError::Config(
                    "APPDATA is not set; cannot locate the npm-installed cordova.cmd.\n\
                     Set [tool] path in cordpack.toml or pass an explicit ToolLocation."
                        .to_string(),
                )
            })?;
            Ok(Self::from_npm_prefix(PathBuf::from(appdata).join("npm")))
        } else {
            Ok(Self::new(CORDOVA_BIN))
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn leading_args(&self) -> &[OsString] {
        &self.leading_args
    }
}
