//! Cordova CLI invocation.
//!
//! Each call spawns the tool once and waits for it:
//!
//! ```text
//! Idle -> Spawning -> Running -> Succeeded
//!                  |          -> Failed(exit status)
//!                  -> Failed(launch error)
//! ```
//!
//! There is no timeout and no retry. The child inherits stdout and stderr so
//! the Cordova output stays visible, unless [`Invoker::quiet`] is set.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::tool::ToolLocation;
use crate::types::{CordovaError, Platform, Subcommand};

/// Spawns the Cordova tool for `build` and `run`.
#[derive(Debug, Clone)]
pub struct Invoker {
    tool: ToolLocation,
    verbose: bool,
    quiet: bool,
}

impl Invoker {
    pub fn new(tool: ToolLocation) -> Self {
        Self {
            tool,
            verbose: false,
            quiet: false,
        }
    }

    /// Passes `--verbose` to Cordova.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Discards the tool's stdout and stderr.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn tool(&self) -> &ToolLocation {
        &self.tool
    }

    /// Builds the command line without running it.
    pub fn command(&self, subcommand: Subcommand, platform: &Platform, cwd: &Path) -> Command {
        let mut cmd = Command::new(self.tool.program());
        cmd.args(self.tool.leading_args())
            .arg(subcommand.as_str())
            .arg(platform.as_str())
            .current_dir(cwd);

        if self.verbose {
            cmd.arg("--verbose");
        }
        if self.quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        cmd
    }

    /// Runs `cordova <subcommand> <platform>` in `cwd` and waits for it.
    ///
    /// # Errors
    ///
    /// * [`CordovaError::Launch`] if the process cannot be spawned
    /// * [`CordovaError::Exited`] if it exits with a nonzero status
    pub fn invoke(
        &self,
        subcommand: Subcommand,
        platform: &Platform,
        cwd: &Path,
    ) -> Result<(), CordovaError> {
        let mut cmd = self.command(subcommand, platform, cwd);
        info!(
            %subcommand,
            %platform,
            cwd = %cwd.display(),
            "spawning cordova"
        );
        debug!(command = ?cmd, "cordova command line");

        let mut child = cmd.spawn().map_err(|source| CordovaError::Launch {
            program: self.tool.program().to_path_buf(),
            source,
        })?;

        let status = child.wait().map_err(|source| CordovaError::Launch {
            program: self.tool.program().to_path_buf(),
            source,
        })?;

        if !status.success() {
            warn!(%subcommand, %platform, %status, "cordova exited unsuccessfully");
            return Err(CordovaError::Exited {
                subcommand,
                platform: platform.clone(),
                status,
            });
        }

        info!(%subcommand, %platform, "cordova finished");
        Ok(())
    }
}
