//! Cordova app packaging for Rust
//!
//! `cordpack` prepares and builds Cordova apps. It compiles Jinja-style
//! templates that live in the app's `www/` directory into markup the app
//! loads at runtime, then hands the app to the Cordova CLI to build or run
//! it for a platform.
//!
//! # Quick Start
//!
//! ```ignore
//! use cordpack::{CordovaApp, Platform};
//!
//! fn main() -> Result<(), cordpack::CordovaError> {
//!     let app = CordovaApp::new("my-app")?.with_template_path("views");
//!
//!     // www/views/**/*.jinja -> *.tpl, then `cordova build android`
//!     app.build()?;
//!
//!     // `cordova run ios`
//!     app.run_for(&Platform::from("ios"))?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **App**: [`CordovaApp`], the root path plus the template directory
//! - **Templates**: [`cordpack_templates::TemplateCompiler`] walks and renders the template tree
//! - **Invoker**: [`Invoker`] spawns the Cordova tool and maps its exit status
//! - **Tool**: [`ToolLocation`], where the Cordova executable is found
//! - **Config**: [`CordpackConfig`], optional `cordpack.toml` settings
//!
//! The crate logs through [`tracing`] and never installs a subscriber.

pub mod app;
pub mod config;
pub mod invoker;
pub mod tool;
pub mod types;

pub use app::{ASSET_DIR, CordovaApp};
pub use config::{CONFIG_FILE_NAME, CordpackConfig};
pub use invoker::Invoker;
pub use tool::ToolLocation;
pub use types::{CordovaError, Platform, Subcommand};

pub use cordpack_templates::{CompileSummary, Escaping, TemplateCompiler, TemplateError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
