//! Template compilation for Cordova apps.
//!
//! `cordpack-templates` turns Jinja-style template sources that live inside an
//! app's `www/` directory into plain markup files the app loads at runtime.
//! Templates are rendered with [`minijinja`] using HTML escaping by default;
//! includes are resolved relative to the template being rendered.
//!
//! # Example
//!
//! ```no_run
//! use cordpack_templates::TemplateCompiler;
//! use std::path::Path;
//!
//! let summary = TemplateCompiler::new()
//!     .with_context(std::collections::BTreeMap::from([("title", "My App")]))
//!     .compile_dir(Path::new("my-app/www/views"))?;
//!
//! println!("compiled {} templates", summary.len());
//! # Ok::<(), cordpack_templates::TemplateError>(())
//! ```

pub mod compiler;
pub mod error;
mod render;

pub use compiler::{CompileSummary, OUTPUT_EXTENSION, SOURCE_EXTENSION, TemplateCompiler};
pub use error::TemplateError;
pub use render::Escaping;
