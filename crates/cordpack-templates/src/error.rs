//! Error type for template compilation.

use std::io;
use std::path::PathBuf;

/// Errors raised while walking and compiling a template directory.
///
/// Every variant carries the path it failed on. Filesystem variants keep the
/// underlying [`io::Error`] as their source; render failures keep the
/// [`minijinja::Error`], which includes the template name and line.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template directory does not exist.
    #[error("template directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The template path exists but is not a directory.
    #[error("template path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Listing a directory (or reading an entry's metadata) failed.
    #[error("failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Source and output extensions are equal, so every template would
    /// overwrite itself.
    #[error("source and output extension are both '{extension}' for {}", path.display())]
    SameExtension { path: PathBuf, extension: String },

    /// Reading a template source file failed.
    #[error("failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a compiled output file failed.
    #[error("failed to write compiled template {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The template has a syntax error or failed during rendering.
    #[error("failed to render template {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },
}

impl TemplateError {
    /// Returns the path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            TemplateError::NotFound { path }
            | TemplateError::NotADirectory { path }
            | TemplateError::SameExtension { path, .. }
            | TemplateError::ReadDir { path, .. }
            | TemplateError::Read { path, .. }
            | TemplateError::Write { path, .. }
            | TemplateError::Render { path, .. } => path,
        }
    }

    /// True for the "template directory does not exist" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TemplateError::NotFound { .. })
    }
}
