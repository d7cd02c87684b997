//! Recursive template compilation.
//!
//! [`TemplateCompiler`] walks a directory tree and renders every file that
//! carries the source extension into a sibling file with the output
//! extension:
//!
//! ```text
//! www/views/index.jinja        ->  www/views/index.tpl
//! www/views/parts/nav.jinja    ->  www/views/parts/nav.tpl
//! www/views/app.css            (untouched)
//! ```
//!
//! The walk is sequential and fail-fast: the first listing, read, render or
//! write failure stops it and is returned. Outputs written before the failure
//! stay on disk.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::Value;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::TemplateError;
use crate::render::{Escaping, render_source};

/// Default extension of template sources.
pub const SOURCE_EXTENSION: &str = "jinja";

/// Default extension of compiled output files.
pub const OUTPUT_EXTENSION: &str = "tpl";

/// Compiles template sources found under a directory tree.
#[derive(Debug, Clone)]
pub struct TemplateCompiler {
    source_extension: String,
    output_extension: String,
    context: Value,
    escaping: Escaping,
}

impl Default for TemplateCompiler {
    fn default() -> Self {
        Self {
            source_extension: SOURCE_EXTENSION.to_string(),
            output_extension: OUTPUT_EXTENSION.to_string(),
            context: minijinja::context! {},
            escaping: Escaping::default(),
        }
    }
}

impl TemplateCompiler {
    /// Creates a compiler using the default `jinja` -> `tpl` mapping, HTML
    /// escaping and an empty render context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the source and output extensions.
    ///
    /// Extensions are given without the leading dot. A leading dot is
    /// tolerated and stripped. Equal extensions are rejected when compiling.
    pub fn with_extensions(
        mut self,
        source_extension: impl Into<String>,
        output_extension: impl Into<String>,
    ) -> Self {
        self.source_extension = strip_dot(source_extension.into());
        self.output_extension = strip_dot(output_extension.into());
        self
    }

    /// Sets the values every template is rendered with.
    pub fn with_context<S: Serialize>(mut self, context: S) -> Self {
        self.context = Value::from_serialize(context);
        self
    }

    /// Sets the escaping applied to every template and its includes.
    pub fn with_escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    pub fn escaping(&self) -> Escaping {
        self.escaping
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    pub fn output_extension(&self) -> &str {
        &self.output_extension
    }

    /// Returns true if `path` names a template source.
    pub fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == self.source_extension.as_str())
    }

    /// Returns the sibling output path for a template source.
    ///
    /// `views/index.jinja` maps to `views/index.tpl`; only the last
    /// extension is replaced, so `mail.en.jinja` maps to `mail.en.tpl`.
    pub fn output_path_for(&self, source: &Path) -> PathBuf {
        source.with_extension(&self.output_extension)
    }

    /// Compiles every template source below `dir`.
    ///
    /// # Errors
    ///
    /// * [`TemplateError::NotFound`] if `dir` does not exist
    /// * [`TemplateError::NotADirectory`] if `dir` is a file
    /// * [`TemplateError::SameExtension`] if sources would overwrite themselves
    /// * the first filesystem or render error met during the walk
    ///
    /// Includes are resolved against `dir`; a template may reach any file
    /// below it, including through `../`, but nothing outside it.
    pub fn compile_dir(&self, dir: &Path) -> Result<CompileSummary, TemplateError> {
        self.check_extensions(dir)?;

        let metadata = match fs::metadata(dir) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TemplateError::NotFound {
                    path: dir.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(TemplateError::ReadDir {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        };
        if !metadata.is_dir() {
            return Err(TemplateError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        info!(dir = %dir.display(), extension = %self.source_extension, "compiling templates");
        let mut summary = CompileSummary::default();
        self.walk(dir, dir, &mut summary)?;
        info!(
            dir = %dir.display(),
            compiled = summary.len(),
            "template compilation finished"
        );
        Ok(summary)
    }

    /// Compiles a single template source and returns the output path.
    ///
    /// Includes are resolved against the file's own directory.
    pub fn compile_file(&self, path: &Path) -> Result<PathBuf, TemplateError> {
        self.check_extensions(path)?;
        let root = path.parent().unwrap_or(Path::new(""));
        self.compile_below(root, path)
    }

    fn check_extensions(&self, path: &Path) -> Result<(), TemplateError> {
        if self.source_extension == self.output_extension {
            return Err(TemplateError::SameExtension {
                path: path.to_path_buf(),
                extension: self.source_extension.clone(),
            });
        }
        Ok(())
    }

    fn compile_below(&self, root: &Path, path: &Path) -> Result<PathBuf, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let markup = render_source(root, path, &source, &self.context, self.escaping).map_err(
            |source| TemplateError::Render {
                path: path.to_path_buf(),
                source,
            },
        )?;

        let output = self.output_path_for(path);
        fs::write(&output, markup).map_err(|source| TemplateError::Write {
            path: output.clone(),
            source,
        })?;

        debug!(source = %path.display(), output = %output.display(), "compiled template");
        Ok(output)
    }

    fn walk(
        &self,
        root: &Path,
        dir: &Path,
        summary: &mut CompileSummary,
    ) -> Result<(), TemplateError> {
        let read_dir_err = |source| TemplateError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir)
            .map_err(read_dir_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_dir_err)?;
        entries.sort();

        for path in entries {
            // Follows symlinks, so linked directories are walked too.
            let metadata = fs::metadata(&path).map_err(|source| TemplateError::ReadDir {
                path: path.clone(),
                source,
            })?;

            if metadata.is_dir() {
                self.walk(root, &path, summary)?;
            } else if self.is_source(&path) {
                let output = self.compile_below(root, &path)?;
                summary.outputs.push(output);
            }
        }

        Ok(())
    }
}

fn strip_dot(ext: String) -> String {
    match ext.strip_prefix('.') {
        Some(stripped) => stripped.to_string(),
        None => ext,
    }
}

/// Outputs written by a successful [`TemplateCompiler::compile_dir`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileSummary {
    /// Output files in the order they were written.
    pub outputs: Vec<PathBuf>,
}

impl CompileSummary {
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
