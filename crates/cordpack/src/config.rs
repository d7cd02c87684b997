//! Configuration file support for cordpack.
//!
//! A `cordpack.toml` file records where an app lives, which `www/`
//! subdirectory holds its templates and how to reach the Cordova tool, so
//! callers do not have to wire those up by hand.
//!
//! ## Configuration File Location
//!
//! The file is searched for starting at a given directory and walking up
//! through its parents, stopping at a repository root (a directory containing
//! `.git`) or the filesystem root.
//!
//! ## Example Configuration
//!
//! ```toml
//! [app]
//! root = "."
//! template_path = "views"
//!
//! [tool]
//! npm_prefix = "/usr/local"
//! verbose = true
//!
//! [templates]
//! source_extension = "jinja"
//! output_extension = "tpl"
//! escape = "html"
//!
//! [templates.context]
//! title = "Field Notes"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use cordpack_templates::{Escaping, OUTPUT_EXTENSION, SOURCE_EXTENSION, TemplateCompiler};

use crate::app::CordovaApp;
use crate::invoker::Invoker;
use crate::tool::ToolLocation;

/// The default configuration file name.
pub const CONFIG_FILE_NAME: &str = "cordpack.toml";

/// Root configuration structure for `cordpack.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CordpackConfig {
    /// App location and template directory.
    pub app: AppConfig,

    /// Cordova tool location and output options.
    pub tool: ToolConfig,

    /// Template compilation settings.
    pub templates: TemplatesConfig,
}

/// App-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// App root directory. Relative paths are resolved against the directory
    /// holding the configuration file. Defaults to that directory.
    pub root: Option<PathBuf>,

    /// Template directory relative to `<root>/www`. Templates are not
    /// compiled when unset.
    pub template_path: Option<PathBuf>,
}

/// Cordova tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Explicit path to the Cordova executable. Takes precedence over
    /// `npm_prefix`.
    pub path: Option<PathBuf>,

    /// npm global prefix Cordova was installed under.
    pub npm_prefix: Option<PathBuf>,

    /// Arguments inserted before the subcommand.
    pub leading_args: Vec<String>,

    /// Pass `--verbose` to Cordova.
    pub verbose: bool,

    /// Discard Cordova's stdout and stderr.
    pub quiet: bool,
}

/// Template compilation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Extension of template sources. Defaults to `jinja`.
    pub source_extension: String,

    /// Extension of compiled outputs. Defaults to `tpl`.
    pub output_extension: String,

    /// `html` (default) or `none`; applies to templates and their includes.
    pub escape: Escaping,

    /// Values available to every template.
    pub context: toml::Table,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            source_extension: SOURCE_EXTENSION.to_string(),
            output_extension: OUTPUT_EXTENSION.to_string(),
            escape: Escaping::default(),
            context: toml::Table::new(),
        }
    }
}

impl CordpackConfig {
    /// Reads and parses one `cordpack.toml`.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: CordpackConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Looks for `cordpack.toml` in `start_dir` and its parents and returns
    /// the first one found together with its path.
    pub fn discover_from(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.is_file() {
                let config = Self::load_from_file(&config_path)?;
                return Ok(Some((config, config_path)));
            }

            if current.join(".git").exists() || !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Writes the configuration as pretty TOML.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Resolves the Cordova tool location: `path`, then `npm_prefix`, then
    /// the host default.
    pub fn tool_location(&self) -> Result<ToolLocation> {
        let tool = match (&self.tool.path, &self.tool.npm_prefix) {
            (Some(path), _) => ToolLocation::new(path),
            (None, Some(prefix)) => ToolLocation::from_npm_prefix(prefix),
            (None, None) => ToolLocation::for_host().context("Failed to locate cordova")?,
        };
        Ok(tool.with_leading_args(&self.tool.leading_args))
    }

    /// Template compiler described by the `[templates]` section.
    pub fn compiler(&self) -> TemplateCompiler {
        TemplateCompiler::new()
            .with_extensions(
                &self.templates.source_extension,
                &self.templates.output_extension,
            )
            .with_escaping(self.templates.escape)
            .with_context(&self.templates.context)
    }

    /// Builds the app this configuration describes.
    ///
    /// `config_dir` is the directory the configuration file was loaded from;
    /// a relative `app.root` is resolved against it.
    pub fn into_app(&self, config_dir: &Path) -> Result<CordovaApp> {
        let root = match &self.app.root {
            Some(root) => config_dir.join(root),
            None => config_dir.to_path_buf(),
        };

        let invoker = Invoker::new(self.tool_location()?)
            .verbose(self.tool.verbose)
            .quiet(self.tool.quiet);

        let mut app = CordovaApp::with_invoker(root, invoker).with_compiler(self.compiler());
        if let Some(template_path) = &self.app.template_path {
            app.set_template_path(template_path);
        }
        Ok(app)
    }

    /// Finds `cordpack.toml` from `start_dir` upward and builds its app.
    pub fn discover_app(start_dir: &Path) -> Result<Option<CordovaApp>> {
        match Self::discover_from(start_dir)? {
            Some((config, path)) => {
                let config_dir = path.parent().unwrap_or(start_dir);
                Ok(Some(config.into_app(config_dir)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CordpackConfig::default();
        assert_eq!(config.templates.source_extension, "jinja");
        assert_eq!(config.templates.output_extension, "tpl");
        assert_eq!(config.templates.escape, Escaping::Html);
        assert!(config.app.template_path.is_none());
        assert!(!config.tool.verbose);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);

        let toml_content = r#"
[app]
root = "mobile"
template_path = "views"

[tool]
path = "/opt/cordova/bin/cordova"
verbose = true

[templates]
source_extension = "j2"
escape = "none"

[templates.context]
title = "Field Notes"
"#;
        std::fs::write(&config_path, toml_content).unwrap();

        let config = CordpackConfig::load_from_file(&config_path).unwrap();

        assert_eq!(config.app.root, Some(PathBuf::from("mobile")));
        assert_eq!(config.app.template_path, Some(PathBuf::from("views")));
        assert_eq!(
            config.tool.path,
            Some(PathBuf::from("/opt/cordova/bin/cordova"))
        );
        assert!(config.tool.verbose);
        assert_eq!(config.templates.source_extension, "j2");
        assert_eq!(config.templates.output_extension, "tpl");
        assert_eq!(config.templates.escape, Escaping::None);
        assert_eq!(config.compiler().escaping(), Escaping::None);
        assert_eq!(
            config.templates.context.get("title").and_then(|v| v.as_str()),
            Some("Field Notes")
        );
    }

    #[test]
    fn test_parse_error_mentions_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "[app\nroot = 1").unwrap();

        let err = CordpackConfig::load_from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("www/views");
        std::fs::create_dir_all(&nested).unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "[app]\ntemplate_path = \"views\"\n").unwrap();

        let (config, path) = CordpackConfig::discover_from(&nested).unwrap().unwrap();

        assert_eq!(path, config_path);
        assert_eq!(config.app.template_path, Some(PathBuf::from("views")));
    }

    #[test]
    fn test_discover_no_config() {
        let temp_dir = TempDir::new().unwrap();
        // Create a .git directory to stop the search
        std::fs::create_dir(temp_dir.path().join(".git")).unwrap();

        let result = CordpackConfig::discover_from(temp_dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        let mut config = CordpackConfig::default();
        config.app.template_path = Some(PathBuf::from("tpl"));
        config.tool.npm_prefix = Some(PathBuf::from("/usr/local"));

        config.save_to_file(&config_path).unwrap();
        let reloaded = CordpackConfig::load_from_file(&config_path).unwrap();

        assert_eq!(reloaded.app.template_path, Some(PathBuf::from("tpl")));
        assert_eq!(reloaded.tool.npm_prefix, Some(PathBuf::from("/usr/local")));
    }

    #[test]
    fn test_tool_path_beats_npm_prefix() {
        let mut config = CordpackConfig::default();
        config.tool.path = Some(PathBuf::from("/opt/cordova"));
        config.tool.npm_prefix = Some(PathBuf::from("/usr/local"));
        config.tool.leading_args = vec!["--no-telemetry".to_string()];

        let tool = config.tool_location().unwrap();

        assert_eq!(tool.program(), Path::new("/opt/cordova"));
        assert_eq!(tool.leading_args().len(), 1);
    }

    #[test]
    fn test_into_app_resolves_paths() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = CordpackConfig::default();
        config.app.root = Some(PathBuf::from("mobile"));
        config.app.template_path = Some(PathBuf::from("views"));
        config.tool.path = Some(PathBuf::from("/opt/cordova"));

        let app = config.into_app(temp_dir.path()).unwrap();

        assert_eq!(app.root(), temp_dir.path().join("mobile"));
        assert_eq!(
            app.template_dir(),
            Some(temp_dir.path().join("mobile/www/views").as_path())
        );
        assert_eq!(app.invoker().tool().program(), Path::new("/opt/cordova"));
    }

    #[test]
    fn test_context_reaches_templates() {
        let temp_dir = TempDir::new().unwrap();
        let views = temp_dir.path().join("www/views");
        std::fs::create_dir_all(&views).unwrap();
        std::fs::write(views.join("title.jinja"), "{{ title }}").unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[app]\ntemplate_path = \"views\"\n\n[tool]\npath = \"/opt/cordova\"\n\n[templates.context]\ntitle = \"Field Notes\"\n",
        )
        .unwrap();

        let app = CordpackConfig::discover_app(temp_dir.path())
            .unwrap()
            .unwrap();
        let summary = app.compile_templates().unwrap();

        assert_eq!(summary.len(), 1);
        assert_eq!(
            std::fs::read_to_string(views.join("title.tpl")).unwrap(),
            "Field Notes"
        );
    }
}
