//! The Cordova app descriptor and its operations.

use std::path::{Path, PathBuf};

use cordpack_templates::{CompileSummary, TemplateCompiler};
use tracing::info;

use crate::invoker::Invoker;
use crate::tool::ToolLocation;
use crate::types::{CordovaError, Platform, Subcommand};

/// Name of the asset directory inside a Cordova app.
pub const ASSET_DIR: &str = "www";

/// A Cordova app on disk.
///
/// The root is the directory holding `www/`, `platforms/`, `plugins/` and
/// `config.xml`. It is fixed at construction. A template path can be set
/// once the app exists; without one, [`CordovaApp::build`] goes straight to
/// the Cordova tool.
///
/// # Example
///
/// ```ignore
/// use cordpack::{CordovaApp, Platform};
///
/// let app = CordovaApp::new("my-app")?.with_template_path("views");
///
/// // Compiles www/views/**/*.jinja, then runs `cordova build android`.
/// app.build()?;
///
/// // `cordova run ios`, no template compilation.
/// app.run_for(&Platform::from("ios"))?;
/// # Ok::<(), cordpack::CordovaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CordovaApp {
    root: PathBuf,
    template_dir: Option<PathBuf>,
    compiler: TemplateCompiler,
    invoker: Invoker,
}

impl CordovaApp {
    /// Creates an app rooted at `root`, using the host's default Cordova
    /// location (see [`ToolLocation::for_host`]).
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CordovaError> {
        Ok(Self::with_tool(root, ToolLocation::for_host()?))
    }

    /// Creates an app rooted at `root` that drives the given tool.
    pub fn with_tool(root: impl Into<PathBuf>, tool: ToolLocation) -> Self {
        Self::with_invoker(root, Invoker::new(tool))
    }

    pub fn with_invoker(root: impl Into<PathBuf>, invoker: Invoker) -> Self {
        Self {
            root: root.into(),
            template_dir: None,
            compiler: TemplateCompiler::new(),
            invoker,
        }
    }

    /// Sets the template directory, relative to `<root>/www`.
    pub fn set_template_path(&mut self, relative: impl AsRef<Path>) -> &mut Self {
        self.template_dir = Some(self.root.join(ASSET_DIR).join(relative));
        self
    }

    /// By-value form of [`CordovaApp::set_template_path`].
    pub fn with_template_path(mut self, relative: impl AsRef<Path>) -> Self {
        self.set_template_path(relative);
        self
    }

    /// Replaces the template compiler (extensions, render context).
    pub fn with_compiler(mut self, compiler: TemplateCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute template directory, once a template path has been set.
    pub fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }

    pub fn compiler(&self) -> &TemplateCompiler {
        &self.compiler
    }

    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    /// Compiles the templates under the template directory.
    ///
    /// Returns an empty summary when no template path is set.
    pub fn compile_templates(&self) -> Result<CompileSummary, CordovaError> {
        match &self.template_dir {
            Some(dir) => Ok(self.compiler.compile_dir(dir)?),
            None => Ok(CompileSummary::default()),
        }
    }

    /// Compiles templates and builds for Android.
    pub fn build(&self) -> Result<(), CordovaError> {
        self.build_for(&Platform::default())
    }

    /// Compiles templates, then runs `cordova build <platform>` in the app
    /// root. The tool is not started if compilation fails.
    pub fn build_for(&self, platform: &Platform) -> Result<(), CordovaError> {
        let summary = self.compile_templates()?;
        if self.template_dir.is_some() {
            info!(compiled = summary.len(), "templates ready");
        }
        self.invoker.invoke(Subcommand::Build, platform, &self.root)
    }

    /// Builds and launches the app on Android.
    pub fn run(&self) -> Result<(), CordovaError> {
        self.run_for(&Platform::default())
    }

    /// Runs `cordova run <platform>`. Templates are not compiled.
    pub fn run_for(&self, platform: &Platform) -> Result<(), CordovaError> {
        self.invoker.invoke(Subcommand::Run, platform, &self.root)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::invoker::test_support::{fake_cordova, recorded_invocation};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _tools: TempDir,
        app_dir: TempDir,
        tool: ToolLocation,
    }

    fn fixture(exit_code: i32) -> Fixture {
        let tools = TempDir::new().unwrap();
        let app_dir = TempDir::new().unwrap();
        fs::create_dir_all(app_dir.path().join("www/views")).unwrap();
        let tool = fake_cordova(tools.path(), exit_code);
        Fixture {
            _tools: tools,
            app_dir,
            tool,
        }
    }

    fn app(fixture: &Fixture) -> CordovaApp {
        let invoker = Invoker::new(fixture.tool.clone()).quiet(true);
        CordovaApp::with_invoker(fixture.app_dir.path(), invoker)
    }

    #[test]
    fn test_template_path_is_under_www() {
        let mut app = CordovaApp::with_tool("/apps/demo", ToolLocation::new("cordova"));
        assert_eq!(app.template_dir(), None);

        app.set_template_path("views/main");
        assert_eq!(
            app.template_dir(),
            Some(Path::new("/apps/demo/www/views/main"))
        );
        assert_eq!(app.root(), Path::new("/apps/demo"));
    }

    #[test]
    fn test_build_compiles_then_invokes() {
        let fx = fixture(0);
        let root = fx.app_dir.path();
        fs::write(root.join("www/views/index.jinja"), "<b>{{ 6 * 7 }}</b>").unwrap();
        fs::write(root.join("www/views/style.css"), "b {}").unwrap();

        app(&fx).with_template_path("views").build().unwrap();

        assert_eq!(
            fs::read_to_string(root.join("www/views/index.tpl")).unwrap(),
            "<b>42</b>"
        );
        assert!(!root.join("www/views/style.tpl").exists());
        let lines = recorded_invocation(root).unwrap();
        assert_eq!(&lines[..2], &["build", "android"]);
    }

    #[test]
    fn test_build_defaults_to_android() {
        let fx = fixture(0);
        let app = app(&fx);

        app.build().unwrap();
        let default_run = recorded_invocation(fx.app_dir.path()).unwrap();
        app.build_for(&Platform::from("android")).unwrap();
        let explicit_run = recorded_invocation(fx.app_dir.path()).unwrap();

        assert_eq!(default_run, explicit_run);
    }

    #[test]
    fn test_template_error_skips_tool() {
        let fx = fixture(0);
        let root = fx.app_dir.path();
        fs::write(root.join("www/views/bad.jinja"), "{% block %}").unwrap();

        let err = app(&fx).with_template_path("views").build().unwrap_err();

        assert!(matches!(err, CordovaError::Template(_)));
        assert!(recorded_invocation(root).is_none());
    }

    #[test]
    fn test_missing_template_dir_fails_build() {
        let fx = fixture(0);

        let err = app(&fx).with_template_path("missing").build().unwrap_err();

        match err {
            CordovaError::Template(inner) => assert!(inner.is_not_found()),
            other => panic!("expected template error, got {other:?}"),
        }
        assert!(recorded_invocation(fx.app_dir.path()).is_none());
    }

    #[test]
    fn test_run_skips_compilation() {
        let fx = fixture(0);
        let root = fx.app_dir.path();
        fs::write(root.join("www/views/index.jinja"), "x").unwrap();

        app(&fx)
            .with_template_path("views")
            .run_for(&Platform::from("ios"))
            .unwrap();

        assert!(!root.join("www/views/index.tpl").exists());
        let lines = recorded_invocation(root).unwrap();
        assert_eq!(&lines[..2], &["run", "ios"]);
    }

    #[test]
    fn test_failed_build_reports_exit_code() {
        let fx = fixture(1);

        let err = app(&fx).build().unwrap_err();

        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn test_compile_without_template_path_is_empty() {
        let fx = fixture(0);
        let summary = app(&fx).compile_templates().unwrap();
        assert!(summary.is_empty());
    }
}
