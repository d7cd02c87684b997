//! Single-template rendering.

use std::borrow::Cow;
use std::path::Path;

use minijinja::{AutoEscape, Environment, Value};
use serde::{Deserialize, Serialize};

/// Escaping applied to `{{ ... }}` output.
///
/// The same policy covers a template and everything it includes, imports or
/// extends, whatever their file extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Escaping {
    /// Escape HTML special characters.
    #[default]
    Html,
    /// Emit values verbatim.
    None,
}

impl Escaping {
    fn auto_escape(self) -> AutoEscape {
        match self {
            Escaping::Html => AutoEscape::Html,
            Escaping::None => AutoEscape::None,
        }
    }
}

/// Renders one template source to markup.
///
/// `root` is the loader root and `path` the template's location below it.
/// The template is named by its `/`-separated path relative to `root`, and
/// include names are joined against the including template's directory, so
/// `{% include "../partials/nav.html" %}` works from `pages/home.jinja`.
/// Names that climb above `root` are not found.
pub(crate) fn render_source(
    root: &Path,
    path: &Path,
    source: &str,
    context: &Value,
    escaping: Escaping,
) -> Result<String, minijinja::Error> {
    let name = template_name(root, path);

    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(move |_| escaping.auto_escape());
    env.set_path_join_callback(join_template_path);
    env.set_loader(minijinja::path_loader(root.to_path_buf()));

    let template = env.template_from_named_str(name.as_str(), source)?;
    template.render(context)
}

fn template_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn join_template_path<'s>(name: &'s str, parent: &'s str) -> Cow<'s, str> {
    let mut segments: Vec<&str> = parent.split('/').collect();
    segments.pop();

    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                // Kept when already at the root so the loader rejects it.
                if matches!(segments.last(), None | Some(&"..")) {
                    segments.push("..");
                } else {
                    segments.pop();
                }
            }
            other => segments.push(other),
        }
    }

    Cow::Owned(segments.join("/"))
}
