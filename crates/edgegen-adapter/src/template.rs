//! Language-specific template lookup and rendering.
//!
//! Templates live under `<root>/<language>/<name>.hbs` and are read from disk
//! on every call. Rendering uses handlebars with escaping disabled, since the
//! output is source code and config files rather than HTML.

use std::path::PathBuf;

use edgegen_core::{GenerateError, Language};
use handlebars::Handlebars;
use serde::Serialize;

pub const TEMPLATE_EXTENSION: &str = "hbs";

/// Resolves and reads templates for one language.
#[derive(Clone, Debug)]
pub struct TemplateLoader {
    root: PathBuf,
    language: Language,
}

impl TemplateLoader {
    pub fn new(root: impl Into<PathBuf>, language: Language) -> Self {
        Self {
            root: root.into(),
            language,
        }
    }

    /// Path the template `name` is expected at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root
            .join(self.language.template_dir())
            .join(format!("{name}.{TEMPLATE_EXTENSION}"))
    }

    pub fn load(&self, name: &str) -> Result<String, GenerateError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(GenerateError::template_missing(path));
        }
        log::trace!("loading template {}", path.display());
        std::fs::read_to_string(&path).map_err(|err| GenerateError::io(&path, err))
    }
}

/// Renders `content` against `data`. A fresh registry is built per call.
pub fn render_template<T: Serialize>(
    name: &str,
    content: &str,
    data: &T,
) -> Result<String, GenerateError> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(handlebars::no_escape);
    hbs.register_template_string(name, content)
        .map_err(|err| GenerateError::template(name, err))?;
    hbs.render(name, data)
        .map_err(|err| GenerateError::render(name, err))
}

/// Loads template `name` and renders it in one step.
pub fn load_and_render<T: Serialize>(
    loader: &TemplateLoader,
    name: &str,
    data: &T,
) -> Result<String, GenerateError> {
    let content = loader.load(name)?;
    render_template(name, &content, data)
}
