use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::registry::AdapterAction;
use crate::template::TEMPLATE_EXTENSION;

/// Built-in template shipped by an adapter for one language.
#[derive(Clone, Copy)]
pub struct TemplateRegistration {
    pub language: &'static str,
    pub name: &'static str,
    pub contents: &'static str,
}

/// Defines default shell commands for adapter actions, run in the generated project.
#[derive(Clone, Copy)]
pub struct CommandTemplates {
    pub build: &'static str,
    pub serve: &'static str,
    pub deploy: &'static str,
}

impl CommandTemplates {
    pub fn for_action(&self, action: AdapterAction) -> &'static str {
        match action {
            AdapterAction::Build => self.build,
            AdapterAction::Serve => self.serve,
            AdapterAction::Deploy => self.deploy,
        }
    }
}

/// Complete blueprint describing what an adapter generates and how to drive it.
pub struct AdapterBlueprint {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    /// Template names the generator loads from the template root.
    pub template_names: &'static [&'static str],
    pub templates: &'static [TemplateRegistration],
    pub commands: CommandTemplates,
    /// File identifying a generated project, used to locate it from a working directory.
    pub project_marker: &'static str,
}

impl AdapterBlueprint {
    /// Languages with built-in templates, sorted and deduplicated.
    pub fn languages(&self) -> Vec<&'static str> {
        let mut languages: Vec<&'static str> =
            self.templates.iter().map(|t| t.language).collect();
        languages.sort();
        languages.dedup();
        languages
    }

    pub fn templates_for<'a>(
        &'a self,
        language: &'a str,
    ) -> impl Iterator<Item = &'a TemplateRegistration> + 'a {
        self.templates
            .iter()
            .filter(move |t| t.language.eq_ignore_ascii_case(language))
    }
}

static BLUEPRINT_REGISTRY: Lazy<RwLock<HashMap<String, &'static AdapterBlueprint>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers the blueprint for an adapter. Latest registration wins.
pub fn register_adapter_blueprint(blueprint: &'static AdapterBlueprint) {
    let mut registry = BLUEPRINT_REGISTRY
        .write()
        .expect("edgegen blueprint registry lock poisoned");
    registry.insert(blueprint.id.to_ascii_lowercase(), blueprint);
}

/// Looks up a blueprint by adapter id.
pub fn get_blueprint(id: &str) -> Option<&'static AdapterBlueprint> {
    let registry = BLUEPRINT_REGISTRY
        .read()
        .expect("edgegen blueprint registry lock poisoned");
    registry.get(&id.to_ascii_lowercase()).copied()
}

/// Returns the known adapter blueprints sorted by adapter id.
pub fn registered_blueprints() -> Vec<&'static AdapterBlueprint> {
    let registry = BLUEPRINT_REGISTRY
        .read()
        .expect("edgegen blueprint registry lock poisoned");
    let mut values: Vec<&'static AdapterBlueprint> = registry.values().copied().collect();
    values.sort_by(|a, b| a.id.cmp(b.id));
    values
}

/// Writes the blueprint's built-in templates for `language` into
/// `<root>/<language>/`. Existing files are kept unless `force` is set.
pub fn write_builtin_templates(
    blueprint: &AdapterBlueprint,
    language: &str,
    root: &Path,
    force: bool,
) -> std::io::Result<Vec<PathBuf>> {
    let language = language.to_ascii_lowercase();
    let templates: Vec<&TemplateRegistration> = blueprint.templates_for(&language).collect();
    if templates.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!(
                "adapter `{}` has no built-in templates for `{}` (available: {})",
                blueprint.id,
                language,
                blueprint.languages().join(", ")
            ),
        ));
    }

    let dir = root.join(&language);
    std::fs::create_dir_all(&dir)?;
    let mut written = Vec::new();
    for template in templates {
        let path = dir.join(format!("{}.{}", template.name, TEMPLATE_EXTENSION));
        if path.exists() && !force {
            log::info!("template exists, keeping {}", path.display());
            continue;
        }
        std::fs::write(&path, template.contents)?;
        written.push(path);
    }
    Ok(written)
}
