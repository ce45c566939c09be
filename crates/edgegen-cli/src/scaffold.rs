use std::path::{Path, PathBuf};

use edgegen_adapter::scaffold::{get_blueprint, registered_blueprints, write_builtin_templates};
use edgegen_adapter::template::TEMPLATE_EXTENSION;

use crate::args::TemplatesArgs;

const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Writes the adapter's built-in templates so they can be customised in place.
pub fn write_templates(args: &TemplatesArgs, cwd: &Path) -> Result<Vec<PathBuf>, String> {
    let blueprint = get_blueprint(&args.adapter).ok_or_else(|| {
        let known: Vec<&str> = registered_blueprints().iter().map(|b| b.id).collect();
        format!(
            "adapter `{}` ships no templates (known: {})",
            args.adapter,
            known.join(", ")
        )
    })?;

    let root = match &args.dir {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => cwd.join(dir),
        None => cwd.join(DEFAULT_TEMPLATE_DIR),
    };

    log::info!(
        "{} {}: {}",
        blueprint.display_name,
        blueprint.version,
        blueprint.description
    );
    let written = write_builtin_templates(blueprint, &args.language, &root, args.force)
        .map_err(|err| err.to_string())?;
    for path in &written {
        println!("[edgegen] wrote {}", path.display());
    }
    if written.is_empty() {
        println!(
            "[edgegen] {} templates already present in {} (use --force to overwrite)",
            blueprint.display_name,
            root.display()
        );
    }
    let dir = root.join(args.language.to_ascii_lowercase());
    let missing: Vec<&str> = blueprint
        .template_names
        .iter()
        .copied()
        .filter(|name| !dir.join(format!("{name}.{TEMPLATE_EXTENSION}")).exists())
        .collect();
    if !missing.is_empty() {
        return Err(format!(
            "adapter `{}` did not provide templates: {}",
            blueprint.id,
            missing.join(", ")
        ));
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::register_linked_adapters;
    use std::fs;
    use tempfile::tempdir;

    fn args(language: &str, force: bool) -> TemplatesArgs {
        TemplatesArgs {
            adapter: "netlify".into(),
            language: language.into(),
            dir: None,
            force,
        }
    }

    #[test]
    fn writes_templates_under_cwd() {
        register_linked_adapters();
        let dir = tempdir().unwrap();
        let written = write_templates(&args("TypeScript", false), dir.path()).unwrap();

        assert_eq!(written.len(), 4);
        assert!(dir.path().join("templates/typescript/handler.hbs").exists());
        assert!(dir.path().join("templates/typescript/netlify_default.hbs").exists());
    }

    #[test]
    fn keeps_existing_templates_unless_forced() {
        register_linked_adapters();
        let dir = tempdir().unwrap();
        let handler = dir.path().join("templates/javascript/handler.hbs");
        fs::create_dir_all(handler.parent().unwrap()).unwrap();
        fs::write(&handler, "custom").unwrap();

        let written = write_templates(&args("javascript", false), dir.path()).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(fs::read_to_string(&handler).unwrap(), "custom");

        write_templates(&args("javascript", true), dir.path()).unwrap();
        assert_ne!(fs::read_to_string(&handler).unwrap(), "custom");
    }

    #[test]
    fn unknown_language_lists_available() {
        register_linked_adapters();
        let dir = tempdir().unwrap();
        let err = write_templates(&args("python", false), dir.path()).unwrap_err();
        assert!(err.contains("javascript, typescript"));
    }

    #[test]
    fn unknown_adapter_is_rejected() {
        let dir = tempdir().unwrap();
        let mut args = args("typescript", false);
        args.adapter = "vercel".into();
        assert!(write_templates(&args, dir.path()).is_err());
    }
}
