use std::path::Path;

use edgegen_adapter::command::run_shell;
use edgegen_adapter::generator::{init, GenerationContext, GenerationReport};
use edgegen_adapter::scaffold::get_blueprint;
use edgegen_adapter::AdapterAction;
use edgegen_core::manifest::{Manifest, ManifestLoader};
use edgegen_core::{ClassCatalog, Language};

use crate::adapter::{manifest_command, resolve_adapter};
use crate::args::GenerateArgs;

/// Generates the project, then runs the build command unless disabled.
pub fn run(args: &GenerateArgs, manifest: Option<&ManifestLoader>) -> Result<GenerationReport, String> {
    let defaults;
    let manifest = match manifest {
        Some(loader) => loader.manifest(),
        None => {
            defaults = ManifestLoader::load_from_str("").map_err(|e| e.to_string())?;
            defaults.manifest()
        }
    };

    let adapter = resolve_adapter(&args.adapter)?;
    let ctx = build_context(args, manifest)?;
    let catalog = match &args.catalog {
        Some(path) => path.clone(),
        None => manifest.catalog_path(),
    };

    let classes = ClassCatalog::from_path(&catalog)
        .map_err(|e| e.to_string())?
        .into_classes();
    let destination = ctx.destination.clone();
    let generator = adapter.generator(ctx);
    let report = init(generator.as_ref(), classes).map_err(|e| e.to_string())?;
    println!(
        "[edgegen] generated {} function(s) into {}",
        report.functions.len(),
        destination.display()
    );

    if args.no_build {
        log::info!("skipping build (--no-build)");
    } else {
        post_build(&args.adapter, manifest, &destination)?;
    }
    Ok(report)
}

/// Manifest settings with command-line overrides applied.
fn build_context(args: &GenerateArgs, manifest: &Manifest) -> Result<GenerationContext, String> {
    let mut ctx = GenerationContext::from_manifest(&args.adapter, manifest);
    if let Some(language) = &args.language {
        ctx.language = Language::new(language.as_str());
    }
    if let Some(destination) = &args.destination {
        ctx.destination = destination.clone();
    }
    if let Some(prefix) = &args.prefix {
        if !prefix.is_empty() && !prefix.starts_with('/') {
            return Err(format!("prefix `{}` must be empty or start with `/`", prefix));
        }
        ctx.prefix = prefix.clone();
    }
    if args.replace {
        ctx.replace_files = true;
    }
    Ok(ctx)
}

/// Runs once generation has fully completed, in the generated project.
fn post_build(adapter_name: &str, manifest: &Manifest, destination: &Path) -> Result<(), String> {
    let command = manifest_command(manifest, adapter_name, AdapterAction::Build).or_else(|| {
        get_blueprint(adapter_name).map(|blueprint| blueprint.commands.build.to_string())
    });
    match command {
        Some(command) => run_shell(&command, destination, "build", &[]),
        None => {
            log::warn!("adapter `{}` declares no build command", adapter_name);
            Ok(())
        }
    }
}
