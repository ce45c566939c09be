//! EdgeGen CLI.

#[cfg(feature = "cli")]
mod adapter;
#[cfg(feature = "cli")]
mod args;
#[cfg(feature = "cli")]
mod generate;
#[cfg(feature = "cli")]
mod scaffold;

#[cfg(feature = "cli")]
fn main() {
    use args::{Args, Command};
    use clap::Parser;
    use edgegen_adapter::AdapterAction;
    use log::LevelFilter;
    use simple_logger::SimpleLogger;

    let args = Args::parse();
    adapter::register_linked_adapters();

    let manifest = match adapter::load_manifest(args.manifest.as_deref()) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("[edgegen] manifest error: {e}");
            std::process::exit(1);
        }
    };

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        manifest
            .as_ref()
            .map(|loader| LevelFilter::from(loader.manifest().log_level()))
            .unwrap_or(LevelFilter::Info)
    };
    SimpleLogger::new().with_level(level).init().ok();

    let (label, result) = match args.cmd {
        Command::Generate(generate_args) => (
            "generate",
            generate::run(&generate_args, manifest.as_ref()).map(|_| ()),
        ),
        Command::Build(action) => (
            "build",
            adapter::execute(
                &action.adapter,
                AdapterAction::Build,
                manifest.as_ref(),
                &action.adapter_args,
            ),
        ),
        Command::Deploy(action) => (
            "deploy",
            adapter::execute(
                &action.adapter,
                AdapterAction::Deploy,
                manifest.as_ref(),
                &action.adapter_args,
            ),
        ),
        Command::Serve(action) => (
            "serve",
            adapter::execute(
                &action.adapter,
                AdapterAction::Serve,
                manifest.as_ref(),
                &action.adapter_args,
            ),
        ),
        Command::Templates(templates_args) => (
            "templates",
            std::env::current_dir()
                .map_err(|e| e.to_string())
                .and_then(|cwd| scaffold::write_templates(&templates_args, &cwd))
                .map(|_| ()),
        ),
    };

    if let Err(e) = result {
        eprintln!("[edgegen] {label} error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("edgegen-cli built without `cli` feature. Rebuild with `--features cli`.");
}
