use std::path::PathBuf;

use clap::{Parser, Subcommand};

const DEFAULT_ADAPTER: &str = "netlify";

#[derive(Parser, Debug)]
#[command(name = "edgegen", about = "EdgeGen CLI", version)]
pub struct Args {
    /// Log at debug level regardless of the manifest setting
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Path to `edgegen.toml` (defaults to `EDGEGEN_MANIFEST` or a lookup from the current dir)
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate an edge-function project from a class catalog
    Generate(GenerateArgs),
    /// Build the generated project
    Build(ActionArgs),
    /// Deploy the generated project
    Deploy(ActionArgs),
    /// Run the generated project locally
    Serve(ActionArgs),
    /// Write an adapter's built-in handlebars templates to `<dir>/<language>/<name>.hbs`
    ///
    /// Handlers, `netlify.toml`, `webpack.config.js` and the edge-function
    /// placeholders are rendered from these files. They are handlebars
    /// templates with escaping disabled, so `{{{ }}}` and `{{ }}` behave alike.
    Templates(TemplatesArgs),
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    #[arg(long, default_value = DEFAULT_ADAPTER)]
    pub adapter: String,
    /// Class catalog JSON (overrides `app.catalog`)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Target language, `typescript` or `javascript`
    #[arg(long)]
    pub language: Option<String>,
    /// Output directory (overrides `app.destination`)
    #[arg(long)]
    pub destination: Option<PathBuf>,
    /// Prefix prepended to every route
    #[arg(long)]
    pub prefix: Option<String>,
    /// Overwrite handler files that already exist
    #[arg(long)]
    pub replace: bool,
    /// Skip the build command after generation
    #[arg(long)]
    pub no_build: bool,
}

#[derive(clap::Args, Debug)]
pub struct ActionArgs {
    #[arg(long, default_value = DEFAULT_ADAPTER)]
    pub adapter: String,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub adapter_args: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct TemplatesArgs {
    #[arg(long, default_value = DEFAULT_ADAPTER)]
    pub adapter: String,
    #[arg(long, default_value = "typescript")]
    pub language: String,
    /// Template root to write into (default: `./templates`)
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Overwrite templates that already exist
    #[arg(long)]
    pub force: bool,
}
