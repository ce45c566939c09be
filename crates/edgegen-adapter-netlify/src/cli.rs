use std::path::{Path, PathBuf};

use ctor::ctor;
use edgegen_adapter::cli_support::locate_file;
use edgegen_adapter::command::run_shell;
use edgegen_adapter::generator::{CodeGenerator, GenerationContext, HANDLER_TEMPLATE};
use edgegen_adapter::scaffold::{register_adapter_blueprint, AdapterBlueprint, CommandTemplates};
use edgegen_adapter::{register_adapter, Adapter, AdapterAction};

use crate::generator::{
    NetlifyEdgeGenerator, DEFAULT_FUNCTION_TEMPLATE, NETLIFY_CONFIG_FILE, NETLIFY_TEMPLATE,
    WEBPACK_TEMPLATE,
};
use crate::templates::NETLIFY_TEMPLATE_REGISTRATIONS;

pub const ADAPTER_ID: &str = "netlify";

static NETLIFY_BLUEPRINT: AdapterBlueprint = AdapterBlueprint {
    id: ADAPTER_ID,
    display_name: "Netlify Edge Functions",
    description: "An adapter for Netlify Edge Functions",
    version: env!("CARGO_PKG_VERSION"),
    template_names: &[
        HANDLER_TEMPLATE,
        NETLIFY_TEMPLATE,
        WEBPACK_TEMPLATE,
        DEFAULT_FUNCTION_TEMPLATE,
    ],
    templates: NETLIFY_TEMPLATE_REGISTRATIONS,
    commands: CommandTemplates {
        build: "yarn build",
        serve: "netlify dev",
        deploy: "netlify deploy",
    },
    project_marker: NETLIFY_CONFIG_FILE,
};

struct NetlifyCliAdapter;

static NETLIFY_ADAPTER: NetlifyCliAdapter = NetlifyCliAdapter;

impl Adapter for NetlifyCliAdapter {
    fn name(&self) -> &'static str {
        ADAPTER_ID
    }

    fn generator(&self, context: GenerationContext) -> Box<dyn CodeGenerator> {
        Box::new(NetlifyEdgeGenerator::new(context))
    }

    fn execute(&self, action: AdapterAction, args: &[String]) -> Result<(), String> {
        let cwd = std::env::current_dir().map_err(|e| e.to_string())?;
        let project = find_project_dir(&cwd)?;
        run_in_project(action, &project, args)
    }
}

/// Directory holding the generated `netlify.toml` nearest to `start`.
pub fn find_project_dir(start: &Path) -> Result<PathBuf, String> {
    let config = locate_file(start, NETLIFY_BLUEPRINT.project_marker)?;
    config
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| format!("{} has no parent directory", config.display()))
}

/// Runs the default command for `action` inside a generated project.
pub fn run_in_project(action: AdapterAction, project: &Path, args: &[String]) -> Result<(), String> {
    let command = NETLIFY_BLUEPRINT.commands.for_action(action);
    run_shell(command, project, &action.to_string(), args)
}

pub fn register() {
    register_adapter(&NETLIFY_ADAPTER);
    register_adapter_blueprint(&NETLIFY_BLUEPRINT);
}

#[ctor]
fn register_ctor() {
    register();
}
