use std::path::{Path, PathBuf};

use edgegen_adapter::generator::{
    ensure_dir, render_handler, route_methods, should_skip, write_file, CodeGenerator,
    FunctionDescriptor, GenerationContext, GenerationReport, RouteMethod,
};
use edgegen_adapter::package::PackageManifest;
use edgegen_adapter::template::{load_and_render, render_template, TemplateLoader};
use edgegen_core::{ClassHolder, GenerateError};
use serde::Serialize;
use serde_json::{json, Value};

pub const NETLIFY_TEMPLATE: &str = "netlify";
pub const WEBPACK_TEMPLATE: &str = "webpack";
pub const DEFAULT_FUNCTION_TEMPLATE: &str = "netlify_default";

pub const NETLIFY_CONFIG_FILE: &str = "netlify.toml";
pub const WEBPACK_CONFIG_FILE: &str = "webpack.config.js";
pub const EDGE_FUNCTIONS_DIR: &str = "netlify/edge-functions";

/// Placeholders share the compiled handler's file name so `yarn build`
/// overwrites them instead of adding a second function with the same name.
const SHIM_EXTENSION: &str = "js";

const FALLBACK_FUNCTION_NAME: &str = "index";

const RUNTIME_DEPENDENCIES: &[(&str, &str)] = &[("nunjucks", "^3.2.3")];

const SCRIPTS: &[(&str, &str)] = &[
    (
        "create:netlify:folder",
        "mkdir -p netlify/edge-functions && cp -fr api/* netlify/edge-functions",
    ),
    (
        "build",
        "yarn clean && yarn create:public:folder && swc src -d api && yarn create:netlify:folder",
    ),
];

/// One webpack entry point, keyed by function name.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct WebpackEntry {
    pub name: String,
    pub source: String,
    pub path: String,
}

/// Emits one handler per class plus the Netlify and webpack configuration.
pub struct NetlifyEdgeGenerator {
    context: GenerationContext,
}

impl NetlifyEdgeGenerator {
    pub fn new(context: GenerationContext) -> Self {
        Self { context }
    }

    fn loader(&self) -> TemplateLoader {
        self.context.template_loader()
    }

    fn write_netlify_config(&self, functions: &[FunctionDescriptor]) -> Result<PathBuf, GenerateError> {
        let rendered =
            load_and_render(&self.loader(), NETLIFY_TEMPLATE, &json!({ "functions": functions }))?;
        let path = self.context.destination.join(NETLIFY_CONFIG_FILE);
        write_file(&path, &rendered)?;
        Ok(path)
    }

    fn write_webpack_config(&self, functions: &[FunctionDescriptor]) -> Result<PathBuf, GenerateError> {
        let entries = webpack_entries(functions, self.context.extension());
        let rendered = load_and_render(
            &self.loader(),
            WEBPACK_TEMPLATE,
            &json!({ "functions": functions, "entries": entries }),
        )?;
        let path = self.context.destination.join(WEBPACK_CONFIG_FILE);
        write_file(&path, &rendered)?;
        Ok(path)
    }

    /// Writes one placeholder per distinct function at the path the build
    /// copies the compiled handler to. Existing files follow the same
    /// overwrite rule as handlers.
    fn write_default_functions(
        &self,
        functions: &[FunctionDescriptor],
        report: &mut GenerationReport,
    ) -> Result<(), GenerateError> {
        let content = self.loader().load(DEFAULT_FUNCTION_TEMPLATE)?;
        let dir = self.context.destination.join(EDGE_FUNCTIONS_DIR);
        ensure_dir(&dir)?;

        for (function, paths) in group_paths(functions) {
            let path = dir.join(format!("{}.{}", function, SHIM_EXTENSION));
            if should_skip(&self.context, &path) {
                report.record_skip(path);
                continue;
            }
            let data = json!({
                "function": function,
                "path": paths.first().cloned().unwrap_or_default(),
                "paths": paths,
                "functions": functions,
            });
            let rendered = render_template(DEFAULT_FUNCTION_TEMPLATE, &content, &data)?;
            write_file(&path, &rendered)?;
            report.record_write(path);
        }
        Ok(())
    }
}

impl CodeGenerator for NetlifyEdgeGenerator {
    fn context(&self) -> &GenerationContext {
        &self.context
    }

    /// Renders the handler with every route carrying the configured prefix.
    fn render_template(
        &self,
        content: &str,
        item: &ClassHolder,
        methods: &[RouteMethod],
    ) -> Result<String, GenerateError> {
        let prefixed: Vec<RouteMethod> = methods
            .iter()
            .cloned()
            .map(|mut method| {
                method.item.route = self.context.prefixed(&method.item.route);
                method
            })
            .collect();
        render_handler(content, item, &prefixed, &self.context.route_method)
    }

    /// `src/<last segment of the last method's route>.<ext>`.
    ///
    /// Only the final method names the file, so classes whose methods live
    /// under different routes share a single handler named after the last one.
    fn destination_for(&self, class: &ClassHolder) -> Result<Option<PathBuf>, GenerateError> {
        let src = self.context.source_dir();
        ensure_dir(&src)?;

        let Some(last) = class.methods.last() else {
            log::warn!("class `{}` has no routed methods, skipping", class.name);
            return Ok(None);
        };
        let name = last
            .last_route_segment()
            .unwrap_or(FALLBACK_FUNCTION_NAME);
        Ok(Some(src.join(format!("{}.{}", name, self.context.extension()))))
    }

    fn generate_configs(
        &self,
        package: &mut PackageManifest,
        _swc: &mut Value,
    ) -> Result<(), GenerateError> {
        for (name, version) in RUNTIME_DEPENDENCIES {
            package.add_dependency(name, version);
        }
        for (name, command) in SCRIPTS {
            package.set_script(name, command);
        }
        Ok(())
    }

    fn generate_files(
        &self,
        classes: &mut [ClassHolder],
    ) -> Result<GenerationReport, GenerateError> {
        let ctx = &self.context;
        let mut report = GenerationReport::default();

        for class in classes.iter_mut() {
            let Some(path) = self.destination_for(class)? else {
                continue;
            };
            if should_skip(ctx, &path) {
                report.record_skip(path);
                continue;
            }

            let app_import = ctx.app_import(class);
            class.imports.push(ctx.route_import());
            class.imports.push(app_import);

            let function = function_name(&path);
            let methods = route_methods(class);
            for method in &class.methods {
                report.functions.push(FunctionDescriptor {
                    function: function.clone(),
                    path: ctx.prefixed(&method.route),
                });
            }

            let content = self.template()?;
            let rendered = self.render_template(&content, class, &methods)?;
            write_file(&path, &rendered)?;
            report.record_write(path);
        }

        let functions = report.functions.clone();
        let netlify = self.write_netlify_config(&functions)?;
        report.record_write(netlify);
        let webpack = self.write_webpack_config(&functions)?;
        report.record_write(webpack);
        self.write_default_functions(&functions, &mut report)?;

        Ok(report)
    }
}

fn function_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_FUNCTION_NAME.to_string())
}

/// One entry per descriptor, pointing at the handler source.
pub(crate) fn webpack_entries(functions: &[FunctionDescriptor], extension: &str) -> Vec<WebpackEntry> {
    functions
        .iter()
        .map(|descriptor| WebpackEntry {
            name: descriptor.function.clone(),
            source: format!("./src/{}.{}", descriptor.function, extension),
            path: descriptor.path.clone(),
        })
        .collect()
}

/// Groups descriptor paths by function, keeping first-seen order.
fn group_paths(functions: &[FunctionDescriptor]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for descriptor in functions {
        match groups.iter_mut().find(|(name, _)| *name == descriptor.function) {
            Some((_, paths)) => paths.push(descriptor.path.clone()),
            None => groups.push((descriptor.function.clone(), vec![descriptor.path.clone()])),
        }
    }
    groups
}
