//! Generation hooks shared by every adapter.
//!
//! An adapter supplies a [`CodeGenerator`]; [`init`] drives it: prepares the
//! destination, lets the generator adjust `package.json` and `.swcrc`, then
//! asks it to emit files for the discovered classes. Every hook has a default
//! so an adapter only overrides what its platform needs.

use std::path::{Path, PathBuf};

use edgegen_core::manifest::Manifest;
use edgegen_core::{ClassHolder, GenerateError, HttpMethod, Language, MethodHolder};
use serde::Serialize;
use serde_json::Value;

use crate::package::{swc_config, write_swc_config, PackageManifest};
use crate::template::{render_template, TemplateLoader};

pub const HANDLER_TEMPLATE: &str = "handler";

/// Identifier handler templates index with `routePath`.
pub const APP_BINDING: &str = "app";

/// Inputs of one generation run.
#[derive(Clone, Debug)]
pub struct GenerationContext {
    pub adapter: String,
    pub app_name: String,
    pub destination: PathBuf,
    pub template_root: PathBuf,
    pub language: Language,
    pub replace_files: bool,
    /// Symbol imported by every handler to dispatch a request.
    pub route_method: String,
    /// Module exporting `route_method`, relative to the application root.
    pub route_file: Option<String>,
    /// Prepended to every route path.
    pub prefix: String,
}

impl GenerationContext {
    pub fn new(adapter: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            adapter: adapter.into(),
            app_name: "edgegen-app".to_string(),
            destination: destination.into(),
            template_root: PathBuf::from("templates"),
            language: Language::default(),
            replace_files: false,
            route_method: "route".to_string(),
            route_file: None,
            prefix: String::new(),
        }
    }

    pub fn from_manifest(adapter: &str, manifest: &Manifest) -> Self {
        let adapter_cfg = manifest.adapter_config(adapter);
        Self {
            adapter: adapter.to_ascii_lowercase(),
            app_name: manifest
                .app
                .name
                .clone()
                .unwrap_or_else(|| "edgegen-app".to_string()),
            destination: manifest.destination_dir(),
            template_root: manifest.template_root(),
            language: manifest.app.language.clone(),
            replace_files: manifest.app.replace_files,
            route_method: manifest.route_method().to_string(),
            route_file: manifest.route.file.clone(),
            prefix: adapter_cfg.prefix,
        }
    }

    pub fn source_dir(&self) -> PathBuf {
        self.destination.join("src")
    }

    pub fn template_loader(&self) -> TemplateLoader {
        TemplateLoader::new(&self.template_root, self.language.clone())
    }

    pub fn extension(&self) -> &'static str {
        self.language.extension()
    }

    /// `prefix + route`.
    pub fn prefixed(&self, route: &str) -> String {
        format!("{}{}", self.prefix, route)
    }

    /// Import line injected into every generated handler.
    pub fn route_import(&self) -> String {
        let module = self.route_file.as_deref().unwrap_or_default();
        format!(
            "import {{{}}} from '@app/{}'",
            self.route_method,
            app_module(module)
        )
    }

    /// Namespace import of the module that route steps index into: the
    /// class's own module, or the route module when the class has none.
    pub fn app_import(&self, class: &ClassHolder) -> String {
        let module = class
            .file
            .as_deref()
            .or(self.route_file.as_deref())
            .unwrap_or_default();
        format!("import * as {} from '@app/{}'", APP_BINDING, app_module(module))
    }
}

fn app_module(module: &str) -> String {
    module.replacen("dist/", "", 1)
}

/// Per-method view handed to the handler template.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteMethod {
    pub route_path: String,
    pub method: HttpMethod,
    pub item: MethodHolder,
}

impl RouteMethod {
    pub fn from_method(method: &MethodHolder) -> Self {
        Self {
            route_path: method.route_path(),
            method: method.method,
            item: method.clone(),
        }
    }
}

pub fn route_methods(class: &ClassHolder) -> Vec<RouteMethod> {
    class.methods.iter().map(RouteMethod::from_method).collect()
}

/// A deployed function and the URL path it serves.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub function: String,
    pub path: String,
}

/// What a generation run produced.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub functions: Vec<FunctionDescriptor>,
}

impl GenerationReport {
    pub fn record_write(&mut self, path: PathBuf) {
        self.written.push(path);
    }

    pub fn record_skip(&mut self, path: PathBuf) {
        self.skipped.push(path);
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HandlerData<'a> {
    item: &'a ClassHolder,
    methods: &'a [RouteMethod],
    route_method: &'a str,
}

/// Renders a handler template with `{ item, methods, routeMethod }`.
pub fn render_handler(
    content: &str,
    item: &ClassHolder,
    methods: &[RouteMethod],
    route_method: &str,
) -> Result<String, GenerateError> {
    let data = HandlerData {
        item,
        methods,
        route_method,
    };
    render_template(HANDLER_TEMPLATE, content, &data)
}

pub trait CodeGenerator {
    fn context(&self) -> &GenerationContext;

    /// Raw handler template for the configured language.
    fn template(&self) -> Result<String, GenerateError> {
        self.context().template_loader().load(HANDLER_TEMPLATE)
    }

    fn render_template(
        &self,
        content: &str,
        item: &ClassHolder,
        methods: &[RouteMethod],
    ) -> Result<String, GenerateError> {
        render_handler(content, item, methods, &self.context().route_method)
    }

    /// Where the handler for `class` is written; `None` skips the class.
    fn destination_for(&self, class: &ClassHolder) -> Result<Option<PathBuf>, GenerateError> {
        let ctx = self.context();
        let src = ctx.source_dir();
        ensure_dir(&src)?;
        Ok(Some(src.join(format!("{}.{}", class.name, ctx.extension()))))
    }

    /// Adjusts the generated `package.json` and swc settings.
    fn generate_configs(
        &self,
        _package: &mut PackageManifest,
        _swc: &mut Value,
    ) -> Result<(), GenerateError> {
        Ok(())
    }

    fn generate_files(
        &self,
        classes: &mut [ClassHolder],
    ) -> Result<GenerationReport, GenerateError> {
        let ctx = self.context();
        let mut report = GenerationReport::default();
        for class in classes.iter_mut() {
            let Some(path) = self.destination_for(class)? else {
                continue;
            };
            if should_skip(ctx, &path) {
                report.record_skip(path);
                continue;
            }
            class.imports.push(ctx.route_import());
            let methods = route_methods(class);
            let content = self.template()?;
            let rendered = self.render_template(&content, class, &methods)?;
            write_file(&path, &rendered)?;
            report.record_write(path);
        }
        Ok(report)
    }
}

/// Generator with no platform-specific behavior.
pub struct DefaultGenerator {
    context: GenerationContext,
}

impl DefaultGenerator {
    pub fn new(context: GenerationContext) -> Self {
        Self { context }
    }
}

impl CodeGenerator for DefaultGenerator {
    fn context(&self) -> &GenerationContext {
        &self.context
    }
}

/// Runs a full generation: configs first, then files.
pub fn init(
    generator: &dyn CodeGenerator,
    mut classes: Vec<ClassHolder>,
) -> Result<GenerationReport, GenerateError> {
    let ctx = generator.context();
    ensure_dir(&ctx.destination)?;

    let mut package = PackageManifest::load_or_new(&ctx.destination, &ctx.app_name)?;
    let mut swc = swc_config(&ctx.language);
    generator.generate_configs(&mut package, &mut swc)?;
    package.write(&ctx.destination)?;
    write_swc_config(&ctx.destination, &swc)?;

    let report = generator.generate_files(&mut classes)?;
    log::info!(
        "{}: {} files written, {} skipped, {} functions",
        ctx.adapter,
        report.written.len(),
        report.skipped.len(),
        report.functions.len()
    );
    Ok(report)
}

pub fn ensure_dir(path: &Path) -> Result<(), GenerateError> {
    std::fs::create_dir_all(path).map_err(|err| GenerateError::io(path, err))
}

/// True when `path` exists and the run must not overwrite it.
pub fn should_skip(ctx: &GenerationContext, path: &Path) -> bool {
    if !ctx.replace_files && path.exists() {
        log::debug!("File exists, skipping - {}", path.display());
        return true;
    }
    false
}

/// Writes `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    std::fs::write(path, contents).map_err(|err| GenerateError::io(path, err))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgegen_core::manifest::ManifestLoader;
    use edgegen_core::ClassCatalog;
    use std::fs;
    use tempfile::tempdir;

    const CATALOG: &str = r#"
{
  "classes": [
    {
      "name": "Users",
      "methods": [
        { "name": "list", "route": "/users", "method": "GET", "routeSteps": ["Users", "list"] }
      ]
    }
  ]
}
"#;

    fn context(root: &Path) -> GenerationContext {
        let mut ctx = GenerationContext::new("test", root.join("out"));
        ctx.template_root = root.join("templates");
        ctx.route_file = Some("dist/routes.js".into());
        ctx
    }

    fn write_template(root: &Path, contents: &str) {
        let dir = root.join("templates/typescript");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("handler.hbs"), contents).unwrap();
    }

    fn classes() -> Vec<ClassHolder> {
        ClassCatalog::from_json(CATALOG).unwrap().into_classes()
    }

    #[test]
    fn route_import_strips_dist() {
        let dir = tempdir().unwrap();
        let ctx = context(dir.path());
        assert_eq!(ctx.route_import(), "import {route} from '@app/routes.js'");
    }

    #[test]
    fn app_import_prefers_class_module() {
        let dir = tempdir().unwrap();
        let ctx = context(dir.path());
        let mut class = ClassHolder {
            name: "Users".into(),
            file: Some("dist/users.controller.js".into()),
            ..Default::default()
        };
        assert_eq!(
            ctx.app_import(&class),
            "import * as app from '@app/users.controller.js'"
        );
        class.file = None;
        assert_eq!(ctx.app_import(&class), "import * as app from '@app/routes.js'");
    }

    #[test]
    fn prefixed_joins_prefix_and_route() {
        let mut ctx = GenerationContext::new("test", "out");
        assert_eq!(ctx.prefixed("/users"), "/users");
        ctx.prefix = "/v1".into();
        assert_eq!(ctx.prefixed("/users"), "/v1/users");
    }

    #[test]
    fn context_from_manifest() {
        let loader = ManifestLoader::load_from_str(
            r#"
[app]
name = "shop"
language = "javascript"
replace-files = true

[route]
method = "dispatch"
file = "dist/app.js"

[adapters.netlify]
prefix = "/v2"
"#,
        )
        .unwrap();
        let ctx = GenerationContext::from_manifest("Netlify", loader.manifest());
        assert_eq!(ctx.adapter, "netlify");
        assert_eq!(ctx.app_name, "shop");
        assert_eq!(ctx.extension(), "js");
        assert!(ctx.replace_files);
        assert_eq!(ctx.route_method, "dispatch");
        assert_eq!(ctx.prefix, "/v2");
        assert_eq!(ctx.source_dir(), PathBuf::from("generated/src"));
    }

    #[test]
    fn init_writes_configs_and_handlers() {
        let dir = tempdir().unwrap();
        write_template(
            dir.path(),
            "{{#each item.imports}}{{this}}\n{{/each}}{{#each methods}}{{method}} {{item.route}} {{../routeMethod}}{{routePath}}\n{{/each}}",
        );
        let generator = DefaultGenerator::new(context(dir.path()));

        let report = init(&generator, classes()).expect("generation");
        let handler = dir.path().join("out/src/Users.ts");
        assert_eq!(report.written, vec![handler.clone()]);
        assert!(report.functions.is_empty());

        let content = fs::read_to_string(handler).unwrap();
        assert_eq!(
            content,
            "import {route} from '@app/routes.js'\nGET /users route[\"Users\"][\"list\"]\n"
        );
        assert!(dir.path().join("out/package.json").exists());
        assert!(dir.path().join("out/.swcrc").exists());
    }

    #[test]
    fn existing_file_is_skipped_without_replace() {
        let dir = tempdir().unwrap();
        write_template(dir.path(), "new");
        let handler = dir.path().join("out/src/Users.ts");
        fs::create_dir_all(handler.parent().unwrap()).unwrap();
        fs::write(&handler, "old").unwrap();

        let generator = DefaultGenerator::new(context(dir.path()));
        let report = init(&generator, classes()).unwrap();
        assert!(report.written.is_empty());
        assert_eq!(report.skipped, vec![handler.clone()]);
        assert_eq!(fs::read_to_string(&handler).unwrap(), "old");

        let mut ctx = context(dir.path());
        ctx.replace_files = true;
        let report = init(&DefaultGenerator::new(ctx), classes()).unwrap();
        assert_eq!(report.written, vec![handler.clone()]);
        assert_eq!(fs::read_to_string(&handler).unwrap(), "new");
    }

    #[test]
    fn missing_handler_template_aborts() {
        let dir = tempdir().unwrap();
        let generator = DefaultGenerator::new(context(dir.path()));
        let err = init(&generator, classes()).expect_err("missing template");
        assert_eq!(
            err.path(),
            Some(dir.path().join("templates/typescript/handler.hbs").as_path())
        );
    }

    #[test]
    fn should_skip_only_existing_files() {
        let dir = tempdir().unwrap();
        let ctx = context(dir.path());
        let path = dir.path().join("file.ts");
        assert!(!should_skip(&ctx, &path));
        fs::write(&path, "").unwrap();
        assert!(should_skip(&ctx, &path));
    }
}
