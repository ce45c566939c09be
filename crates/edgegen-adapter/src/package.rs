//! `package.json` and `.swcrc` for the generated project.

use std::path::Path;

use edgegen_core::{GenerateError, Language};
use serde_json::{json, Map, Value};

pub const PACKAGE_FILE: &str = "package.json";
pub const SWC_CONFIG_FILE: &str = ".swcrc";

const BASE_SCRIPTS: &[(&str, &str)] = &[
    ("clean", "rm -rf api public"),
    ("create:public:folder", "mkdir -p public"),
    ("build", "yarn clean && yarn create:public:folder && swc src -d api"),
    ("start", "yarn build && node api/index.js"),
];

const BASE_DEV_DEPENDENCIES: &[(&str, &str)] = &[("@swc/cli", "^0.1.62"), ("@swc/core", "^1.3.50")];

/// In-memory `package.json`, seeded from an existing file when present so
/// hand-edited keys survive regeneration.
#[derive(Clone, Debug)]
pub struct PackageManifest {
    root: Map<String, Value>,
}

impl PackageManifest {
    pub fn new(name: &str) -> Self {
        let mut root = Map::new();
        root.insert("name".into(), Value::String(name.to_string()));
        root.insert("version".into(), Value::String("1.0.0".into()));
        root.insert("private".into(), Value::Bool(true));
        let mut manifest = Self { root };
        for (script, command) in BASE_SCRIPTS {
            manifest.set_script(script, command);
        }
        for (dep, version) in BASE_DEV_DEPENDENCIES {
            manifest.add_dev_dependency(dep, version);
        }
        manifest
    }

    /// Reads `<dir>/package.json`, falling back to a fresh manifest named `name`.
    pub fn load_or_new(dir: &Path, name: &str) -> Result<Self, GenerateError> {
        let path = dir.join(PACKAGE_FILE);
        if !path.exists() {
            return Ok(Self::new(name));
        }
        let contents =
            std::fs::read_to_string(&path).map_err(|err| GenerateError::io(&path, err))?;
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(root)) => Ok(Self { root }),
            Ok(_) => Err(GenerateError::package(
                &path,
                "top-level value must be an object",
            )),
            Err(err) => Err(GenerateError::package(&path, err)),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.root.get("name").and_then(Value::as_str)
    }

    pub fn add_dependency(&mut self, name: &str, version: &str) {
        self.table_mut("dependencies")
            .insert(name.to_string(), Value::String(version.to_string()));
    }

    pub fn add_dev_dependency(&mut self, name: &str, version: &str) {
        self.table_mut("devDependencies")
            .insert(name.to_string(), Value::String(version.to_string()));
    }

    /// Sets or overrides one script, keeping the others.
    pub fn set_script(&mut self, name: &str, command: &str) {
        self.table_mut("scripts")
            .insert(name.to_string(), Value::String(command.to_string()));
    }

    pub fn script(&self, name: &str) -> Option<&str> {
        self.table("scripts")
            .and_then(|scripts| scripts.get(name))
            .and_then(Value::as_str)
    }

    pub fn dependency(&self, name: &str) -> Option<&str> {
        self.table("dependencies")
            .and_then(|deps| deps.get(name))
            .and_then(Value::as_str)
    }

    pub fn write(&self, dir: &Path) -> Result<(), GenerateError> {
        let path = dir.join(PACKAGE_FILE);
        let mut rendered = serde_json::to_string_pretty(&self.root)
            .map_err(|err| GenerateError::render(PACKAGE_FILE, err))?;
        rendered.push('\n');
        std::fs::write(&path, rendered).map_err(|err| GenerateError::io(&path, err))
    }

    fn table(&self, key: &str) -> Option<&Map<String, Value>> {
        self.root.get(key).and_then(Value::as_object)
    }

    fn table_mut(&mut self, key: &str) -> &mut Map<String, Value> {
        let entry = self
            .root
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        match entry {
            Value::Object(map) => map,
            _ => unreachable!("entry was just replaced with an object"),
        }
    }
}

/// swc compiler settings matching the generated sources.
pub fn swc_config(language: &Language) -> Value {
    let parser = if language.is_typescript() {
        json!({ "syntax": "typescript" })
    } else {
        json!({ "syntax": "ecmascript" })
    };
    json!({
        "jsc": {
            "parser": parser,
            "target": "es2021",
            "paths": { "@app/*": ["./*"] },
            "baseUrl": "."
        },
        "module": { "type": "es6" }
    })
}

pub fn write_swc_config(dir: &Path, config: &Value) -> Result<(), GenerateError> {
    let path = dir.join(SWC_CONFIG_FILE);
    let mut rendered = serde_json::to_string_pretty(config)
        .map_err(|err| GenerateError::render(SWC_CONFIG_FILE, err))?;
    rendered.push('\n');
    std::fs::write(&path, rendered).map_err(|err| GenerateError::io(&path, err))
}
