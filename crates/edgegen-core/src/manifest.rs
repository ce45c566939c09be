use log::LevelFilter;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::error::GenerateError;
use crate::model::Language;

/// Default manifest file name looked up by the CLI.
pub const MANIFEST_FILE: &str = "edgegen.toml";

const DEFAULT_DESTINATION: &str = "generated";
const DEFAULT_CATALOG: &str = "classes.json";
const DEFAULT_TEMPLATE_ROOT: &str = "templates";
const DEFAULT_ROUTE_METHOD: &str = "route";

pub struct ManifestLoader {
    manifest: Arc<Manifest>,
}

impl ManifestLoader {
    pub fn load_from_str(contents: &str) -> Result<Self, GenerateError> {
        let mut manifest: Manifest = toml::from_str(contents).map_err(GenerateError::manifest)?;
        manifest.validate().map_err(GenerateError::manifest)?;
        manifest.finalize();
        Ok(Self {
            manifest: Arc::new(manifest),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, io::Error> {
        let contents = std::fs::read_to_string(path)?;
        let mut manifest: Manifest = toml::from_str(&contents)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let cwd = std::env::current_dir()?;
        let root_path = resolve_root_path(path, &cwd);
        manifest.root = Some(root_path);
        manifest
            .validate()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
        manifest.finalize();
        Ok(Self {
            manifest: Arc::new(manifest),
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

fn resolve_root_path(path: &Path, cwd: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => cwd.to_path_buf(),
        Some(parent) if parent.is_relative() => cwd.join(parent),
        Some(parent) => parent.to_path_buf(),
        None => cwd.to_path_buf(),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct Manifest {
    #[serde(default)]
    #[validate(nested)]
    pub app: ManifestApp,
    #[serde(default)]
    #[validate(nested)]
    pub route: ManifestRoute,
    #[serde(default)]
    #[validate(nested)]
    pub adapters: BTreeMap<String, ManifestAdapter>,
    #[serde(default)]
    pub logging: ManifestLogging,
    #[serde(skip)]
    pub(crate) root: Option<PathBuf>,
}

impl Manifest {
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Resolves `relative` against the manifest directory (or the current
    /// directory when the manifest was not loaded from disk).
    pub fn resolve(&self, relative: &str) -> PathBuf {
        let candidate = Path::new(relative);
        if candidate.is_absolute() {
            return candidate.to_path_buf();
        }
        match self.root() {
            Some(root) => root.join(candidate),
            None => candidate.to_path_buf(),
        }
    }

    pub fn destination_dir(&self) -> PathBuf {
        self.resolve(self.app.destination.as_deref().unwrap_or(DEFAULT_DESTINATION))
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.resolve(self.app.catalog.as_deref().unwrap_or(DEFAULT_CATALOG))
    }

    pub fn template_root(&self) -> PathBuf {
        self.resolve(self.app.templates.as_deref().unwrap_or(DEFAULT_TEMPLATE_ROOT))
    }

    pub fn route_method(&self) -> &str {
        self.route.method.as_deref().unwrap_or(DEFAULT_ROUTE_METHOD)
    }

    pub fn log_level(&self) -> LogLevel {
        self.logging.level.unwrap_or_default()
    }

    /// Settings for one adapter with defaults applied; lookup is case-insensitive.
    pub fn adapter_config(&self, adapter: &str) -> ResolvedAdapterConfig {
        self.adapters
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(adapter))
            .map(|(_, cfg)| ResolvedAdapterConfig::from_manifest(cfg))
            .unwrap_or_else(|| ResolvedAdapterConfig {
                prefix: self.app.prefix.clone().unwrap_or_default(),
                ..Default::default()
            })
    }

    fn finalize(&mut self) {
        let Some(prefix) = &self.app.prefix else {
            return;
        };
        for cfg in self.adapters.values_mut() {
            cfg.prefix.get_or_insert_with(|| prefix.clone());
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestApp {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub destination: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub catalog: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub templates: Option<String>,
    /// Overwrite generated handler files that already exist.
    #[serde(default, rename = "replace-files")]
    pub replace_files: bool,
    /// Prefix applied to every adapter that does not declare its own.
    #[serde(default)]
    #[validate(custom(function = "validate_prefix"))]
    pub prefix: Option<String>,
}

/// Symbol the generated handlers import to dispatch requests.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestRoute {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub method: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestAdapter {
    #[serde(default)]
    #[validate(custom(function = "validate_prefix"))]
    pub prefix: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub commands: ManifestAdapterCommands,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct ManifestAdapterCommands {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub build: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub serve: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub deploy: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ResolvedAdapterConfig {
    pub prefix: String,
    pub commands: ManifestAdapterCommands,
}

impl ResolvedAdapterConfig {
    fn from_manifest(cfg: &ManifestAdapter) -> Self {
        Self {
            prefix: cfg.prefix.clone().unwrap_or_default(),
            commands: cfg.commands.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ManifestLogging {
    #[serde(default)]
    pub level: Option<LogLevel>,
}

fn validate_prefix(prefix: &String) -> Result<(), ValidationError> {
    if prefix.is_empty() || prefix.starts_with('/') {
        Ok(())
    } else {
        let mut err = ValidationError::new("prefix");
        err.message = Some(format!("prefix `{prefix}` must be empty or start with `/`").into());
        Err(err)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "off" => Ok(Self::Off),
            other => Err(serde::de::Error::custom(format!(
                "logging level must be trace, debug, info, warn, error, or off (got `{}`)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, tempdir_in};

    const SAMPLE: &str = r#"
[app]
name = "demo"
language = "javascript"
destination = "out/netlify"
catalog = "build/classes.json"
replace-files = true

[route]
method = "handleRoute"
file = "dist/routes.js"

[adapters.netlify]
prefix = "/v1"

[adapters.netlify.commands]
build = "yarn build"
serve = "netlify dev"

[logging]
level = "debug"
"#;

    fn load(contents: &str) -> ManifestLoader {
        ManifestLoader::load_from_str(contents).expect("manifest")
    }

    #[test]
    fn parse_manifest_sample() {
        let loader = load(SAMPLE);
        let manifest = loader.manifest();
        assert_eq!(manifest.app.name.as_deref(), Some("demo"));
        assert_eq!(manifest.app.language, Language::new("javascript"));
        assert!(manifest.app.replace_files);
        assert_eq!(manifest.route_method(), "handleRoute");
        assert_eq!(manifest.route.file.as_deref(), Some("dist/routes.js"));
        assert_eq!(manifest.log_level(), LogLevel::Debug);
    }

    #[test]
    fn adapter_config_applies_defaults() {
        let loader = load(SAMPLE);
        let manifest = loader.manifest();

        let netlify = manifest.adapter_config("Netlify");
        assert_eq!(netlify.prefix, "/v1");
        assert_eq!(netlify.commands.build.as_deref(), Some("yarn build"));
        assert!(netlify.commands.deploy.is_none());

        let unknown = manifest.adapter_config("other");
        assert_eq!(unknown.prefix, "");
        assert!(unknown.commands.build.is_none());
    }

    #[test]
    fn app_prefix_fills_adapters_without_one() {
        let loader = load(
            r#"
[app]
prefix = "/api"

[adapters.netlify]

[adapters.custom]
prefix = "/custom"
"#,
        );
        let manifest = loader.manifest();
        assert_eq!(manifest.adapter_config("netlify").prefix, "/api");
        assert_eq!(manifest.adapter_config("custom").prefix, "/custom");
        assert_eq!(manifest.adapter_config("undeclared").prefix, "/api");
    }

    #[test]
    fn empty_manifest_has_defaults() {
        let loader = load("");
        let m = loader.manifest();
        assert!(m.app.name.is_none());
        assert_eq!(m.app.language, Language::typescript());
        assert!(!m.app.replace_files);
        assert_eq!(m.route_method(), "route");
        assert_eq!(m.destination_dir(), PathBuf::from("generated"));
        assert_eq!(m.catalog_path(), PathBuf::from("classes.json"));
        assert_eq!(m.template_root(), PathBuf::from("templates"));
        assert_eq!(m.log_level(), LogLevel::Info);
        assert!(m.adapters.is_empty());
        assert!(m.root().is_none());
    }

    #[test]
    fn rejects_prefix_without_leading_slash() {
        let err = ManifestLoader::load_from_str("[adapters.netlify]\nprefix = \"v1\"")
            .err()
            .expect("invalid prefix");
        assert!(matches!(err, GenerateError::Manifest { .. }));
    }

    #[test]
    fn rejects_empty_destination() {
        assert!(ManifestLoader::load_from_str("[app]\ndestination = \"\"").is_err());
    }

    #[test]
    fn manifest_from_path_resolves_paths_against_root() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, SAMPLE).unwrap();

        let loader = ManifestLoader::from_path(&path).expect("manifest");
        let manifest = loader.manifest();
        assert_eq!(manifest.root(), Some(dir.path()));
        assert_eq!(manifest.destination_dir(), dir.path().join("out/netlify"));
        assert_eq!(
            manifest.catalog_path(),
            dir.path().join("build/classes.json")
        );
        assert_eq!(manifest.template_root(), dir.path().join("templates"));
    }

    #[test]
    fn absolute_paths_are_kept() {
        let dir = tempdir().unwrap();
        let absolute = dir.path().join("elsewhere");
        let contents = format!("[app]\ndestination = \"{}\"", absolute.display());
        let loader = load(&contents);
        assert_eq!(loader.manifest().destination_dir(), absolute);
    }

    #[test]
    fn manifest_from_path_handles_relative_parent() {
        let cwd = std::env::current_dir().unwrap();
        let dir = tempdir_in(&cwd).unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, "").unwrap();

        let relative = path.strip_prefix(&cwd).unwrap().to_path_buf();
        let loader = ManifestLoader::from_path(&relative).expect("manifest");
        let expected = cwd.join(relative.parent().unwrap());
        assert_eq!(loader.manifest().root(), Some(expected.as_path()));
    }

    #[test]
    fn resolve_root_path_uses_cwd_when_parent_is_empty() {
        let dir = tempdir().unwrap();
        let cwd = dir.path();
        assert_eq!(resolve_root_path(Path::new(MANIFEST_FILE), cwd), cwd);
        assert_eq!(resolve_root_path(Path::new(""), cwd), cwd);
    }

    #[test]
    fn manifest_from_path_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = ManifestLoader::from_path(&dir.path().join("missing.toml"))
            .err()
            .expect("missing manifest");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn manifest_from_path_reports_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, "not = [").unwrap();

        let err = ManifestLoader::from_path(&path)
            .err()
            .expect("invalid manifest");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn log_level_converts_to_level_filter() {
        let cases = [
            (LogLevel::Trace, LevelFilter::Trace),
            (LogLevel::Debug, LevelFilter::Debug),
            (LogLevel::Info, LevelFilter::Info),
            (LogLevel::Warn, LevelFilter::Warn),
            (LogLevel::Error, LevelFilter::Error),
            (LogLevel::Off, LevelFilter::Off),
        ];

        for (level, expected) in cases {
            assert_eq!(LevelFilter::from(level), expected);
        }
    }

    #[test]
    fn log_level_rejects_invalid_value() {
        let err = toml::from_str::<ManifestLogging>("level = \"loud\"")
            .expect_err("invalid log level");
        assert!(err
            .to_string()
            .contains("logging level must be trace, debug, info, warn, error, or off"));
    }

    #[test]
    fn log_level_as_str() {
        assert_eq!(LogLevel::Warn.as_str(), "warn");
        assert_eq!(LogLevel::Off.as_str(), "off");
    }
}
