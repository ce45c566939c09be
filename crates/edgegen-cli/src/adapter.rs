use std::path::{Path, PathBuf};

use edgegen_adapter::cli_support::{find_manifest_below, find_manifest_upwards};
use edgegen_adapter::command::run_shell;
use edgegen_adapter::{self as adapter_registry, Adapter, AdapterAction};
use edgegen_core::manifest::{Manifest, ManifestLoader, MANIFEST_FILE};

/// Environment variable pointing at an explicit manifest.
pub const MANIFEST_ENV: &str = "EDGEGEN_MANIFEST";

/// Registers the adapters compiled into this binary.
pub fn register_linked_adapters() {
    #[cfg(feature = "edgegen-adapter-netlify")]
    edgegen_adapter_netlify::cli::register();
}

/// Loads the manifest from `explicit`, `EDGEGEN_MANIFEST`, or the nearest
/// `edgegen.toml`. Returns `None` when no manifest exists anywhere.
pub fn load_manifest(explicit: Option<&Path>) -> Result<Option<ManifestLoader>, String> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => match std::env::var_os(MANIFEST_ENV) {
            Some(value) => Some(PathBuf::from(value)),
            None => {
                let cwd = std::env::current_dir().map_err(|e| e.to_string())?;
                discover_manifest(&cwd)
            }
        },
    };

    let Some(path) = path else {
        log::debug!("no {} found, using defaults", MANIFEST_FILE);
        return Ok(None);
    };
    log::debug!("loading manifest {}", path.display());
    ManifestLoader::from_path(&path)
        .map(Some)
        .map_err(|err| format!("failed to load {}: {}", path.display(), err))
}

fn discover_manifest(start: &Path) -> Option<PathBuf> {
    find_manifest_upwards(start, MANIFEST_FILE)
        .or_else(|| find_manifest_below(start, start, MANIFEST_FILE))
}

pub fn resolve_adapter(adapter_name: &str) -> Result<&'static dyn Adapter, String> {
    adapter_registry::get_adapter(adapter_name).ok_or_else(|| {
        let available = adapter_registry::registered_adapters();
        if available.is_empty() {
            format!(
                "adapter `{}` is not registered in this build. Rebuild `edgegen-cli` with the `edgegen-adapter-{}` feature enabled.",
                adapter_name, adapter_name
            )
        } else {
            format!(
                "adapter `{}` is not registered (available: {})",
                adapter_name,
                available.join(", ")
            )
        }
    })
}

/// Runs `action`: a manifest command wins, otherwise the adapter's default.
pub fn execute(
    adapter_name: &str,
    action: AdapterAction,
    manifest: Option<&ManifestLoader>,
    adapter_args: &[String],
) -> Result<(), String> {
    if let Some(manifest) = manifest {
        let manifest = manifest.manifest();
        if let Some(command) = manifest_command(manifest, adapter_name, action) {
            let cwd = manifest.destination_dir();
            return run_shell(&command, &cwd, &action.to_string(), adapter_args);
        }
    }

    let adapter = resolve_adapter(adapter_name)?;
    adapter.execute(action, adapter_args)
}

pub(crate) fn manifest_command(
    manifest: &Manifest,
    adapter_name: &str,
    action: AdapterAction,
) -> Option<String> {
    let commands = manifest.adapter_config(adapter_name).commands;
    match action {
        AdapterAction::Build => commands.build,
        AdapterAction::Deploy => commands.deploy,
        AdapterAction::Serve => commands.serve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"
[app]
destination = "out"

[adapters.Netlify.commands]
build = "touch built"
deploy = "exit 4"
"#;

    #[test]
    fn manifest_command_is_case_insensitive() {
        let loader = ManifestLoader::load_from_str(MANIFEST).unwrap();
        let manifest = loader.manifest();
        assert_eq!(
            manifest_command(manifest, "netlify", AdapterAction::Build).as_deref(),
            Some("touch built")
        );
        assert!(manifest_command(manifest, "netlify", AdapterAction::Serve).is_none());
    }

    #[test]
    fn execute_runs_manifest_command_in_destination() {
        let dir = tempdir().unwrap();
        let manifest_path = dir.path().join(MANIFEST_FILE);
        fs::write(&manifest_path, MANIFEST).unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        let loader = ManifestLoader::from_path(&manifest_path).unwrap();

        execute("netlify", AdapterAction::Build, Some(&loader), &[]).expect("build");
        assert!(dir.path().join("out/built").exists());

        let err = execute("netlify", AdapterAction::Deploy, Some(&loader), &[]).unwrap_err();
        assert!(err.contains("exited with status"));
    }

    #[test]
    fn unknown_adapter_is_reported() {
        let err = execute("does-not-exist", AdapterAction::Build, None, &[]).unwrap_err();
        assert!(err.contains("does-not-exist"));
    }

    #[test]
    fn load_manifest_from_explicit_path() {
        let dir = tempdir().unwrap();
        let manifest_path = dir.path().join("custom.toml");
        fs::write(&manifest_path, "[app]\nname = \"shop\"\n").unwrap();

        let loader = load_manifest(Some(&manifest_path)).unwrap().expect("manifest");
        assert_eq!(loader.manifest().app.name.as_deref(), Some("shop"));
        assert_eq!(loader.manifest().root(), Some(dir.path()));
    }

    #[test]
    fn load_manifest_reports_invalid_file() {
        let dir = tempdir().unwrap();
        let manifest_path = dir.path().join(MANIFEST_FILE);
        fs::write(&manifest_path, "[app]\nprefix = \"v1\"\n").unwrap();

        let err = load_manifest(Some(&manifest_path)).err().expect("invalid prefix");
        assert!(err.contains("failed to load"));
    }

    #[test]
    fn discover_manifest_searches_below() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("app");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join(MANIFEST_FILE), "").unwrap();

        assert_eq!(discover_manifest(dir.path()), Some(nested.join(MANIFEST_FILE)));
    }
}
