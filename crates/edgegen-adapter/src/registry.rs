use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use crate::generator::{CodeGenerator, GenerationContext};

/// Commands run against a project after it has been generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterAction {
    Build,
    Deploy,
    Serve,
}

impl AdapterAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterAction::Build => "build",
            AdapterAction::Deploy => "deploy",
            AdapterAction::Serve => "serve",
        }
    }
}

impl fmt::Display for AdapterAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deployment target known to the CLI.
pub trait Adapter: Sync + Send {
    /// Lookup key; matched without regard to case.
    fn name(&self) -> &'static str;

    /// Generator emitting this target's project layout.
    fn generator(&self, context: GenerationContext) -> Box<dyn CodeGenerator>;

    /// Runs `action` in the generated project, forwarding `args` to the tool.
    fn execute(&self, action: AdapterAction, args: &[String]) -> Result<(), String>;
}

type AdapterMap = HashMap<String, &'static dyn Adapter>;

static ADAPTERS: Lazy<RwLock<AdapterMap>> = Lazy::new(|| RwLock::new(AdapterMap::new()));

pub fn register_adapter(adapter: &'static dyn Adapter) {
    let key = adapter.name().to_ascii_lowercase();
    log::trace!("registering adapter `{}`", key);
    ADAPTERS
        .write()
        .expect("edgegen adapter registry lock poisoned")
        .insert(key, adapter);
}

pub fn get_adapter(name: &str) -> Option<&'static dyn Adapter> {
    ADAPTERS
        .read()
        .expect("edgegen adapter registry lock poisoned")
        .get(&name.to_ascii_lowercase())
        .copied()
}

/// Registered adapter keys in lexical order.
pub fn registered_adapters() -> Vec<String> {
    let adapters = ADAPTERS
        .read()
        .expect("edgegen adapter registry lock poisoned");
    let mut keys: Vec<String> = adapters.keys().cloned().collect();
    keys.sort();
    keys
}
