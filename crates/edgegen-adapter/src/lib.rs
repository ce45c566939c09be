mod registry;

pub use registry::{get_adapter, register_adapter, registered_adapters, Adapter, AdapterAction};

pub mod command;
pub mod generator;
pub mod package;
pub mod scaffold;
pub mod template;

#[cfg(feature = "cli")]
pub mod cli_support;
