//! Netlify Edge Functions adapter for EdgeGen.

#[cfg(feature = "cli")]
pub mod cli;

mod generator;
mod templates;

pub use generator::{
    NetlifyEdgeGenerator, WebpackEntry, DEFAULT_FUNCTION_TEMPLATE, EDGE_FUNCTIONS_DIR,
    NETLIFY_CONFIG_FILE, NETLIFY_TEMPLATE, WEBPACK_CONFIG_FILE, WEBPACK_TEMPLATE,
};
pub use templates::NETLIFY_TEMPLATE_REGISTRATIONS;
