//! Core types for generating edge-function projects from a route catalog.

pub mod error;
pub mod manifest;
pub mod model;

pub use error::GenerateError;
pub use model::{ClassCatalog, ClassHolder, HttpMethod, Language, MethodHolder};
