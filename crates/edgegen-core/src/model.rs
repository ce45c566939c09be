//! Route catalog handed to adapters by class discovery.
//!
//! Discovery itself happens outside this workspace; it serializes what it
//! found into a JSON catalog:
//!
//! ```json
//! {
//!   "classes": [
//!     {
//!       "name": "Users",
//!       "methods": [
//!         { "name": "list", "route": "/users", "method": "GET", "routeSteps": ["Users", "list"] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::GenerateError;

/// One routed method of a discovered class.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MethodHolder {
    pub name: String,
    pub route: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub route_steps: Vec<String>,
}

impl MethodHolder {
    /// Last non-empty segment of the route, ignoring trailing slashes.
    pub fn last_route_segment(&self) -> Option<&str> {
        self.route.split('/').rev().find(|segment| !segment.is_empty())
    }

    /// Accessor expression built from the route steps, e.g. `["Users"]["list"]`.
    pub fn route_path(&self) -> String {
        self.route_steps
            .iter()
            .map(|step| format!("[\"{}\"]", step))
            .collect()
    }
}

/// A discovered source class and its routed methods.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassHolder {
    pub name: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodHolder>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ClassCatalog {
    #[serde(default)]
    pub classes: Vec<ClassHolder>,
}

impl ClassCatalog {
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn from_path(path: &Path) -> Result<Self, GenerateError> {
        let contents =
            std::fs::read_to_string(path).map_err(|err| GenerateError::io(path, err))?;
        let catalog = Self::from_json(&contents).map_err(|err| GenerateError::catalog(path, err))?;
        log::debug!(
            "loaded {} classes from {}",
            catalog.classes.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn into_classes(self) -> Vec<ClassHolder> {
        self.classes
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HttpMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            "OPTIONS" => Ok(Self::Options),
            "HEAD" => Ok(Self::Head),
            other => Err(serde::de::Error::custom(format!(
                "unsupported HTTP method `{}`",
                other
            ))),
        }
    }
}

/// Target language of the generated project.
///
/// Any value is accepted; an unsupported language surfaces later as a
/// missing template directory.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn typescript() -> Self {
        Self::new("typescript")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_typescript(&self) -> bool {
        self.0.eq_ignore_ascii_case("typescript")
    }

    /// Source extension for generated files.
    pub fn extension(&self) -> &'static str {
        if self.is_typescript() {
            "ts"
        } else {
            "js"
        }
    }

    /// Directory name under the template root.
    pub fn template_dir(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::typescript()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
