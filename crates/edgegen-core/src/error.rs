use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures raised while loading inputs or emitting a generated project.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{} does not exist. Make sure you choose a valid language.", .path.display())]
    TemplateMissing { path: PathBuf },
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid template `{name}`: {message}")]
    Template { name: String, message: String },
    #[error("failed to render `{name}`: {message}")]
    Render { name: String, message: String },
    #[error("invalid class catalog {}: {message}", .path.display())]
    Catalog { path: PathBuf, message: String },
    #[error("invalid package manifest {}: {message}", .path.display())]
    Package { path: PathBuf, message: String },
    #[error("invalid manifest: {message}")]
    Manifest { message: String },
}

impl GenerateError {
    pub fn template_missing(path: impl Into<PathBuf>) -> Self {
        GenerateError::TemplateMissing { path: path.into() }
    }

    pub fn io(path: &Path, source: io::Error) -> Self {
        GenerateError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn template(name: impl Into<String>, message: impl ToString) -> Self {
        GenerateError::Template {
            name: name.into(),
            message: message.to_string(),
        }
    }

    pub fn render(name: impl Into<String>, message: impl ToString) -> Self {
        GenerateError::Render {
            name: name.into(),
            message: message.to_string(),
        }
    }

    pub fn catalog(path: &Path, message: impl ToString) -> Self {
        GenerateError::Catalog {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn package(path: &Path, message: impl ToString) -> Self {
        GenerateError::Package {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn manifest(message: impl ToString) -> Self {
        GenerateError::Manifest {
            message: message.to_string(),
        }
    }

    /// Path the error refers to, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            GenerateError::TemplateMissing { path }
            | GenerateError::Io { path, .. }
            | GenerateError::Catalog { path, .. }
            | GenerateError::Package { path, .. } => Some(path),
            _ => None,
        }
    }
}
