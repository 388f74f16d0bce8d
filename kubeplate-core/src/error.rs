//! Error types for kubeplate-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a template definition.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure reading the template file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML/JSON parse error on load, with the offending path.
    #[error("failed to parse template at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but is not a `Template`.
    #[error("expected a document of kind 'Template', found '{kind}'")]
    NotATemplate { kind: String },
}

/// A rendered object could not be decoded into its external representation.
#[derive(Debug, Error)]
#[error("unable to decode object of kind '{kind}' (apiVersion '{api_version}'): {source}")]
pub struct ConversionError {
    pub api_version: String,
    pub kind: String,
    #[source]
    pub source: serde_json::Error,
}
