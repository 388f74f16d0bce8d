//! Error types for kubeplate-renderer.

use std::fmt;

use thiserror::Error;

use kubeplate_core::ConversionError;

/// All errors that can arise from rendering a template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Parameter generation or substitution failed.
    #[error("unable to process template: {0}")]
    Processing(#[from] ProcessErrors),

    /// A processed object did not decode into its external representation.
    #[error("failed to convert template to external template object: {0}")]
    Conversion(#[from] ConversionError),
}

/// Failures of the `expression` generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("malformed expression syntax: {0}")]
    MalformedExpression(String),

    #[error("invalid range specified: {from}-{to}")]
    InvalidRange { from: char, to: char },

    #[error("range must be within [1-255] characters ({0})")]
    InvalidLength(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorType {
    Invalid,
    Required,
}

/// A single problem located at a path inside the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub error_type: FieldErrorType,
    pub detail: String,
}

impl FieldError {
    pub fn invalid(field: impl Into<String>, detail: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            error_type: FieldErrorType::Invalid,
            detail: detail.into(),
        }
    }

    pub fn required(field: impl Into<String>, detail: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            error_type: FieldErrorType::Required,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.error_type {
            FieldErrorType::Invalid => "Invalid value",
            FieldErrorType::Required => "Required value",
        };
        write!(f, "{}: {}: {}", self.field, kind, self.detail)
    }
}

/// Every error collected while processing one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessErrors(pub Vec<FieldError>);

impl ProcessErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

impl fmt::Display for ProcessErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [single] => fmt::Display::fmt(single, f),
            many => {
                let joined: Vec<String> = many.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}

impl std::error::Error for ProcessErrors {}
