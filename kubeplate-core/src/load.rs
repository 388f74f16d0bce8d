//! Template loading from disk.
//!
//! Templates are read with `serde_yaml`, which also accepts JSON documents.

use std::path::Path;

use crate::error::CoreError;
use crate::types::{Template, TEMPLATE_KIND};

/// Parse a template from a YAML or JSON string.
pub fn parse_template(source: &str) -> Result<Template, serde_yaml::Error> {
    serde_yaml::from_str(source)
}

/// Read and parse the template at `path`.
///
/// A document with an explicit `kind` other than `Template` is rejected.
pub fn load_template(path: &Path) -> Result<Template, CoreError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let template = parse_template(&contents).map_err(|source| CoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if template.kind != TEMPLATE_KIND {
        return Err(CoreError::NotATemplate {
            kind: template.kind,
        });
    }
    Ok(template)
}
