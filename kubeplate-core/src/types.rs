//! Domain types for kubeplate templates and their rendered output.
//!
//! [`Template`] mirrors the `template.openshift.io/v1` shape so existing
//! template files deserialize as-is. Embedded objects stay raw
//! `serde_json::Value`s until the template has been processed.

use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube_core::DynamicObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TEMPLATE_API_VERSION: &str = "template.openshift.io/v1";
pub const TEMPLATE_KIND: &str = "Template";

fn default_api_version() -> String {
    TEMPLATE_API_VERSION.to_string()
}

fn default_kind() -> String {
    TEMPLATE_KIND.to_string()
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// A parameterized collection of resource definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Message shown to the user after instantiation; parameters are substituted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raw embedded object definitions, in declaration order.
    #[serde(default)]
    pub objects: Vec<Value>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Labels merged into every object produced by the template.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl Default for Template {
    fn default() -> Self {
        Template {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: ObjectMeta::default(),
            message: None,
            objects: Vec::new(),
            parameters: Vec::new(),
            labels: BTreeMap::new(),
        }
    }
}

impl Template {
    /// Look up a parameter by exact name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Mutable lookup of a parameter by exact name.
    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters.iter_mut().find(|p| p.name == name)
    }
}

/// A named, substitutable template value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Name of the generator used when no value is set (e.g. `expression`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate: Option<String>,
    /// Generator input, e.g. `[a-z0-9]{8}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl Parameter {
    /// Current value, empty when unset.
    pub fn current_value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// `true` when the parameter carries a non-empty value.
    pub fn has_value(&self) -> bool {
        !self.current_value().is_empty()
    }

    /// Set an explicit value. An explicit value always wins over generation,
    /// so the generator directive is cleared.
    pub fn override_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
        self.generate = None;
    }
}

// ---------------------------------------------------------------------------
// Rendered output
// ---------------------------------------------------------------------------

/// A decoded, self-describing resource ready to be sent to the cluster.
///
/// The variant decides how an already-existing resource is updated:
/// unstructured objects are stamped with the live `resourceVersion` before
/// the update, typed objects are updated as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestObject {
    /// Generic form, identified only by apiVersion/kind/name/namespace.
    Unstructured(DynamicObject),
    /// Kind registered in the [`crate::Scheme`] and validated against its schema.
    Typed(DynamicObject),
}

impl ManifestObject {
    pub fn dynamic(&self) -> &DynamicObject {
        match self {
            ManifestObject::Unstructured(obj) | ManifestObject::Typed(obj) => obj,
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, ManifestObject::Typed(_))
    }

    pub fn api_version(&self) -> &str {
        self.dynamic()
            .types
            .as_ref()
            .map(|t| t.api_version.as_str())
            .unwrap_or_default()
    }

    pub fn kind(&self) -> &str {
        self.dynamic()
            .types
            .as_ref()
            .map(|t| t.kind.as_str())
            .unwrap_or_default()
    }

    /// Version part of the apiVersion (`apps/v1` → `v1`).
    pub fn version(&self) -> &str {
        split_api_version(self.api_version()).1
    }

    pub fn resource_id(&self) -> ResourceId {
        let obj = self.dynamic();
        ResourceId {
            api_version: self.api_version().to_string(),
            kind: self.kind().to_string(),
            name: obj.metadata.name.clone().unwrap_or_default(),
            namespace: obj.metadata.namespace.clone().filter(|ns| !ns.is_empty()),
        }
    }
}

/// One entry of a processed template: the raw payload plus its decoded form.
///
/// `object` is `None` when the payload is not self-describing (no
/// `apiVersion`/`kind`); such entries are skipped when applying.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedObject {
    pub raw: Value,
    pub object: Option<ManifestObject>,
}

impl RenderedObject {
    pub fn kind(&self) -> Option<&str> {
        self.raw.get("kind").and_then(Value::as_str)
    }

    pub fn api_version(&self) -> Option<&str> {
        self.raw.get("apiVersion").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.raw
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.raw
            .get("metadata")
            .and_then(|m| m.get("namespace"))
            .and_then(Value::as_str)
            .filter(|ns| !ns.is_empty())
    }
}

/// Identity used to read back an existing resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
}

impl ResourceId {
    /// Split the apiVersion into `(group, version)`; the core group is `""`.
    pub fn group_version(&self) -> (&str, &str) {
        split_api_version(&self.api_version)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{} in namespace '{}'", self.kind, self.name, ns),
            None => write!(f, "{}/{}", self.kind, self.name),
        }
    }
}

/// Split an apiVersion into `(group, version)`; the core group is `""`.
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    match api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unstructured(value: Value) -> ManifestObject {
        ManifestObject::Unstructured(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn override_value_clears_generator() {
        let mut param = Parameter {
            name: "PASSWORD".to_string(),
            generate: Some("expression".to_string()),
            from: Some("[a-z]{8}".to_string()),
            ..Default::default()
        };
        param.override_value("hunter2");
        assert_eq!(param.current_value(), "hunter2");
        assert!(param.generate.is_none());
        assert_eq!(param.from.as_deref(), Some("[a-z]{8}"));
    }

    #[test]
    fn empty_value_counts_as_unset() {
        let param = Parameter {
            name: "X".to_string(),
            value: Some(String::new()),
            ..Default::default()
        };
        assert!(!param.has_value());
    }

    #[test]
    fn resource_id_of_grouped_kind() {
        let obj = unstructured(json!({
            "apiVersion": "toolchain.dev.openshift.com/v1alpha1",
            "kind": "NSTemplateTier",
            "metadata": { "name": "basic", "namespace": "toolchain-host" }
        }));
        let id = obj.resource_id();
        assert_eq!(id.group_version(), ("toolchain.dev.openshift.com", "v1alpha1"));
        assert_eq!(obj.version(), "v1alpha1");
        assert_eq!(id.to_string(), "NSTemplateTier/basic in namespace 'toolchain-host'");
    }

    #[test]
    fn empty_namespace_is_treated_as_absent() {
        let obj = unstructured(json!({
            "apiVersion": "v1",
            "kind": "Namespace",
            "metadata": { "name": "dev", "namespace": "" }
        }));
        let id = obj.resource_id();
        assert_eq!(id.group_version(), ("", "v1"));
        assert!(id.namespace.is_none());
        assert_eq!(id.to_string(), "Namespace/dev");
    }

    #[test]
    fn rendered_object_accessors_read_raw_payload() {
        let rendered = RenderedObject {
            raw: json!({
                "apiVersion": "v1",
                "kind": "ConfigMap",
                "metadata": { "name": "cfg", "namespace": "ns1" }
            }),
            object: None,
        };
        assert_eq!(rendered.kind(), Some("ConfigMap"));
        assert_eq!(rendered.api_version(), Some("v1"));
        assert_eq!(rendered.name(), Some("cfg"));
        assert_eq!(rendered.namespace(), Some("ns1"));
    }
}
