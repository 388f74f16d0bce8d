//! Registry of strongly-typed kinds.
//!
//! Decoding a processed template object through the [`Scheme`] picks the
//! [`ManifestObject`] variant: kinds registered here are validated against
//! their `k8s-openapi` type and come back as [`ManifestObject::Typed`];
//! anything else is [`ManifestObject::Unstructured`]. Either way the decoded
//! object carries the raw payload unchanged.

use std::collections::HashMap;

use k8s_openapi::api::apps::v1 as appsv1;
use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::api::networking::v1 as networkingv1;
use k8s_openapi::api::rbac::v1 as rbacv1;
use k8s_openapi::Resource;
use kube_core::DynamicObject;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::ConversionError;
use crate::types::{ManifestObject, RenderedObject};

type DecodeFn = fn(&Value) -> Result<DynamicObject, serde_json::Error>;

fn decode_typed<K>(raw: &Value) -> Result<DynamicObject, serde_json::Error>
where
    K: Resource + DeserializeOwned + Serialize,
{
    // Schema check only; the payload sent is the raw object, unmodelled fields included.
    serde_json::from_value::<K>(raw.clone())?;
    serde_json::from_value(raw.clone())
}

/// Maps `(apiVersion, kind)` to the decoder of a strongly-typed resource.
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    typed: HashMap<(String, String), DecodeFn>,
}

impl Scheme {
    /// An empty scheme: every object decodes as unstructured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheme with the common core, apps, rbac and networking kinds registered.
    pub fn with_builtin_types() -> Self {
        let mut scheme = Scheme::new();
        scheme.register::<corev1::Namespace>();
        scheme.register::<corev1::ConfigMap>();
        scheme.register::<corev1::Secret>();
        scheme.register::<corev1::Service>();
        scheme.register::<corev1::ServiceAccount>();
        scheme.register::<corev1::PersistentVolumeClaim>();
        scheme.register::<corev1::LimitRange>();
        scheme.register::<corev1::ResourceQuota>();
        scheme.register::<appsv1::Deployment>();
        scheme.register::<appsv1::StatefulSet>();
        scheme.register::<appsv1::DaemonSet>();
        scheme.register::<rbacv1::Role>();
        scheme.register::<rbacv1::RoleBinding>();
        scheme.register::<rbacv1::ClusterRole>();
        scheme.register::<rbacv1::ClusterRoleBinding>();
        scheme.register::<networkingv1::NetworkPolicy>();
        scheme.register::<networkingv1::Ingress>();
        scheme
    }

    /// Register `K` as a strongly-typed kind.
    pub fn register<K>(&mut self)
    where
        K: Resource + DeserializeOwned + Serialize,
    {
        self.typed.insert(
            (K::API_VERSION.to_string(), K::KIND.to_string()),
            decode_typed::<K>,
        );
    }

    pub fn is_registered(&self, api_version: &str, kind: &str) -> bool {
        self.typed
            .contains_key(&(api_version.to_string(), kind.to_string()))
    }

    /// Decode one raw object.
    ///
    /// Returns `Ok(None)` when the payload carries no `apiVersion`/`kind`.
    pub fn decode(&self, raw: &Value) -> Result<Option<ManifestObject>, ConversionError> {
        let (Some(api_version), Some(kind)) = (
            raw.get("apiVersion").and_then(Value::as_str).filter(|s| !s.is_empty()),
            raw.get("kind").and_then(Value::as_str).filter(|s| !s.is_empty()),
        ) else {
            return Ok(None);
        };

        let conversion_err = |source| ConversionError {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            source,
        };

        match self.typed.get(&(api_version.to_string(), kind.to_string())) {
            Some(decode) => decode(raw)
                .map(|obj| Some(ManifestObject::Typed(obj)))
                .map_err(conversion_err),
            None => serde_json::from_value::<DynamicObject>(raw.clone())
                .map(|obj| Some(ManifestObject::Unstructured(obj)))
                .map_err(conversion_err),
        }
    }

    /// Convert processed template objects into their external representation.
    pub fn convert(&self, objects: Vec<Value>) -> Result<Vec<RenderedObject>, ConversionError> {
        objects
            .into_iter()
            .map(|raw| {
                let object = self.decode(&raw)?;
                Ok(RenderedObject { raw, object })
            })
            .collect()
    }
}
