//! In-memory [`ClusterClient`] that records every call.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use kube::api::DynamicObject;
use kube::core::ErrorResponse;

use kubeplate_apply::{ClientError, ClusterClient};
use kubeplate_core::ResourceId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    Get(String),
    Update {
        name: String,
        resource_version: Option<String>,
    },
}

type Key = (String, String, Option<String>);

fn key_of(obj: &DynamicObject) -> Key {
    (
        obj.types.as_ref().map(|t| t.kind.clone()).unwrap_or_default(),
        obj.metadata.name.clone().unwrap_or_default(),
        obj.metadata.namespace.clone().filter(|ns| !ns.is_empty()),
    )
}

fn status(code: u16, reason: &str, message: String) -> ClientError {
    ClientError::Api(ErrorResponse {
        status: "Failure".to_string(),
        message,
        reason: reason.to_string(),
        code,
    })
}

/// Stores objects by kind/name/namespace and bumps `resourceVersion` on
/// every write. An update carrying a stale `resourceVersion` is rejected
/// with a 409 Conflict; an update without one is accepted.
#[derive(Default)]
pub struct FakeCluster {
    store: Mutex<HashMap<Key, DynamicObject>>,
    calls: Mutex<Vec<Call>>,
    reject_create: HashSet<String>,
    default_namespace: Option<String>,
    next_version: Mutex<u64>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates of an object with this name fail with 422 Invalid.
    pub fn rejecting_create_of(mut self, name: &str) -> Self {
        self.reject_create.insert(name.to_string());
        self
    }

    /// Objects other than Namespaces sent without a namespace land in `ns`.
    pub fn with_default_namespace(mut self, ns: &str) -> Self {
        self.default_namespace = Some(ns.to_string());
        self
    }

    /// Seed an existing object; returns its resourceVersion.
    pub fn seed(&self, obj: &DynamicObject) -> String {
        let mut stored = obj.clone();
        let version = self.bump();
        stored.metadata.resource_version = Some(version.clone());
        self.store.lock().unwrap().insert(key_of(obj), stored);
        version
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored(&self, kind: &str, name: &str, namespace: Option<&str>) -> Option<DynamicObject> {
        let key = (kind.to_string(), name.to_string(), namespace.map(str::to_string));
        self.store.lock().unwrap().get(&key).cloned()
    }

    fn placed(&self, obj: &DynamicObject) -> DynamicObject {
        let mut obj = obj.clone();
        let is_namespace = obj.types.as_ref().is_some_and(|t| t.kind == "Namespace");
        if obj.metadata.namespace.is_none() && !is_namespace {
            obj.metadata.namespace = self.default_namespace.clone();
        }
        obj
    }

    fn bump(&self) -> String {
        let mut next = self.next_version.lock().unwrap();
        *next += 1;
        next.to_string()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn create(&self, obj: &DynamicObject) -> Result<DynamicObject, ClientError> {
        let obj = &self.placed(obj);
        let key = key_of(obj);
        self.record(Call::Create(key.1.clone()));
        if self.reject_create.contains(&key.1) {
            return Err(status(422, "Invalid", format!("{} is invalid", key.1)));
        }
        let mut store = self.store.lock().unwrap();
        if store.contains_key(&key) {
            return Err(ClientError::AlreadyExists(format!("{} already exists", key.1)));
        }
        let mut created = obj.clone();
        created.metadata.resource_version = Some(self.bump());
        store.insert(key, created.clone());
        Ok(created)
    }

    async fn get(&self, id: &ResourceId) -> Result<DynamicObject, ClientError> {
        self.record(Call::Get(id.name.clone()));
        let namespace = match (&id.namespace, id.kind.as_str()) {
            (None, kind) if kind != "Namespace" => self.default_namespace.clone(),
            (ns, _) => ns.clone(),
        };
        let key = (id.kind.clone(), id.name.clone(), namespace);
        self.store
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| status(404, "NotFound", format!("{} not found", id.name)))
    }

    async fn update(&self, obj: &DynamicObject) -> Result<DynamicObject, ClientError> {
        let obj = &self.placed(obj);
        let key = key_of(obj);
        self.record(Call::Update {
            name: key.1.clone(),
            resource_version: obj.metadata.resource_version.clone(),
        });
        let mut store = self.store.lock().unwrap();
        let Some(current) = store.get(&key) else {
            return Err(status(404, "NotFound", format!("{} not found", key.1)));
        };
        if let Some(requested) = &obj.metadata.resource_version {
            if current.metadata.resource_version.as_ref() != Some(requested) {
                return Err(status(409, "Conflict", "the object has been modified".to_string()));
            }
        }
        let mut updated = obj.clone();
        updated.metadata.resource_version = Some(self.bump());
        store.insert(key, updated.clone());
        Ok(updated)
    }
}
