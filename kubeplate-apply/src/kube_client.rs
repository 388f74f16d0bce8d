//! [`ClusterClient`] backed by a live cluster through kube-rs.
//!
//! Every call resolves the object's group/version/kind with
//! `discovery::pinned_kind`, then talks to `Api<DynamicObject>` scoped to the
//! resource: cluster-wide for cluster-scoped kinds, the object's namespace
//! (or the client's default namespace) for namespaced ones.

use async_trait::async_trait;
use kube::api::{Api, DynamicObject, PostParams};
use kube::core::GroupVersionKind;
use kube::discovery::{self, Scope};
use kube::Client;

use kubeplate_core::{types::split_api_version, ResourceId};

use crate::client::{ClientError, ClusterClient};

pub struct KubeClusterClient {
    client: Client,
}

impl KubeClusterClient {
    pub fn new(client: Client) -> Self {
        KubeClusterClient { client }
    }

    async fn api_for(
        &self,
        api_version: &str,
        kind: &str,
        namespace: Option<&str>,
    ) -> Result<Api<DynamicObject>, ClientError> {
        let (group, version) = split_api_version(api_version);
        let gvk = GroupVersionKind::gvk(group, version, kind);
        let (resource, capabilities) = discovery::pinned_kind(&self.client, &gvk).await?;
        let api = match (capabilities.scope, namespace) {
            (Scope::Cluster, _) => Api::all_with(self.client.clone(), &resource),
            (Scope::Namespaced, Some(ns)) => {
                Api::namespaced_with(self.client.clone(), ns, &resource)
            }
            (Scope::Namespaced, None) => {
                Api::default_namespaced_with(self.client.clone(), &resource)
            }
        };
        Ok(api)
    }

    async fn api_for_object(&self, obj: &DynamicObject) -> Result<Api<DynamicObject>, ClientError> {
        let types = obj.types.as_ref().ok_or(ClientError::MissingTypeMeta)?;
        let namespace = obj.metadata.namespace.as_deref().filter(|ns| !ns.is_empty());
        self.api_for(&types.api_version, &types.kind, namespace).await
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn create(&self, obj: &DynamicObject) -> Result<DynamicObject, ClientError> {
        let api = self.api_for_object(obj).await?;
        Ok(api.create(&PostParams::default(), obj).await?)
    }

    async fn get(&self, id: &ResourceId) -> Result<DynamicObject, ClientError> {
        let api = self
            .api_for(&id.api_version, &id.kind, id.namespace.as_deref())
            .await?;
        Ok(api.get(&id.name).await?)
    }

    async fn update(&self, obj: &DynamicObject) -> Result<DynamicObject, ClientError> {
        let name = obj.metadata.name.as_deref().ok_or_else(|| ClientError::MissingName {
            kind: obj
                .types
                .as_ref()
                .map(|t| t.kind.clone())
                .unwrap_or_default(),
        })?;
        let api = self.api_for_object(obj).await?;
        Ok(api.replace(name, &PostParams::default(), obj).await?)
    }
}
