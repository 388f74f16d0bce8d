//! The cluster API surface consumed by the applier.

use async_trait::async_trait;
use kube::api::DynamicObject;
use kube::core::ErrorResponse;
use thiserror::Error;

use kubeplate_core::ResourceId;

const ALREADY_EXISTS_REASON: &str = "AlreadyExists";
const CONFLICT_STATUS: u16 = 409;

/// Errors returned by a [`ClusterClient`].
///
/// Control flow only ever distinguishes [`ClientError::AlreadyExists`];
/// every other variant is reported as-is.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API server rejected a create because the resource exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Any other status returned by the API server.
    #[error("API error: {0}")]
    Api(#[source] ErrorResponse),

    /// Transport, discovery or serialization failure.
    #[error("kube client error: {0}")]
    Kube(#[source] kube::Error),

    /// The object carries no apiVersion/kind and cannot be routed.
    #[error("object has no apiVersion/kind")]
    MissingTypeMeta,

    /// The object has no `metadata.name`, so it cannot be read or replaced.
    #[error("object of kind '{kind}' has no name")]
    MissingName { kind: String },
}

impl ClientError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, ClientError::AlreadyExists(_))
    }
}

impl From<kube::Error> for ClientError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp)
                if resp.code == CONFLICT_STATUS && resp.reason == ALREADY_EXISTS_REASON =>
            {
                ClientError::AlreadyExists(resp.message)
            }
            kube::Error::Api(resp) => ClientError::Api(resp),
            other => ClientError::Kube(other),
        }
    }
}

/// Generic resource store: create, read back, replace.
///
/// Implementations are expected to be safe to share across calls.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn create(&self, obj: &DynamicObject) -> Result<DynamicObject, ClientError>;

    async fn get(&self, id: &ResourceId) -> Result<DynamicObject, ClientError>;

    async fn update(&self, obj: &DynamicObject) -> Result<DynamicObject, ClientError>;
}
