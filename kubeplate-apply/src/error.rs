//! Error types for kubeplate-apply.

use thiserror::Error;

use kubeplate_core::ResourceId;

use crate::client::ClientError;

/// Failure applying a batch; carries the kind/version of the offending object.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("unable to create resource of kind: {kind}, version: {version}: {source}")]
    Resource {
        kind: String,
        version: String,
        #[source]
        source: ReconcileError,
    },
}

/// The step of the create-or-update sequence that failed for one object.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to create object {id}: {source}")]
    Create {
        id: ResourceId,
        #[source]
        source: ClientError,
    },

    #[error("unable to get the resource of kind '{kind}' and name '{name}' in namespace '{namespace}': {source}")]
    Get {
        kind: String,
        name: String,
        namespace: String,
        #[source]
        source: ClientError,
    },

    #[error("unable to update the resource of kind '{kind}' and name '{name}' in namespace '{namespace}': {source}")]
    Update {
        kind: String,
        name: String,
        namespace: String,
        #[source]
        source: ClientError,
    },
}

impl ReconcileError {
    pub(crate) fn get(id: &ResourceId, source: ClientError) -> Self {
        ReconcileError::Get {
            kind: id.kind.clone(),
            name: id.name.clone(),
            namespace: id.namespace.clone().unwrap_or_default(),
            source,
        }
    }

    pub(crate) fn update(id: &ResourceId, source: ClientError) -> Self {
        ReconcileError::Update {
            kind: id.kind.clone(),
            name: id.name.clone(),
            namespace: id.namespace.clone().unwrap_or_default(),
            source,
        }
    }

    /// The client error underneath this step.
    pub fn client_error(&self) -> &ClientError {
        match self {
            ReconcileError::Create { source, .. }
            | ReconcileError::Get { source, .. }
            | ReconcileError::Update { source, .. } => source,
        }
    }
}
