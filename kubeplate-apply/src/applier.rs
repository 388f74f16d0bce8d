//! Create-or-update of rendered objects.
//!
//! ## Per-object sequence
//!
//! 1. `create` the object. Success → [`ApplyAction::Created`].
//! 2. Any create error other than "already exists" is terminal.
//! 3. Already exists:
//!    - unstructured: `get` the live resource, copy its `resourceVersion`
//!      onto the desired object, `update`;
//!    - typed: `update` directly, without reading back.
//!
//! Objects are applied one at a time in input order. The first failure
//! aborts the batch; objects already applied stay applied.

use std::fmt;

use kube::api::DynamicObject;

use kubeplate_core::{ManifestObject, RenderedObject, ResourceId};

use crate::client::ClusterClient;
use crate::error::{ApplyError, ReconcileError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyAction {
    Created,
    Updated,
}

impl fmt::Display for ApplyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyAction::Created => write!(f, "created"),
            ApplyAction::Updated => write!(f, "updated"),
        }
    }
}

/// What happened to one applied object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub id: ResourceId,
    pub action: ApplyAction,
}

/// Applies rendered objects through a [`ClusterClient`].
pub struct Applier<C> {
    client: C,
}

impl<C: ClusterClient> Applier<C> {
    pub fn new(client: C) -> Self {
        Applier { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Create or update every decodable object in `objs`, in order.
    ///
    /// Entries without a decoded object are skipped. Returns on the first
    /// failure with the kind/version of the object that failed.
    pub async fn apply(&self, objs: &[RenderedObject]) -> Result<Vec<ApplyOutcome>, ApplyError> {
        let mut outcomes = Vec::with_capacity(objs.len());
        for rendered in objs {
            let Some(obj) = rendered.object.as_ref() else {
                tracing::debug!(kind = ?rendered.kind(), "skipping entry without a decodable object");
                continue;
            };
            let outcome = create_or_update(&self.client, obj)
                .await
                .map_err(|source| ApplyError::Resource {
                    kind: obj.kind().to_string(),
                    version: obj.version().to_string(),
                    source,
                })?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

/// Create `obj`, falling back to an update when it already exists.
///
/// The outcome's namespace is the one the server stored the object in, so a
/// namespaced object sent without one reports the client's default namespace.
pub async fn create_or_update<C>(
    client: &C,
    obj: &ManifestObject,
) -> Result<ApplyOutcome, ReconcileError>
where
    C: ClusterClient + ?Sized,
{
    let id = obj.resource_id();
    tracing::debug!(%id, "creating resource");
    match client.create(obj.dynamic()).await {
        Ok(live) => {
            tracing::info!(%id, "created");
            return Ok(outcome(id, ApplyAction::Created, &live));
        }
        Err(err) if err.is_already_exists() => {}
        Err(source) => return Err(ReconcileError::Create { id, source }),
    }

    let live = match obj {
        ManifestObject::Unstructured(desired) => {
            let existing = client
                .get(&id)
                .await
                .map_err(|source| ReconcileError::get(&id, source))?;
            let mut desired = desired.clone();
            desired.metadata.resource_version = existing.metadata.resource_version;
            client
                .update(&desired)
                .await
                .map_err(|source| ReconcileError::update(&id, source))?
        }
        ManifestObject::Typed(desired) => client
            .update(desired)
            .await
            .map_err(|source| ReconcileError::update(&id, source))?,
    };
    tracing::info!(%id, "updated");
    Ok(outcome(id, ApplyAction::Updated, &live))
}

fn outcome(mut id: ResourceId, action: ApplyAction, live: &DynamicObject) -> ApplyOutcome {
    if let Some(ns) = live.metadata.namespace.as_deref().filter(|ns| !ns.is_empty()) {
        id.namespace = Some(ns.to_string());
    }
    ApplyOutcome { id, action }
}
