//! # kubeplate-apply
//!
//! Idempotent create-or-update of rendered template objects.
//!
//! [`Applier::apply`] walks the objects in order and, for each one, tries a
//! create; when the resource already exists it falls back to an update. The
//! cluster is reached through the [`ClusterClient`] trait, implemented for a
//! live cluster by [`KubeClusterClient`].

pub mod applier;
pub mod client;
pub mod error;
pub mod kube_client;

pub use applier::{create_or_update, ApplyAction, ApplyOutcome, Applier};
pub use client::{ClientError, ClusterClient};
pub use error::{ApplyError, ReconcileError};
pub use kube_client::KubeClusterClient;
