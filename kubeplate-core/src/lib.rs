//! kubeplate core library — template data model, rendered objects, type scheme.
//!
//! - [`types`] — [`Template`], [`Parameter`], [`RenderedObject`], [`ManifestObject`]
//! - [`scheme`] — [`Scheme`], the registry of strongly-typed kinds
//! - [`error`] — [`CoreError`], [`ConversionError`]
//! - [`load`] — reading templates from YAML/JSON files

pub mod error;
pub mod load;
pub mod scheme;
pub mod types;

pub use error::{ConversionError, CoreError};
pub use scheme::Scheme;
pub use types::{
    ManifestObject, Parameter, RenderedObject, ResourceId, Template,
};
