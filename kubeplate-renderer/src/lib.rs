//! # kubeplate-renderer
//!
//! Template expansion: parameter overrides, value generation, `${NAME}`
//! substitution and filtering of the rendered objects.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//!
//! use kubeplate_core::{load::load_template, Scheme};
//! use kubeplate_renderer::{filter::retain_all_but_namespaces, Processor};
//!
//! fn render(path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut template = load_template(path)?;
//!     let values = HashMap::from([("USERNAME".to_string(), "johnsmith".to_string())]);
//!     let processor = Processor::new(Scheme::with_builtin_types());
//!     let objects = processor.process(&mut template, &values, &[retain_all_but_namespaces()])?;
//!     println!("{} objects", objects.len());
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod filter;
pub mod generator;
pub mod processor;

pub use engine::TemplateProcessor;
pub use error::{FieldError, FieldErrorType, GeneratorError, ProcessErrors, RenderError};
pub use filter::{filter, FilterFunc};
pub use generator::{ExpressionValueGenerator, Generator};
pub use processor::{default_generators, Processor};
