//! Template processing entrypoint: overrides → expansion → conversion → filters.

use std::collections::HashMap;

use kubeplate_core::{RenderedObject, Scheme, Template};

use crate::engine::TemplateProcessor;
use crate::error::RenderError;
use crate::filter::{filter, FilterFunc};
use crate::generator::{ExpressionValueGenerator, Generator};

/// Name under which the random-expression generator is registered.
pub const EXPRESSION_GENERATOR: &str = "expression";

/// The generator set used by [`Processor::process`], freshly seeded from the
/// current time on every call.
pub fn default_generators() -> HashMap<String, Box<dyn Generator>> {
    let mut generators: HashMap<String, Box<dyn Generator>> = HashMap::new();
    generators.insert(
        EXPRESSION_GENERATOR.to_string(),
        Box::new(ExpressionValueGenerator::from_time()),
    );
    generators
}

/// Renders templates into the objects to apply.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    scheme: Scheme,
}

impl Processor {
    pub fn new(scheme: Scheme) -> Self {
        Processor { scheme }
    }

    /// Substitute `values` into `tmpl`, expand it, and return the objects
    /// accepted by every filter in `filters`.
    ///
    /// Overrides naming a parameter that the template does not declare are
    /// skipped. `tmpl` is left holding the substituted parameters and
    /// processed objects.
    pub fn process(
        &self,
        tmpl: &mut Template,
        values: &HashMap<String, String>,
        filters: &[FilterFunc],
    ) -> Result<Vec<RenderedObject>, RenderError> {
        self.process_with_generators(tmpl, values, filters, default_generators())
    }

    /// Same as [`Processor::process`] with a caller-provided generator set.
    pub fn process_with_generators(
        &self,
        tmpl: &mut Template,
        values: &HashMap<String, String>,
        filters: &[FilterFunc],
        generators: HashMap<String, Box<dyn Generator>>,
    ) -> Result<Vec<RenderedObject>, RenderError> {
        for (name, value) in values {
            match tmpl.parameter_mut(name) {
                Some(param) => {
                    param.override_value(value.as_str());
                    tracing::debug!(parameter = %name, "parameter overridden");
                }
                None => tracing::debug!(parameter = %name, "override ignored: no such parameter"),
            }
        }

        TemplateProcessor::new(generators).process(tmpl)?;

        let objects = self.scheme.convert(tmpl.objects.clone())?;
        Ok(filter(objects, filters))
    }
}
