//! Template engine — value generation and parameter substitution.
//!
//! # Processing order
//!
//! 1. Generate values for unset parameters that carry a `generate` directive;
//!    flag unset `required` parameters. Any error here stops processing.
//! 2. Substitute parameters in the template message and object labels.
//! 3. For every object: strip a hardcoded namespace, substitute parameters in
//!    all strings (keys included), merge the template labels.
//!
//! Errors from step 3 are collected per object and returned together.
//!
//! # Substitution syntax
//!
//! - `${NAME}` is replaced by the value as a string, anywhere in a string.
//! - `${{NAME}}` must be the whole string; the value is parsed as JSON so it
//!   can produce numbers, booleans or structures.
//! - References to unknown parameters are left untouched.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use kubeplate_core::Template;

use crate::error::{FieldError, ProcessErrors};
use crate::generator::Generator;

static STRING_PARAMETER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([a-zA-Z0-9_]+?)\}").unwrap());
static NON_STRING_PARAMETER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{\{([a-zA-Z0-9_]+)\}\}$").unwrap());

/// Result of evaluating one string against the parameter values.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Evaluated {
    /// Plain string substitution result.
    Text(String),
    /// `${{NAME}}` matched; the value must be decoded as JSON.
    NonString(String),
}

/// Expands a [`Template`] in place.
pub struct TemplateProcessor {
    generators: HashMap<String, Box<dyn Generator>>,
}

impl TemplateProcessor {
    pub fn new(generators: HashMap<String, Box<dyn Generator>>) -> Self {
        TemplateProcessor { generators }
    }

    /// Generate, substitute and label every object of `tmpl`.
    pub fn process(&mut self, tmpl: &mut Template) -> Result<(), ProcessErrors> {
        let errors = self.generate_parameter_values(tmpl);
        if !errors.is_empty() {
            return Err(ProcessErrors(errors));
        }

        let params: HashMap<String, String> = tmpl
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.current_value().to_string()))
            .collect();

        if let Some(message) = tmpl.message.as_mut() {
            *message = substitute_text(&params, message);
        }

        tmpl.labels = std::mem::take(&mut tmpl.labels)
            .into_iter()
            .map(|(k, v)| (substitute_text(&params, &k), substitute_text(&params, &v)))
            .collect();

        let mut errors = Vec::new();
        for (i, item) in tmpl.objects.iter_mut().enumerate() {
            if item.get("kind").and_then(Value::as_str).is_none() {
                errors.push(FieldError::invalid(
                    format!("item[{i}].objects"),
                    "unable to handle object: missing kind",
                ));
                continue;
            }
            strip_namespace(item);
            // Substitute into a copy so a failure leaves the object as it was.
            let mut substituted = item.clone();
            match substitute_parameters(&params, &mut substituted) {
                Ok(()) => *item = substituted,
                Err(detail) => {
                    errors.push(FieldError::invalid(format!("item[{i}].parameters"), detail))
                }
            }
            if let Err(detail) = add_object_labels(item, &tmpl.labels) {
                errors.push(FieldError::invalid(
                    format!("item[{i}].labels"),
                    format!("label could not be applied: {detail}"),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProcessErrors(errors))
        }
    }

    fn generate_parameter_values(&mut self, tmpl: &mut Template) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for (i, param) in tmpl.parameters.iter_mut().enumerate() {
            if param.has_value() {
                continue;
            }
            let path = format!("template.parameters[{i}]");
            if let Some(name) = param.generate.as_deref().filter(|g| !g.is_empty()) {
                let Some(generator) = self.generators.get_mut(name) else {
                    errors.push(FieldError::invalid(
                        path,
                        format!("unknown generator name '{name}' for parameter {}", param.name),
                    ));
                    continue;
                };
                match generator.generate_value(param.from.as_deref().unwrap_or_default()) {
                    Ok(value) => {
                        tracing::debug!(parameter = %param.name, generator = name, "generated parameter value");
                        param.value = Some(value);
                    }
                    Err(e) => {
                        errors.push(FieldError::invalid(path, e.to_string()));
                        continue;
                    }
                }
            }
            if param.required && !param.has_value() {
                errors.push(FieldError::required(
                    path.clone(),
                    format!(
                        "{path}: parameter {} is required and must be specified",
                        param.name
                    ),
                ));
            }
        }
        errors
    }
}

fn evaluate(params: &HashMap<String, String>, input: &str) -> Evaluated {
    if let Some(caps) = NON_STRING_PARAMETER_RE.captures(input) {
        if let Some(value) = params.get(&caps[1]) {
            return Evaluated::NonString(value.clone());
        }
    }
    let out = STRING_PARAMETER_RE.replace_all(input, |caps: &Captures| {
        params
            .get(&caps[1])
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    });
    Evaluated::Text(out.into_owned())
}

/// String-only substitution, used where a JSON value cannot appear.
fn substitute_text(params: &HashMap<String, String>, input: &str) -> String {
    match evaluate(params, input) {
        Evaluated::Text(s) | Evaluated::NonString(s) => s,
    }
}

/// Substitute parameters in every string of `value`, map keys included.
fn substitute_parameters(params: &HashMap<String, String>, value: &mut Value) -> Result<(), String> {
    match value {
        Value::String(s) => {
            let decoded = match evaluate(params, s) {
                Evaluated::Text(out) => Value::String(out),
                Evaluated::NonString(raw) => serde_json::from_str(&raw).map_err(|e| {
                    format!("unable to decode non-string parameter value '{raw}' in '{s}': {e}")
                })?,
            };
            *value = decoded;
        }
        Value::Array(items) => {
            for item in items {
                substitute_parameters(params, item)?;
            }
        }
        Value::Object(map) => {
            let mut substituted = Map::with_capacity(map.len());
            for (key, mut item) in std::mem::take(map) {
                substitute_parameters(params, &mut item)?;
                substituted.insert(substitute_text(params, &key), item);
            }
            *map = substituted;
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
    Ok(())
}

/// Drop `metadata.namespace` unless it references a parameter.
fn strip_namespace(item: &mut Value) {
    let Some(metadata) = item.get_mut("metadata").and_then(Value::as_object_mut) else {
        return;
    };
    let parameterized = metadata
        .get("namespace")
        .and_then(Value::as_str)
        .is_some_and(|ns| STRING_PARAMETER_RE.is_match(ns));
    if !parameterized {
        metadata.remove("namespace");
    }
}

/// Merge `labels` into `metadata.labels`, overwriting keys that collide.
fn add_object_labels(item: &mut Value, labels: &BTreeMap<String, String>) -> Result<(), String> {
    if labels.is_empty() {
        return Ok(());
    }
    let Some(object) = item.as_object_mut() else {
        return Err("object is not a map".to_string());
    };
    let metadata = object
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(metadata) = metadata.as_object_mut() else {
        return Err("metadata is not a map".to_string());
    };
    let existing = metadata
        .entry("labels")
        .or_insert_with(|| Value::Object(Map::new()));
    if existing.is_null() {
        *existing = Value::Object(Map::new());
    }
    let Some(existing) = existing.as_object_mut() else {
        return Err("metadata.labels is not a map".to_string());
    };
    for (key, value) in labels {
        existing.insert(key.clone(), Value::String(value.clone()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
