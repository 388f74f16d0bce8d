//! `kubeplate process` — render a template to stdout.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use kubeplate_core::RenderedObject;

use super::RenderArgs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Multi-document YAML stream.
    #[default]
    Yaml,
    /// A single `v1` `List`.
    Json,
}

/// Arguments for `kubeplate process`.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub render: RenderArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,
}

impl ProcessArgs {
    pub fn run(self) -> Result<()> {
        let objects = self.render.render()?;
        print!("{}", format_objects(&objects, self.output)?);
        Ok(())
    }
}

pub fn format_objects(objects: &[RenderedObject], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => {
            let mut out = String::new();
            for obj in objects {
                out.push_str("---\n");
                out.push_str(
                    &serde_yaml::to_string(&obj.raw).context("failed to serialize object as YAML")?,
                );
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let items: Vec<&Value> = objects.iter().map(|obj| &obj.raw).collect();
            let list = json!({
                "apiVersion": "v1",
                "kind": "List",
                "items": items,
            });
            let mut out =
                serde_json::to_string_pretty(&list).context("failed to serialize list as JSON")?;
            out.push('\n');
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(raw: Value) -> RenderedObject {
        RenderedObject { raw, object: None }
    }

    #[test]
    fn yaml_output_is_one_document_per_object() {
        let objs = [
            rendered(json!({ "kind": "Namespace", "metadata": { "name": "a" } })),
            rendered(json!({ "kind": "Namespace", "metadata": { "name": "b" } })),
        ];
        let out = format_objects(&objs, OutputFormat::Yaml).unwrap();
        assert_eq!(out.matches("---\n").count(), 2);
        assert!(out.starts_with("---\n"));
        assert!(out.contains("name: b"));
    }

    #[test]
    fn json_output_wraps_objects_in_a_list() {
        let objs = [rendered(json!({ "kind": "ConfigMap" }))];
        let out = format_objects(&objs, OutputFormat::Json).unwrap();
        let list: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(list["kind"], "List");
        assert_eq!(list["items"][0]["kind"], "ConfigMap");
    }

    #[test]
    fn empty_render_prints_nothing_as_yaml() {
        assert_eq!(format_objects(&[], OutputFormat::Yaml).unwrap(), "");
    }
}
