pub mod apply;
pub mod process;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use kubeplate_core::{load::load_template, RenderedObject, Scheme};
use kubeplate_renderer::{filter, FilterFunc, Processor};

/// Flags shared by every command that renders a template.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template file (YAML or JSON).
    pub template: PathBuf,

    /// Parameter override, `NAME=VALUE`. Repeatable.
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// File of `NAME=VALUE` lines; `-p` wins over entries in the file.
    #[arg(long, value_name = "FILE")]
    pub param_file: Option<PathBuf>,

    /// Keep only objects of this kind. Repeatable.
    #[arg(long = "kind", value_name = "KIND")]
    pub kinds: Vec<String>,

    /// Keep only Namespace objects.
    #[arg(long, conflicts_with = "skip_namespaces")]
    pub namespaces_only: bool,

    /// Drop Namespace objects.
    #[arg(long)]
    pub skip_namespaces: bool,
}

impl RenderArgs {
    /// Load, process and filter the template.
    pub fn render(&self) -> Result<Vec<RenderedObject>> {
        let mut template = load_template(&self.template)
            .with_context(|| format!("failed to load template '{}'", self.template.display()))?;
        let values = self.values()?;

        let processor = Processor::new(Scheme::with_builtin_types());
        processor
            .process(&mut template, &values, &self.filters())
            .with_context(|| format!("failed to render '{}'", self.template.display()))
    }

    fn values(&self) -> Result<HashMap<String, String>> {
        let mut values = match &self.param_file {
            Some(path) => read_param_file(path)?,
            None => HashMap::new(),
        };
        values.extend(self.params.iter().cloned());
        Ok(values)
    }

    fn filters(&self) -> Vec<FilterFunc> {
        let mut filters = Vec::new();
        if !self.kinds.is_empty() {
            filters.push(filter::retain_kinds(self.kinds.iter().cloned()));
        }
        if self.namespaces_only {
            filters.push(filter::retain_namespaces());
        }
        if self.skip_namespaces {
            filters.push(filter::retain_all_but_namespaces());
        }
        filters
    }
}

fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

fn read_param_file(path: &Path) -> Result<HashMap<String, String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read parameter file '{}'", path.display()))?;
    let mut values = HashMap::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_param(line) {
            Ok((name, value)) => {
                values.insert(name, value);
            }
            Err(err) => bail!("{}:{}: {err}", path.display(), idx + 1),
        }
    }
    Ok(values)
}
