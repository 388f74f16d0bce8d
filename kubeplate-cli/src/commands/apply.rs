//! `kubeplate apply` — render a template and reconcile it into a cluster.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use tabled::{settings::Style, Table, Tabled};

use kubeplate_apply::{ApplyAction, ApplyOutcome, Applier, KubeClusterClient};
use kubeplate_core::RenderedObject;

use super::RenderArgs;

/// Arguments for `kubeplate apply`.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub render: RenderArgs,

    /// Kubeconfig context to use instead of the current one.
    #[arg(long, env = "KUBEPLATE_CONTEXT")]
    pub context: Option<String>,

    /// Namespace for namespaced objects that do not set one.
    #[arg(short, long, env = "KUBEPLATE_NAMESPACE")]
    pub namespace: Option<String>,

    /// Print what would be applied without contacting a cluster.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "namespace")]
    namespace: String,
    #[tabled(rename = "result")]
    result: String,
}

impl ApplyArgs {
    pub async fn run(self) -> Result<()> {
        let objects = self.render.render()?;

        if self.dry_run {
            print_dry_run(&objects);
            return Ok(());
        }

        let client = connect(self.context.as_deref(), self.namespace.as_deref()).await?;
        let applier = Applier::new(KubeClusterClient::new(client));
        let outcomes = applier
            .apply(&objects)
            .await
            .with_context(|| format!("failed to apply '{}'", self.render.template.display()))?;
        print_outcomes(&outcomes);
        Ok(())
    }
}

async fn connect(context: Option<&str>, namespace: Option<&str>) -> Result<Client> {
    let mut config = match context {
        Some(context) => {
            let options = KubeConfigOptions {
                context: Some(context.to_string()),
                ..Default::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .with_context(|| format!("failed to load kubeconfig context '{context}'"))?
        }
        None => Config::infer()
            .await
            .context("failed to infer cluster configuration")?,
    };
    if let Some(namespace) = namespace {
        config.default_namespace = namespace.to_string();
    }
    Client::try_from(config).context("failed to build cluster client")
}

fn print_dry_run(objects: &[RenderedObject]) {
    let rows: Vec<OutcomeRow> = objects
        .iter()
        .map(|obj| OutcomeRow {
            kind: obj.kind().unwrap_or("-").to_string(),
            name: obj.name().unwrap_or("-").to_string(),
            namespace: obj.namespace().unwrap_or("-").to_string(),
            result: if obj.object.is_some() {
                "would apply".to_string()
            } else {
                "skipped".bright_black().to_string()
            },
        })
        .collect();
    println!("[dry-run] {} objects rendered", objects.len());
    if rows.is_empty() {
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn print_outcomes(outcomes: &[ApplyOutcome]) {
    if outcomes.is_empty() {
        println!("Nothing to apply.");
        return;
    }
    let rows: Vec<OutcomeRow> = outcomes
        .iter()
        .map(|outcome| OutcomeRow {
            kind: outcome.id.kind.clone(),
            name: outcome.id.name.clone(),
            namespace: outcome.id.namespace.clone().unwrap_or_else(|| "-".to_string()),
            result: action_label(outcome.action),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn action_label(action: ApplyAction) -> String {
    match action {
        ApplyAction::Created => action.to_string().green().bold().to_string(),
        ApplyAction::Updated => action.to_string().yellow().bold().to_string(),
    }
}
