//! Reference resolution command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pdgraph_core::GraphRef;
use pdgraph_graph::Graph;

use super::requested_fields;
use crate::output;

#[derive(Args)]
pub struct RefArgs {
    /// Node reference, e.g. 'root.incidents.one(id: "P1").alerts.one(alert_id: "A1")'
    pub gref: String,

    /// Comma-separated fields to request (e.g. "id"); defaults to all
    #[arg(long)]
    pub select: Option<String>,
}

pub async fn execute(args: RefArgs, graph: &Graph) -> Result<()> {
    let gref: GraphRef = args
        .gref
        .parse()
        .with_context(|| format!("Not a node reference: {}", args.gref))?;

    println!("{} {}", "Provider path:".dimmed(), gref.provider_path()?);

    let requested = requested_fields(args.select.as_deref());
    let resolved = graph.resolve_ref(&gref, &requested).await?;
    output::print_json(&resolved.into_json());
    Ok(())
}
