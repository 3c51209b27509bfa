//! Configure and status commands.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pdgraph_core::{ConfigUpdate, Status};
use pdgraph_graph::Graph;

#[derive(Args)]
pub struct ConfigureArgs {
    /// PagerDuty REST API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Events API integration (routing) key
    #[arg(long)]
    pub routing_key: Option<String>,
}

pub fn configure(args: ConfigureArgs, graph: &Graph) -> Result<()> {
    let status = graph.root().configure(ConfigUpdate {
        api_key: args.api_key,
        routing_key: args.routing_key,
    })?;

    if let Some(path) = graph.gateway().config().path() {
        println!("{} Saved configuration to {}", "✓".green().bold(), path.display().to_string().dimmed());
    }
    print_status(status);
    Ok(())
}

pub fn status(graph: &Graph) -> Result<()> {
    print_status(graph.root().status());
    Ok(())
}

fn print_status(status: Status) {
    match status {
        Status::Ready => println!("{} {}", "●".green().bold(), status.message().bold()),
        Status::NotConfigured => println!("{} {}", "●".yellow().bold(), status.message()),
    }
}
