//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdgraph_api::{Gateway, Hosts, DEFAULT_API_URL, DEFAULT_EVENTS_URL};
use pdgraph_core::{ConfigStore, RequestedFields};
use pdgraph_graph::Graph;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

pub mod alerts;
pub mod config;
pub mod event;
pub mod incidents;
pub mod reference;
pub mod serve;

/// pdgraph - PagerDuty incidents and alerts as a navigable graph
#[derive(Parser)]
#[command(name = "pdgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, env = "PDGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// PagerDuty REST API base URL
    #[arg(long, global = true, env = "PAGERDUTY_API_URL", default_value = DEFAULT_API_URL, hide_default_value = true)]
    pub api_url: String,

    /// PagerDuty Events API base URL
    #[arg(long, global = true, env = "PAGERDUTY_EVENTS_URL", default_value = DEFAULT_EVENTS_URL, hide_default_value = true)]
    pub events_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store API and routing keys
    Configure(config::ConfigureArgs),

    /// Show whether an API key is configured
    Status,

    /// Incident commands
    #[command(subcommand)]
    Incidents(incidents::IncidentCommands),

    /// Alert commands (scoped under an incident)
    #[command(subcommand)]
    Alerts(alerts::AlertCommands),

    /// Resolve a node reference such as 'root.incidents.one(id: "P123")'
    Ref(reference::RefArgs),

    /// Send an event through the Events API
    Event(event::EventArgs),

    /// Start the HTTP server
    Serve(serve::ServeArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let store = Arc::new(load_store(self.config)?);
        let hosts = Hosts {
            api: self.api_url,
            events: self.events_url,
        };
        let graph = Arc::new(Graph::new(Arc::new(Gateway::new(store, hosts))));

        match self.command {
            Commands::Configure(args) => config::configure(args, &graph),
            Commands::Status => config::status(&graph),
            Commands::Incidents(cmd) => incidents::execute(cmd, &graph).await,
            Commands::Alerts(cmd) => alerts::execute(cmd, &graph).await,
            Commands::Ref(args) => reference::execute(args, &graph).await,
            Commands::Event(args) => event::execute(args, &graph).await,
            Commands::Serve(args) => serve::execute(args, graph).await,
        }
    }
}

fn load_store(path: Option<PathBuf>) -> Result<ConfigStore> {
    match path.or_else(ConfigStore::default_path) {
        Some(path) => ConfigStore::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => {
            warn!("No configuration directory available, settings will not persist");
            Ok(ConfigStore::in_memory())
        }
    }
}

/// Parse a comma-separated `--select` list. No list means the full entity.
pub(crate) fn requested_fields(select: Option<&str>) -> RequestedFields {
    match select {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect(),
        None => RequestedFields::all(),
    }
}
