//! Incident commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use pdgraph_core::reference::INCIDENTS;
use pdgraph_core::{Frame, GraphRef, PageArgs, PathContext};
use pdgraph_graph::incidents::IncidentArgs;
use pdgraph_graph::{ActorArgs, Graph};
use serde_json::Value;

use super::requested_fields;
use crate::output;

#[derive(Subcommand)]
pub enum IncidentCommands {
    /// List incidents page by page
    List(ListArgs),

    /// Show one incident
    Get {
        /// Incident ID
        id: String,

        /// Comma-separated fields to request (e.g. "id"); defaults to all
        #[arg(long)]
        select: Option<String>,
    },

    /// Acknowledge an incident
    Ack(TransitionArgs),

    /// Resolve an incident
    Resolve(TransitionArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Page size
    #[arg(long)]
    pub limit: Option<u64>,

    /// Starting offset
    #[arg(long)]
    pub offset: Option<u64>,

    /// Only incidents with these statuses (triggered, acknowledged, resolved)
    #[arg(long = "status", value_delimiter = ',')]
    pub statuses: Vec<String>,

    /// Only incidents with this urgency (high, low)
    #[arg(long)]
    pub urgency: Option<String>,

    /// Number of pages to follow; stops early on an empty page
    #[arg(long, default_value = "1")]
    pub pages: u32,
}

#[derive(Args)]
pub struct TransitionArgs {
    /// Incident ID
    pub id: String,

    /// Email of the acting PagerDuty user (sent as the From header)
    #[arg(long, env = "PDGRAPH_EMAIL")]
    pub email: Option<String>,
}

impl ListArgs {
    pub(crate) fn page_args(&self) -> PageArgs {
        let mut args = PageArgs {
            limit: self.limit,
            offset: self.offset,
            ..PageArgs::default()
        };
        if !self.statuses.is_empty() {
            args.filters.insert(
                "statuses".to_string(),
                Value::Array(self.statuses.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(urgency) = &self.urgency {
            args.filters.insert("urgencies".to_string(), Value::Array(vec![Value::String(urgency.clone())]));
        }
        args
    }
}

pub async fn execute(cmd: IncidentCommands, graph: &Graph) -> Result<()> {
    match cmd {
        IncidentCommands::List(args) => {
            let collection = PathContext::root().child(Frame::new(INCIDENTS));
            let mut page = graph.incidents().page(args.page_args(), &collection).await?;

            for n in 1..=args.pages.max(1) {
                if n > 1 {
                    println!();
                }
                output::print_incidents_table(&page.items);
                if page.items.is_empty() || n == args.pages.max(1) {
                    break;
                }
                page = graph.incidents().page(page.next.args.clone(), &page.next.path).await?;
            }
            output::print_next(&page.next);
        }

        IncidentCommands::Get { id, select } => {
            let requested = requested_fields(select.as_deref());
            let incident = graph.incidents().one(IncidentArgs { id }, &requested).await?;
            output::print_incident(&incident);
        }

        IncidentCommands::Ack(args) => {
            let gref = GraphRef::incident(&args.id);
            let ack = graph
                .incident()
                .acknowledged(gref.path(), ActorArgs { email: args.email })
                .await?;
            println!("{} Acknowledged incident {}", "✓".green().bold(), args.id.cyan());
            output::print_json(&ack);
        }

        IncidentCommands::Resolve(args) => {
            let gref = GraphRef::incident(&args.id);
            let ack = graph
                .incident()
                .resolved(gref.path(), ActorArgs { email: args.email })
                .await?;
            println!("{} Resolved incident {}", "✓".green().bold(), args.id.cyan());
            output::print_json(&ack);
        }
    }

    Ok(())
}
