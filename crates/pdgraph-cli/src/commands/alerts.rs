//! Alert commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use pdgraph_core::reference::ALERTS;
use pdgraph_core::{Frame, GraphRef, PageArgs};
use pdgraph_graph::alerts::AlertArgs;
use pdgraph_graph::{ActorArgs, Graph};

use super::requested_fields;
use crate::output;

#[derive(Subcommand)]
pub enum AlertCommands {
    /// List the alerts of an incident
    List {
        /// Incident ID
        incident: String,

        /// Page size
        #[arg(long)]
        limit: Option<u64>,

        /// Starting offset
        #[arg(long)]
        offset: Option<u64>,

        /// Number of pages to follow; stops early on an empty page
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Show one alert
    Get {
        /// Incident ID
        incident: String,

        /// Alert ID
        alert_id: String,

        /// Comma-separated fields to request (e.g. "id"); defaults to all
        #[arg(long)]
        select: Option<String>,
    },

    /// Re-trigger an alert
    Trigger(AlertTransitionArgs),

    /// Resolve an alert
    Resolve(AlertTransitionArgs),
}

#[derive(Args)]
pub struct AlertTransitionArgs {
    /// Incident ID
    pub incident: String,

    /// Alert ID
    pub alert_id: String,

    /// Email of the acting PagerDuty user (sent as the From header)
    #[arg(long, env = "PDGRAPH_EMAIL")]
    pub email: Option<String>,
}

pub async fn execute(cmd: AlertCommands, graph: &Graph) -> Result<()> {
    match cmd {
        AlertCommands::List {
            incident,
            limit,
            offset,
            pages,
        } => {
            let collection = GraphRef::incident(&incident).into_path().child(Frame::new(ALERTS));
            let args = PageArgs {
                limit,
                offset,
                ..PageArgs::default()
            };
            let mut page = graph.alerts().page(args, &collection).await?;

            for n in 1..=pages.max(1) {
                if n > 1 {
                    println!();
                }
                output::print_alerts_table(&page.items);
                if page.items.is_empty() || n == pages.max(1) {
                    break;
                }
                page = graph.alerts().page(page.next.args.clone(), &page.next.path).await?;
            }
            output::print_next(&page.next);
        }

        AlertCommands::Get {
            incident,
            alert_id,
            select,
        } => {
            let collection = GraphRef::incident(&incident).into_path().child(Frame::new(ALERTS));
            let requested = requested_fields(select.as_deref());
            let alert = graph
                .alerts()
                .one(AlertArgs { alert_id }, &collection, &requested)
                .await?;
            output::print_alert(&incident, &alert);
        }

        AlertCommands::Trigger(args) => {
            let gref = GraphRef::alert(&args.incident, &args.alert_id);
            let ack = graph
                .alert()
                .triggered(gref.path(), ActorArgs { email: args.email })
                .await?;
            println!("{} Triggered alert {}", "✓".green().bold(), args.alert_id.cyan());
            output::print_json(&ack);
        }

        AlertCommands::Resolve(args) => {
            let gref = GraphRef::alert(&args.incident, &args.alert_id);
            let ack = graph
                .alert()
                .resolved(gref.path(), ActorArgs { email: args.email })
                .await?;
            println!("{} Resolved alert {}", "✓".green().bold(), args.alert_id.cyan());
            output::print_json(&ack);
        }
    }

    Ok(())
}
