//! Events API command.

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use pdgraph_graph::Graph;
use serde_json::{json, Value};

use crate::output;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EventAction {
    Trigger,
    Acknowledge,
    Resolve,
}

impl EventAction {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Acknowledge => "acknowledge",
            Self::Resolve => "resolve",
        }
    }
}

#[derive(Args)]
pub struct EventArgs {
    /// Event action
    #[arg(long, value_enum, default_value = "trigger")]
    pub action: EventAction,

    /// Summary of the problem (required to trigger)
    #[arg(long)]
    pub summary: Option<String>,

    /// Affected system (required to trigger)
    #[arg(long)]
    pub source: Option<String>,

    /// Severity (critical, error, warning, info)
    #[arg(long, default_value = "error")]
    pub severity: String,

    /// Deduplication key (required to acknowledge or resolve)
    #[arg(long)]
    pub dedup_key: Option<String>,

    /// Integration key; defaults to the configured routing key
    #[arg(long)]
    pub routing_key: Option<String>,
}

/// Build an Events API v2 payload.
pub(crate) fn build_payload(args: &EventArgs, routing_key: &str) -> Result<Value> {
    let mut event = json!({
        "routing_key": routing_key,
        "event_action": args.action.as_str(),
    });

    if let Some(dedup_key) = &args.dedup_key {
        event["dedup_key"] = json!(dedup_key);
    }

    match args.action {
        EventAction::Trigger => {
            let (Some(summary), Some(source)) = (&args.summary, &args.source) else {
                bail!("--summary and --source are required to trigger an event");
            };
            event["payload"] = json!({
                "summary": summary,
                "source": source,
                "severity": args.severity,
            });
        }
        EventAction::Acknowledge | EventAction::Resolve => {
            if args.dedup_key.is_none() {
                bail!("--dedup-key is required to {} an event", args.action.as_str());
            }
        }
    }

    Ok(event)
}

pub async fn execute(args: EventArgs, graph: &Graph) -> Result<()> {
    let Some(routing_key) = args
        .routing_key
        .clone()
        .or_else(|| graph.gateway().config().routing_key())
    else {
        bail!("No routing key. Pass --routing-key or run 'pdgraph configure --routing-key <key>'.");
    };

    let payload = build_payload(&args, &routing_key)?;
    let ack = graph.root().send_event(payload).await?;

    println!("{} Event sent ({})", "✓".green().bold(), args.action.as_str().cyan());
    output::print_json(&ack);
    Ok(())
}
