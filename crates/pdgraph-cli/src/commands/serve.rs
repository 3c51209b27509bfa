//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pdgraph_graph::Graph;
use pdgraph_web::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "3030")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, graph: Arc<Graph>) -> Result<()> {
    let state = AppState::new(graph);

    // Surface configuration changes made through the API in the server log.
    let mut signals = state.config().subscribe();
    tokio::spawn(async move {
        while let Ok(signal) = signals.recv().await {
            info!(status = ?signal.status, "Status changed");
        }
    });

    println!();
    println!("  {} {}", "pdgraph".cyan().bold(), "Web Server".bold());
    println!();
    println!("  {}        http://{}:{}/api", "API".green(), args.host, args.port);
    println!("  {}  ws://{}:{}/ws", "WebSocket".green(), args.host, args.port);
    println!("  {}   {}", "Status".green(), state.config().status().message());
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    pdgraph_web::run_server(state, &args.host, args.port).await
}
