//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use pdgraph_core::{Alert, Continuation, EntityStatus, GraphRef, Incident};
use serde_json::Value;

fn status_colored(status: Option<EntityStatus>) -> ColoredString {
    match status {
        Some(EntityStatus::Triggered) => "triggered".red(),
        Some(EntityStatus::Acknowledged) => "acknowledged".yellow(),
        Some(EntityStatus::Resolved) => "resolved".green(),
        None => "-".dimmed(),
    }
}

/// Print one incident with its reference.
pub fn print_incident(incident: &Incident) {
    let title = incident.title.as_deref().unwrap_or("(untitled)");
    println!("{} {}", title.cyan().bold(), format!("({})", incident.id).dimmed());
    println!();
    println!("{}: {}", "Status".bold(), status_colored(incident.status));
    if let Some(number) = incident.incident_number {
        println!("{}: #{}", "Number".bold(), number);
    }
    if let Some(urgency) = &incident.urgency {
        println!("{}: {}", "Urgency".bold(), urgency);
    }
    if let Some(created) = &incident.created_at {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(url) = &incident.html_url {
        println!("{}: {}", "URL".bold(), url.underline());
    }
    println!("{}: {}", "Ref".bold(), GraphRef::incident(&incident.id).to_string().dimmed());
}

/// Print incidents as a table.
pub fn print_incidents_table(incidents: &[Incident]) {
    if incidents.is_empty() {
        println!("{}", "No incidents on this page.".dimmed());
        return;
    }

    println!("{:<16} {:<14} {:<8} {}", "ID", "Status", "Urgency", "Title");
    println!("{}", "─".repeat(70));

    for incident in incidents {
        println!(
            "{:<16} {:<14} {:<8} {}",
            incident.id,
            status_colored(incident.status),
            incident.urgency.as_deref().unwrap_or("-"),
            truncate(incident.title.as_deref().unwrap_or(""), 40)
        );
    }
}

/// Print one alert with its reference.
pub fn print_alert(incident_id: &str, alert: &Alert) {
    let summary = alert.summary.as_deref().unwrap_or("(no summary)");
    println!("{} {}", summary.cyan().bold(), format!("({})", alert.id).dimmed());
    println!();
    println!("{}: {}", "Status".bold(), status_colored(alert.status));
    if let Some(severity) = &alert.severity {
        println!("{}: {}", "Severity".bold(), severity);
    }
    if let Some(created) = &alert.created_at {
        println!("{}: {}", "Created".bold(), created);
    }
    println!(
        "{}: {}",
        "Ref".bold(),
        GraphRef::alert(incident_id, &alert.id).to_string().dimmed()
    );
}

/// Print alerts as a table.
pub fn print_alerts_table(alerts: &[Alert]) {
    if alerts.is_empty() {
        println!("{}", "No alerts on this page.".dimmed());
        return;
    }

    println!("{:<16} {:<12} {:<10} {}", "ID", "Status", "Severity", "Summary");
    println!("{}", "─".repeat(70));

    for alert in alerts {
        println!(
            "{:<16} {:<12} {:<10} {}",
            alert.id,
            status_colored(alert.status),
            alert.severity.as_deref().unwrap_or("-"),
            truncate(alert.summary.as_deref().unwrap_or(""), 40)
        );
    }
}

/// Print how to request the next page.
pub fn print_next(next: &Continuation) {
    println!();
    println!(
        "{} offset={} limit={}",
        "Next page:".dimmed(),
        next.args.offset.map(|v| v.to_string()).unwrap_or_default(),
        next.args.limit.map(|v| v.to_string()).unwrap_or_default()
    );
}

/// Print a provider acknowledgement or any other raw JSON value.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{}", value),
    }
}

/// Truncate a string to max length, adding "..." if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
