//! Logs command - inspect the diagnostic event log
//!
//! Recovered failures such as `image_delete_failed` carry the asset host and
//! public id in their details, so orphaned uploads can be cleaned by hand.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;

use super::get_logger;
use crate::output;
use moodlog_core::{LogEntry, LogFilter};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only entries with this event name (e.g. image_delete_failed)
        #[arg(long)]
        event: Option<String>,
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete entries older than N days
    Clear {
        #[arg(long, default_value = "30")]
        older_than_days: u32,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count entries per event
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn format_time(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Error text followed by its details, e.g. `HTTP 500 (host=cloudinary public_id=mood/a)`
fn describe(entry: &LogEntry) -> String {
    match (&entry.error_message, &entry.error_details) {
        (Some(message), Some(details)) => format!("{} ({})", message, details),
        (Some(message), None) => message.clone(),
        (None, Some(details)) => details.clone(),
        (None, None) => String::new(),
    }
}

fn cutoff_ms(now: DateTime<Utc>, older_than_days: u32) -> i64 {
    (now - Duration::days(i64::from(older_than_days))).timestamp_millis()
}

pub fn run(command: LogsCommands) -> Result<()> {
    let service = get_logger().context("Could not open the event log")?;

    match command {
        LogsCommands::List {
            limit,
            event,
            errors,
            json,
        } => {
            let filter = LogFilter {
                event,
                errors_only: errors,
            };
            let entries = service.search(&filter, limit)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if entries.is_empty() {
                println!("{}", "No matching log entries.".dimmed());
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Event", "Command", "Details"]);
            for entry in &entries {
                let details = describe(entry);
                let details = if entry.error_message.is_some() {
                    details.red().to_string()
                } else {
                    details
                };
                table.add_row(vec![
                    format_time(entry.timestamp),
                    entry.event.clone(),
                    entry.command.clone().unwrap_or_default(),
                    details,
                ]);
            }
            println!("{}", table);
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            if !force && !json {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete log entries older than {} days?", older_than_days))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let deleted = service.delete_before(cutoff_ms(Utc::now(), older_than_days))?;
            if json {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else {
                output::success(&format!("Deleted {} log entries", deleted));
            }
        }
        LogsCommands::Stats { json } => {
            let counts = service.event_counts()?;
            let db_path = service.db_path();
            let size_bytes = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "events": counts,
                        "database_path": db_path.to_string_lossy(),
                        "database_size_bytes": size_bytes
                    }))?
                );
                return Ok(());
            }

            if counts.is_empty() {
                println!("{}", "The event log is empty.".dimmed());
            } else {
                let mut table = output::create_table();
                table.set_header(vec!["Event", "Count", "Errors"]);
                for count in &counts {
                    table.add_row(vec![
                        count.event.clone(),
                        count.total.to_string(),
                        count.errors.to_string(),
                    ]);
                }
                println!("{}", table);
            }
            println!(
                "{} ({})",
                db_path.display().to_string().dimmed(),
                output::format_size(size_bytes)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: Option<&str>, details: Option<&str>) -> LogEntry {
        LogEntry {
            id: 1,
            timestamp: 0,
            entry_point: "cli".to_string(),
            app_version: "0.1.0".to_string(),
            platform: "linux".to_string(),
            event: "image_delete_failed".to_string(),
            command: None,
            error_message: message.map(str::to_string),
            error_details: details.map(str::to_string),
        }
    }

    #[test]
    fn test_describe_joins_message_and_details() {
        let e = entry(Some("HTTP 500"), Some("host=cloudinary public_id=mood/a"));
        assert_eq!(describe(&e), "HTTP 500 (host=cloudinary public_id=mood/a)");
        assert_eq!(describe(&entry(Some("boom"), None)), "boom");
        assert_eq!(describe(&entry(None, None)), "");
    }

    #[test]
    fn test_cutoff_is_days_before_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap();
        assert_eq!(cutoff_ms(now, 7), expected.timestamp_millis());
        assert_eq!(cutoff_ms(now, 0), now.timestamp_millis());
    }

    #[test]
    fn test_format_time() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 10, 8, 5, 0).unwrap().timestamp_millis();
        assert_eq!(format_time(ts), "2024-03-10 08:05:00");
    }
}
