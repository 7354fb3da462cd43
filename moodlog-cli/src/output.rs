//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use serde::Serialize;

use moodlog_core::domain::result::Result as CoreResult;
use moodlog_core::OperationResult;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Finish a command: JSON mode prints an [`OperationResult`] (exit code 1 on
/// failure), human mode hands the value to `render` or returns the error.
pub fn finish<T: Serialize>(
    json: bool,
    result: CoreResult<T>,
    render: impl FnOnce(T),
) -> anyhow::Result<()> {
    if json {
        let failed = result.is_err();
        let op: OperationResult<T> = result.into();
        println!("{}", serde_json::to_string_pretty(&op)?);
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    render(result?);
    Ok(())
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
