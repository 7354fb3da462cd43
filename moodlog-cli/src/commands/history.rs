//! History / today commands - read the journal

use anyhow::Result;
use colored::Colorize;

use super::{get_context, require_account};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let result = require_account(&ctx).and_then(|id| ctx.journal_service.list_recent(id));

    output::finish(json, result, |entries| {
        if entries.is_empty() {
            println!("{}", "No entries yet. Use `mood record` to add today's.".dimmed());
            return;
        }

        let mut table = output::create_table();
        table.set_header(vec!["Date", "Mood", "Feeling", "Sleep (h)", "Notes"]);
        for entry in entries {
            table.add_row(vec![
                entry.date,
                entry.mood,
                entry.feeling,
                entry.sleep_hours,
                entry.notes.unwrap_or_default(),
            ]);
        }
        println!("{}", table);
    })
}

pub fn run_today(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let result = require_account(&ctx).and_then(|id| ctx.journal_service.has_recorded_today(id));

    output::finish(json, result, |recorded| {
        if recorded {
            println!("{}", "Today's entry is recorded.".green());
        } else {
            output::warning("Nothing recorded today yet.");
        }
    })
}
