//! Record command - save today's mood and sleep

use anyhow::Result;

use super::{get_context, require_account};
use crate::output;
use moodlog_core::EntryInput;

pub fn run(
    mood: String,
    feeling: String,
    sleep_hours: String,
    notes: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;

    let input = EntryInput {
        mood,
        feeling,
        notes,
        sleep_hours,
    };
    let result =
        require_account(&ctx).and_then(|id| ctx.journal_service.record_today(id, input));

    output::finish(json, result, |entry_id| {
        output::success(&format!("Recorded today's entry (#{})", entry_id));
    })
}
