//! Journal service - one mood/sleep entry per day with bounded history

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::result::{Error, Result};
use crate::domain::{AccountId, EntryId, EntryInput, EntryView, NewEntry, RETENTION_LIMIT};
use crate::ports::{Clock, EntryRepository};

/// Service for recording and reading journal entries
pub struct JournalService {
    entries: Arc<dyn EntryRepository>,
    clock: Arc<dyn Clock>,
}

impl JournalService {
    pub fn new(entries: Arc<dyn EntryRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { entries, clock }
    }

    /// Record today's entry and trim the account's history.
    ///
    /// Only the `RETENTION_LIMIT` most recently inserted entries survive,
    /// regardless of their dates.
    #[instrument(skip(self, input))]
    pub fn record_today(&self, account_id: AccountId, input: EntryInput) -> Result<EntryId> {
        let input = input.validate()?;
        let today = self.clock.today();

        if self.entries.entry_exists_on(account_id, today)? {
            return Err(Error::conflict("already recorded today"));
        }

        let entry = NewEntry::from_input(account_id, today, input);
        let id = match self.entries.insert_entry(&entry) {
            Err(Error::Conflict(_)) => return Err(Error::conflict("already recorded today")),
            other => other?,
        };

        let pruned = self.entries.prune_entries(account_id, RETENTION_LIMIT)?;
        debug!(entry = %id, pruned, "recorded entry");

        Ok(id)
    }

    pub fn has_recorded_today(&self, account_id: AccountId) -> Result<bool> {
        self.entries.entry_exists_on(account_id, self.clock.today())
    }

    /// The most recent entries by date, oldest first
    pub fn list_recent(&self, account_id: AccountId) -> Result<Vec<EntryView>> {
        let mut entries = self
            .entries
            .recent_entries_by_date(account_id, RETENTION_LIMIT)?;
        entries.reverse();
        Ok(entries.iter().map(|e| e.view()).collect())
    }
}
