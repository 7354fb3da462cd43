//! Journal entry domain model

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::account::AccountId;
use super::result::{Error, Result};

/// How many entries an account keeps; older ones are pruned on insert
pub const RETENTION_LIMIT: usize = 11;

/// Identifier of an entry
///
/// Assigned from a monotonically increasing sequence, so ordering by id is
/// ordering by insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One calendar day of mood and sleep data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub account_id: AccountId,
    pub date: NaiveDate,
    pub mood: String,
    pub feeling: String,
    pub notes: Option<String>,
    /// Free-form, e.g. "7" or "6.5"
    pub sleep_hours: String,
}

impl Entry {
    pub fn view(&self) -> EntryView {
        EntryView {
            date: self.date.format("%Y-%m-%d").to_string(),
            mood: self.mood.clone(),
            feeling: self.feeling.clone(),
            notes: self.notes.clone(),
            sleep_hours: self.sleep_hours.clone(),
        }
    }
}

/// Fields submitted when recording a day
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryInput {
    pub mood: String,
    pub feeling: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub sleep_hours: String,
}

impl EntryInput {
    /// Trim fields, drop blank notes and reject blank required fields
    pub fn validate(self) -> Result<Self> {
        let mood = self.mood.trim().to_string();
        let feeling = self.feeling.trim().to_string();
        let sleep_hours = self.sleep_hours.trim().to_string();

        if mood.is_empty() {
            return Err(Error::invalid_input("mood cannot be empty"));
        }
        if feeling.is_empty() {
            return Err(Error::invalid_input("feeling cannot be empty"));
        }
        if sleep_hours.is_empty() {
            return Err(Error::invalid_input("sleep hours cannot be empty"));
        }

        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(Self {
            mood,
            feeling,
            notes,
            sleep_hours,
        })
    }
}

/// Data needed to insert a new entry row
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub account_id: AccountId,
    pub date: NaiveDate,
    pub mood: String,
    pub feeling: String,
    pub notes: Option<String>,
    pub sleep_hours: String,
}

impl NewEntry {
    pub fn from_input(account_id: AccountId, date: NaiveDate, input: EntryInput) -> Self {
        Self {
            account_id,
            date,
            mood: input.mood,
            feeling: input.feeling,
            notes: input.notes,
            sleep_hours: input.sleep_hours,
        }
    }
}

/// Entry as presented to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    /// ISO calendar date (YYYY-MM-DD)
    pub date: String,
    pub mood: String,
    pub feeling: String,
    pub notes: Option<String>,
    pub sleep_hours: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(mood: &str, feeling: &str, sleep: &str) -> EntryInput {
        EntryInput {
            mood: mood.to_string(),
            feeling: feeling.to_string(),
            notes: Some("  ".to_string()),
            sleep_hours: sleep.to_string(),
        }
    }

    #[test]
    fn test_validate_trims_and_drops_blank_notes() {
        let validated = input(" ok ", "calm", "7").validate().unwrap();
        assert_eq!(validated.mood, "ok");
        assert_eq!(validated.notes, None);
    }

    #[test]
    fn test_validate_rejects_blank_required_fields() {
        assert!(matches!(input("", "calm", "7").validate(), Err(Error::InvalidInput(_))));
        assert!(matches!(input("ok", " ", "7").validate(), Err(Error::InvalidInput(_))));
        assert!(matches!(input("ok", "calm", "").validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_sleep_hours_is_not_parsed() {
        let validated = input("ok", "calm", "about 7-ish").validate().unwrap();
        assert_eq!(validated.sleep_hours, "about 7-ish");
    }

    #[test]
    fn test_view_formats_iso_date() {
        let entry = Entry {
            id: EntryId(3),
            account_id: AccountId(1),
            date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            mood: "ok".to_string(),
            feeling: "calm".to_string(),
            notes: None,
            sleep_hours: "7".to_string(),
        };
        assert_eq!(entry.view().date, "2025-03-09");
    }
}
