//! Clock port

use chrono::NaiveDate;

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
