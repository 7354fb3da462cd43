//! Wall-clock implementation of the Clock port

use chrono::{Local, NaiveDate};

use crate::ports::Clock;

/// Calendar date from the local timezone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
