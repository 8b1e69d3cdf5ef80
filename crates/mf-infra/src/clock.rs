use chrono::{Local, NaiveDate};

use mf_core::ports::ClockPort;

/// Local calendar date of the machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
