use std::time::Instant;

use chrono::{DateTime, Local, TimeZone, Timelike};
use timepiece_core::ClockSource;

/// Monotonic readings from `Instant`, labels from the local wall clock.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn time_label(&self) -> String {
        Local::now().format("%-I:%M:%S %p").to_string()
    }
}

/// One sample of the local wall clock, split the way the faces need it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WallTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// "Monday, October 19, 2026"
    pub date_line: String,
}

impl WallTime {
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            hour: at.hour(),
            minute: at.minute(),
            second: at.second(),
            date_line: at.format("%A, %B %-d, %Y").to_string(),
        }
    }
}
