use std::cell::Cell;
use std::rc::Rc;

use crate::format::format_hms_secs;

/// Where the engines read "now" from.
pub trait ClockSource {
    /// Monotonic milliseconds since an arbitrary epoch.
    fn now_ms(&self) -> u64;

    /// Local time of day for display next to a lap. Never used for ordering.
    fn time_label(&self) -> String;
}

/// Hand-driven clock. Clones share the same reading, so a test can keep one
/// handle and give the other to the code under test.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now_ms.set(ms);
    }
}

impl ClockSource for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    fn time_label(&self) -> String {
        format_hms_secs((self.now_ms.get() / 1000) % 86_400)
    }
}
