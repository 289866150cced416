//! Pure timing logic library with no platform dependencies.
//! Testable on host; the terminal app supplies the clock and the rendering.

mod clock;
mod clock_face;
mod countdown;
mod format;
mod stopwatch;

pub use clock::{ClockSource, ManualClock};
pub use clock_face::{hand_angles, read_clock, ClockReading, HandAngles, HourFormat};
pub use countdown::{parse_field, Countdown, CountdownDisplay, DEFAULT_COUNTDOWN_SECS};
pub use format::{format_elapsed, format_hms_secs, DisplayParts};
pub use stopwatch::{LapRecord, SecondaryAction, Stopwatch, TimerState};

/// Refresh interval of the stopwatch readout.
pub const STOPWATCH_TICK_MS: u64 = 10;

/// Refresh interval of the clocks and the countdown tick.
pub const SECOND_TICK_MS: u64 = 1000;
