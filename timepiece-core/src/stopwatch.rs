use std::collections::VecDeque;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Snapshot of the elapsed time taken without interrupting the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LapRecord {
    /// 1-based ordinal since the last reset or clear.
    pub number: usize,
    pub elapsed_ms: u64,
    pub wall_clock_label: String,
}

/// What the lap/reset control did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SecondaryAction {
    Lap,
    Reset,
}

/// Elapsed-time engine: accumulates run segments across start/pause cycles
/// and keeps lap snapshots newest-first.
///
/// Every operation is defined in every state; the ones that do not apply are
/// no-ops.
#[derive(Debug)]
pub struct Stopwatch {
    state: TimerState,
    accumulated_ms: u64,
    // Some exactly while Running
    segment_start_ms: Option<u64>,
    laps: VecDeque<LapRecord>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            accumulated_ms: 0,
            segment_start_ms: None,
            laps: VecDeque::new(),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Total of the completed run segments.
    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.segment_start_ms {
            Some(start) => self.accumulated_ms + now_ms.saturating_sub(start),
            None => self.accumulated_ms,
        }
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.state == TimerState::Running {
            return;
        }
        self.segment_start_ms = Some(now_ms);
        self.state = TimerState::Running;
    }

    pub fn pause(&mut self, now_ms: u64) {
        let Some(start) = self.segment_start_ms.take() else {
            return;
        };
        self.accumulated_ms += now_ms.saturating_sub(start);
        self.state = TimerState::Paused;
    }

    /// Record the current total as the newest lap.
    pub fn lap(&mut self, now_ms: u64, wall_clock_label: String) -> &LapRecord {
        let record = LapRecord {
            number: self.laps.len() + 1,
            elapsed_ms: self.elapsed_ms(now_ms),
            wall_clock_label,
        };
        self.laps.push_front(record);
        &self.laps[0]
    }

    /// Back to Idle at zero with no laps. A running segment is dropped.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.accumulated_ms = 0;
        self.segment_start_ms = None;
        self.laps.clear();
    }

    pub fn clear_laps(&mut self) {
        self.laps.clear();
    }

    /// Returns the state after the toggle.
    pub fn toggle_start_pause(&mut self, now_ms: u64) -> TimerState {
        if self.is_running() {
            self.pause(now_ms);
        } else {
            self.start(now_ms);
        }
        self.state
    }

    /// The secondary control means "lap" while running and "reset" otherwise.
    pub fn toggle_lap_reset(&mut self, now_ms: u64, wall_clock_label: String) -> SecondaryAction {
        if self.is_running() {
            self.lap(now_ms, wall_clock_label);
            SecondaryAction::Lap
        } else {
            self.reset();
            SecondaryAction::Reset
        }
    }

    /// The lap control is disabled only when stopped with nothing on the clock.
    pub fn lap_available(&self, now_ms: u64) -> bool {
        self.is_running() || self.elapsed_ms(now_ms) > 0
    }

    /// Newest first.
    pub fn laps(&self) -> impl ExactSizeIterator<Item = &LapRecord> {
        self.laps.iter()
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }
}
