use timepiece_core::{format_elapsed, DisplayParts, Stopwatch};

/// One rendered row of the lap list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LapRow {
    pub number: usize,
    pub time: DisplayParts,
    pub label: String,
}

pub struct StopwatchWidget {
    pub engine: Stopwatch,
    pub show_ms: bool,
    pub lap_scroll_offset: usize,
}

impl StopwatchWidget {
    pub fn new(show_ms: bool) -> Self {
        Self {
            engine: Stopwatch::new(),
            show_ms,
            lap_scroll_offset: 0,
        }
    }

    pub fn readout(&self, now_ms: u64) -> DisplayParts {
        format_elapsed(self.engine.elapsed_ms(now_ms), self.show_ms)
    }

    /// Rows are rebuilt from the stored laps on every render, so flipping the
    /// milliseconds toggle reformats existing laps without touching them.
    pub fn lap_rows(&self) -> Vec<LapRow> {
        self.engine
            .laps()
            .skip(self.lap_scroll_offset)
            .map(|lap| LapRow {
                number: lap.number,
                time: format_elapsed(lap.elapsed_ms, self.show_ms),
                label: lap.wall_clock_label.clone(),
            })
            .collect()
    }

    pub fn toggle_ms(&mut self) {
        self.show_ms = !self.show_ms;
    }

    pub fn scroll_laps(&mut self, down: bool) {
        if down {
            if self.lap_scroll_offset + 1 < self.engine.lap_count() {
                self.lap_scroll_offset += 1;
            }
        } else {
            self.lap_scroll_offset = self.lap_scroll_offset.saturating_sub(1);
        }
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.lap_scroll_offset = 0;
    }

    pub fn clear_laps(&mut self) {
        self.engine.clear_laps();
        self.lap_scroll_offset = 0;
    }
}
