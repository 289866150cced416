use std::sync::mpsc::Sender;

use num_traits::FromPrimitive;
use timepiece_core::{
    hand_angles, read_clock, ClockSource, HourFormat, SecondaryAction, TimerState, SECOND_TICK_MS,
    STOPWATCH_TICK_MS,
};

use crate::clock::WallTime;
use crate::config::Config;
use crate::countdown::CountdownWidget;
use crate::input::{
    KEY_BACKSPACE, KEY_BACKTAB, KEY_DOWN, KEY_ENTER, KEY_ESC, KEY_F1, KEY_LEFT, KEY_RIGHT, KEY_TAB,
    KEY_UP,
};
use crate::pump::Pump;
use crate::stopwatch::StopwatchWidget;
use crate::storage::SettingsStore;
use crate::swatches::{self, Accent, SWATCHES};
use crate::Envelope;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppMode {
    Analog,
    Digital,
    Stopwatch,
    Timer,
}

impl AppMode {
    pub const ALL: [AppMode; 4] = [
        AppMode::Analog,
        AppMode::Digital,
        AppMode::Stopwatch,
        AppMode::Timer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AppMode::Analog => "Analog",
            AppMode::Digital => "Digital",
            AppMode::Stopwatch => "Stopwatch",
            AppMode::Timer => "Timer",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "analog" => AppMode::Analog,
            "stopwatch" => AppMode::Stopwatch,
            "timer" => AppMode::Timer,
            _ => AppMode::Digital,
        }
    }

    pub fn index(self) -> usize {
        AppMode::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, num_derive::FromPrimitive)]
pub enum PumpId {
    Clock = 0,
    Stopwatch,
    Countdown,
}

/// Where the cursor sits inside the settings panel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SettingsFocus {
    Format(HourFormat),
    Swatch(usize),
}

/// Owns every widget and the chrome around them. Key handlers call the
/// command methods; each state change asks for an immediate redraw instead of
/// waiting for the next sample.
pub struct App {
    clock: Box<dyn ClockSource>,
    storage: SettingsStore,

    mode: AppMode,
    hour_format: HourFormat,
    accent: Accent,
    wall: WallTime,

    stopwatch: StopwatchWidget,
    countdown: CountdownWidget,

    // Chrome overlays
    nav_cursor: Option<usize>,
    settings_focus: Option<SettingsFocus>,
    help_visible: bool,

    clock_pump: Pump,
    stopwatch_pump: Pump,
    countdown_pump: Pump,

    allow_redraw: bool,
    needs_redraw: bool,
    quit: bool,
}

impl App {
    pub fn new(
        config: &Config,
        mut storage: SettingsStore,
        clock: Box<dyn ClockSource>,
        main: Sender<Envelope>,
    ) -> Self {
        if let Some(path) = storage.path() {
            log::debug!("settings at {}", path.display());
        }
        let hour_format = HourFormat::from_use_12_hour(storage.load_use_12_hour());
        let accent = match swatches::resolve(&storage.load_swatch()) {
            Some(accent) => accent,
            None => {
                storage.save_swatch_id(SWATCHES[0].id);
                Accent::Swatch(0)
            }
        };

        Self {
            clock,
            storage,
            mode: config.initial_mode,
            hour_format,
            accent,
            wall: WallTime::now(),
            stopwatch: StopwatchWidget::new(config.show_ms),
            countdown: CountdownWidget::new(config.countdown_default_secs),
            nav_cursor: None,
            settings_focus: None,
            help_visible: false,
            clock_pump: Pump::spawn(PumpId::Clock as usize, main.clone()),
            stopwatch_pump: Pump::spawn(PumpId::Stopwatch as usize, main.clone()),
            countdown_pump: Pump::spawn(PumpId::Countdown as usize, main),
            allow_redraw: true,
            needs_redraw: true,
            quit: false,
        }
    }

    /// The clocks sample for the life of the app.
    pub fn activate(&mut self) {
        self.clock_pump.start(SECOND_TICK_MS);
        self.request_redraw();
    }

    pub fn shutdown(&mut self) {
        self.clock_pump.shutdown();
        self.stopwatch_pump.shutdown();
        self.countdown_pump.shutdown();
    }

    // ---- accessors used by the renderer

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn hour_format(&self) -> HourFormat {
        self.hour_format
    }

    pub fn accent(&self) -> Accent {
        self.accent
    }

    pub fn wall(&self) -> &WallTime {
        &self.wall
    }

    pub fn stopwatch(&self) -> &StopwatchWidget {
        &self.stopwatch
    }

    pub fn countdown(&self) -> &CountdownWidget {
        &self.countdown
    }

    pub fn nav_cursor(&self) -> Option<usize> {
        self.nav_cursor
    }

    pub fn settings_focus(&self) -> Option<SettingsFocus> {
        self.settings_focus
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    // ---- redraw bookkeeping

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// True once per requested redraw, and never while the terminal is in
    /// the background.
    pub fn take_redraw(&mut self) -> bool {
        if !self.allow_redraw {
            return false;
        }
        std::mem::replace(&mut self.needs_redraw, false)
    }

    pub fn set_focus(&mut self, foreground: bool) {
        self.allow_redraw = foreground;
        if foreground {
            self.request_redraw();
        }
    }

    // ---- samples

    pub fn handle_pump(&mut self, pump_id: usize, generation: usize) {
        match PumpId::from_usize(pump_id) {
            Some(PumpId::Clock) if self.clock_pump.accepts(generation) => {
                self.clock_pump.take_ticks();
                self.wall = WallTime::now();
                if matches!(self.mode, AppMode::Analog | AppMode::Digital) {
                    self.request_redraw();
                }
            }
            Some(PumpId::Stopwatch) if self.stopwatch_pump.accepts(generation) => {
                self.stopwatch_pump.take_ticks();
                if self.mode == AppMode::Stopwatch {
                    self.request_redraw();
                }
            }
            Some(PumpId::Countdown) if self.countdown_pump.accepts(generation) => {
                // one sample may stand for several seconds if the loop fell behind
                let seconds = self.countdown_pump.take_ticks().max(1);
                let mut ticked = false;
                for _ in 0..seconds {
                    ticked |= self.countdown.timer.tick();
                }
                if ticked && self.mode == AppMode::Timer {
                    self.request_redraw();
                }
            }
            Some(_) => log::trace!("dropping stale sample from pump {}", pump_id),
            None => log::error!("sample from unknown pump {}", pump_id),
        }
    }

    // ---- stopwatch commands

    pub fn start_stopwatch(&mut self) {
        let now = self.clock.now_ms();
        self.stopwatch.engine.start(now);
        self.stopwatch_pump.start(STOPWATCH_TICK_MS);
        log::debug!("stopwatch started at {}ms", self.stopwatch.engine.elapsed_ms(now));
        self.request_redraw();
    }

    pub fn pause_stopwatch(&mut self) {
        let now = self.clock.now_ms();
        self.stopwatch.engine.pause(now);
        self.stopwatch_pump.stop();
        log::debug!("stopwatch paused at {}ms", self.stopwatch.engine.accumulated_ms());
        // one last render shows the exact paused value
        self.request_redraw();
    }

    pub fn toggle_start_pause(&mut self) {
        if self.stopwatch.engine.is_running() {
            self.pause_stopwatch();
        } else {
            self.start_stopwatch();
        }
    }

    pub fn lap(&mut self) {
        let now = self.clock.now_ms();
        let label = self.clock.time_label();
        let lap = self.stopwatch.engine.lap(now, label);
        log::debug!("lap {} at {}ms", lap.number, lap.elapsed_ms);
        self.request_redraw();
    }

    /// Lap while running, reset otherwise.
    pub fn toggle_lap_reset(&mut self) {
        let now = self.clock.now_ms();
        let label = self.clock.time_label();
        if self.stopwatch.engine.toggle_lap_reset(now, label) == SecondaryAction::Reset {
            self.stopwatch.lap_scroll_offset = 0;
            self.stopwatch_pump.stop();
        }
        self.request_redraw();
    }

    pub fn reset_stopwatch(&mut self) {
        self.stopwatch_pump.stop();
        self.stopwatch.reset();
        log::debug!("stopwatch reset");
        self.request_redraw();
    }

    pub fn clear_laps(&mut self) {
        self.stopwatch.clear_laps();
        self.request_redraw();
    }

    pub fn toggle_ms(&mut self) {
        self.stopwatch.toggle_ms();
        self.request_redraw();
    }

    // ---- countdown commands

    pub fn toggle_countdown(&mut self) {
        if self.countdown.timer.toggle() {
            self.countdown_pump.start(SECOND_TICK_MS);
        } else {
            self.countdown_pump.stop();
        }
        self.request_redraw();
    }

    pub fn reset_countdown(&mut self) {
        self.countdown_pump.stop();
        self.countdown.reset();
        self.request_redraw();
    }

    // ---- chrome commands

    pub fn select_mode(&mut self, mode: AppMode) {
        if self.mode != mode {
            log::info!("showing {}", mode.name());
        }
        self.mode = mode;
        if matches!(mode, AppMode::Analog | AppMode::Digital) {
            self.wall = WallTime::now();
        }
        self.request_redraw();
    }

    pub fn set_format(&mut self, format: HourFormat) {
        self.hour_format = format;
        self.storage.save_use_12_hour(format.is_12_hour());
        self.request_redraw();
    }

    pub fn apply_swatch(&mut self, index: usize) {
        let Some(swatch) = SWATCHES.get(index) else {
            return;
        };
        self.accent = Accent::Swatch(index);
        self.storage.save_swatch_id(swatch.id);
        self.request_redraw();
    }

    /// Plain-text readout of the current widget.
    pub fn snapshot_text(&self) -> String {
        let wall = &self.wall;
        match self.mode {
            AppMode::Analog => {
                let angles = hand_angles(wall.hour, wall.minute, wall.second);
                format!(
                    "hour {:.1}° minute {:.1}° second {:.1}°\n{}",
                    angles.hour, angles.minute, angles.second, wall.date_line
                )
            }
            AppMode::Digital => {
                let reading = read_clock(wall.hour, wall.minute, wall.second, self.hour_format);
                match reading.meridiem {
                    Some(meridiem) => format!("{} {}\n{}", reading.main, meridiem, wall.date_line),
                    None => format!("{}\n{}", reading.main, wall.date_line),
                }
            }
            AppMode::Stopwatch => self.stopwatch.readout(self.clock.now_ms()).to_string(),
            AppMode::Timer => {
                let display = self.countdown.timer.display();
                if display.overtime {
                    format!("{} (overtime)", display.text)
                } else {
                    display.text
                }
            }
        }
    }

    // ---- keys

    pub fn handle_key(&mut self, key: char) {
        if self.help_visible {
            self.help_visible = false;
            self.request_redraw();
            return;
        }
        if self.countdown.editing.is_some() {
            self.handle_key_countdown_edit(key);
            return;
        }
        if self.nav_cursor.is_some() {
            self.handle_key_nav(key);
            return;
        }
        if self.settings_focus.is_some() {
            self.handle_key_settings(key);
            return;
        }

        match key {
            KEY_TAB => {
                self.nav_cursor = Some(0);
                self.request_redraw();
                return;
            }
            's' => {
                self.settings_focus = Some(SettingsFocus::Format(self.hour_format));
                self.request_redraw();
                return;
            }
            '?' | KEY_F1 => {
                self.help_visible = true;
                self.request_redraw();
                return;
            }
            'q' => {
                self.quit = true;
                return;
            }
            _ => {}
        }

        match self.mode {
            AppMode::Analog => {}
            AppMode::Digital => self.handle_key_digital(key),
            AppMode::Stopwatch => self.handle_key_stopwatch(key),
            AppMode::Timer => self.handle_key_timer(key),
        }
    }

    fn handle_key_nav(&mut self, key: char) {
        let Some(cursor) = self.nav_cursor else {
            return;
        };
        match key {
            KEY_UP | 'k' => {
                if cursor > 0 {
                    self.nav_cursor = Some(cursor - 1);
                }
            }
            KEY_DOWN | 'j' => {
                if cursor + 1 < AppMode::ALL.len() {
                    self.nav_cursor = Some(cursor + 1);
                }
            }
            KEY_ENTER | '\n' => {
                self.nav_cursor = None;
                self.select_mode(AppMode::ALL[cursor]);
            }
            KEY_ESC | KEY_TAB => self.nav_cursor = None,
            _ => return,
        }
        self.request_redraw();
    }

    fn handle_key_settings(&mut self, key: char) {
        let Some(focus) = self.settings_focus else {
            return;
        };
        let other_format = |f: HourFormat| match f {
            HourFormat::TwelveHour => HourFormat::TwentyFourHour,
            HourFormat::TwentyFourHour => HourFormat::TwelveHour,
        };
        match (key, focus) {
            (KEY_ESC | 's', _) => self.settings_focus = None,
            (KEY_LEFT | KEY_RIGHT, SettingsFocus::Format(f)) => {
                self.settings_focus = Some(SettingsFocus::Format(other_format(f)));
            }
            (KEY_LEFT, SettingsFocus::Swatch(i)) => {
                self.settings_focus = Some(SettingsFocus::Swatch(swatches::step(i, false)));
            }
            (KEY_RIGHT, SettingsFocus::Swatch(i)) => {
                self.settings_focus = Some(SettingsFocus::Swatch(swatches::step(i, true)));
            }
            (KEY_DOWN, SettingsFocus::Format(_)) => {
                let index = self.accent.swatch_index().unwrap_or(0);
                self.settings_focus = Some(SettingsFocus::Swatch(index));
            }
            (KEY_UP, SettingsFocus::Swatch(_)) => {
                self.settings_focus = Some(SettingsFocus::Format(self.hour_format));
            }
            (KEY_ENTER | ' ', SettingsFocus::Format(f)) => self.set_format(f),
            (KEY_ENTER | ' ', SettingsFocus::Swatch(i)) => self.apply_swatch(i),
            _ => return,
        }
        self.request_redraw();
    }

    fn handle_key_digital(&mut self, key: char) {
        match key {
            '1' => self.set_format(HourFormat::TwelveHour),
            '2' => self.set_format(HourFormat::TwentyFourHour),
            _ => {}
        }
    }

    fn handle_key_stopwatch(&mut self, key: char) {
        match key {
            ' ' => self.toggle_start_pause(),
            KEY_ENTER | '\n' => self.toggle_lap_reset(),
            'r' | 'R' => self.reset_stopwatch(),
            'l' | 'L' => {
                if self.stopwatch.engine.lap_available(self.clock.now_ms()) {
                    self.lap();
                }
            }
            'c' => self.clear_laps(),
            'm' => self.toggle_ms(),
            KEY_UP | 'k' => {
                self.stopwatch.scroll_laps(false);
                self.request_redraw();
            }
            KEY_DOWN | 'j' => {
                self.stopwatch.scroll_laps(true);
                self.request_redraw();
            }
            _ => {}
        }
    }

    fn handle_key_timer(&mut self, key: char) {
        match key {
            ' ' | KEY_ENTER | '\n' => self.toggle_countdown(),
            'r' | 'R' => self.reset_countdown(),
            'e' => {
                self.countdown.begin_edit();
                self.request_redraw();
            }
            _ => {}
        }
    }

    fn handle_key_countdown_edit(&mut self, key: char) {
        match key {
            KEY_TAB | KEY_RIGHT => {
                self.countdown.move_focus(true);
            }
            KEY_BACKTAB | KEY_LEFT => {
                self.countdown.move_focus(false);
            }
            KEY_ENTER | '\n' | KEY_ESC => {
                self.countdown.finish_edit();
            }
            KEY_BACKSPACE | '\u{7f}' => self.countdown.backspace(),
            c => {
                if !self.countdown.push_char(c) {
                    return;
                }
            }
        }
        self.request_redraw();
    }

    pub fn stopwatch_state(&self) -> TimerState {
        self.stopwatch.engine.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::mpsc::{self, Receiver};
    use timepiece_core::ManualClock;

    fn config(mode: AppMode) -> Config {
        Config {
            initial_mode: mode,
            countdown_default_secs: 1800,
            config_dir: PathBuf::from("unused"),
            show_ms: false,
            once: false,
        }
    }

    fn app_with(mode: AppMode, storage: SettingsStore) -> (App, ManualClock, Receiver<Envelope>) {
        let clock = ManualClock::new(10_000);
        let (tx, rx) = mpsc::channel();
        let app = App::new(&config(mode), storage, Box::new(clock.clone()), tx);
        (app, clock, rx)
    }

    fn app(mode: AppMode) -> (App, ManualClock, Receiver<Envelope>) {
        app_with(mode, SettingsStore::in_memory())
    }

    fn press(app: &mut App, keys: &str) {
        for key in keys.chars() {
            app.handle_key(key);
        }
    }

    #[test]
    fn stopwatch_keys_drive_the_engine() {
        let (mut app, clock, _rx) = app(AppMode::Stopwatch);
        assert!(app.take_redraw());
        assert!(!app.take_redraw());

        press(&mut app, " ");
        assert_eq!(app.stopwatch_state(), TimerState::Running);
        assert!(app.stopwatch_pump.is_running());
        assert!(app.take_redraw());

        clock.advance(1_500);
        press(&mut app, "\r"); // lap while running
        clock.advance(500);
        press(&mut app, "l");
        assert_eq!(app.stopwatch().engine.lap_count(), 2);

        press(&mut app, " ");
        assert_eq!(app.stopwatch_state(), TimerState::Paused);
        assert!(!app.stopwatch_pump.is_running());
        assert_eq!(app.snapshot_text(), "00:00:02");

        press(&mut app, "m");
        assert_eq!(app.snapshot_text(), "00:00:02.000");
        let rows = app.stopwatch().lap_rows();
        assert_eq!(rows[0].time.to_string(), "00:00:02.000");
        assert_eq!(rows[1].time.to_string(), "00:00:01.500");

        press(&mut app, "\r"); // reset while stopped
        assert_eq!(app.stopwatch_state(), TimerState::Idle);
        assert_eq!(app.stopwatch().engine.lap_count(), 0);
        assert_eq!(app.snapshot_text(), "00:00:00.000");
    }

    #[test]
    fn lap_shortcut_needs_time_on_the_clock() {
        let (mut app, clock, _rx) = app(AppMode::Stopwatch);
        press(&mut app, "l");
        assert_eq!(app.stopwatch().engine.lap_count(), 0);
        press(&mut app, " ");
        clock.advance(20);
        press(&mut app, " l");
        assert_eq!(app.stopwatch().engine.lap_count(), 1);
        let newest = app.stopwatch().engine.laps().next();
        assert_eq!(newest.map(|l| l.wall_clock_label.as_str()), Some("00:00:10"));
    }

    #[test]
    fn reset_while_running_lands_idle_at_zero() {
        let (mut app, clock, _rx) = app(AppMode::Stopwatch);
        press(&mut app, " ");
        clock.advance(900);
        press(&mut app, "lr");
        assert_eq!(app.stopwatch_state(), TimerState::Idle);
        assert_eq!(app.stopwatch().engine.accumulated_ms(), 0);
        assert_eq!(app.stopwatch().engine.lap_count(), 0);
        assert!(!app.stopwatch_pump.is_running());
    }

    #[test]
    fn clear_laps_keeps_running() {
        let (mut app, clock, _rx) = app(AppMode::Stopwatch);
        press(&mut app, " ");
        clock.advance(100);
        press(&mut app, "llc");
        assert_eq!(app.stopwatch().engine.lap_count(), 0);
        assert_eq!(app.stopwatch_state(), TimerState::Running);
    }

    #[test]
    fn countdown_ticks_only_from_its_live_pump() {
        let (mut app, _clock, _rx) = app(AppMode::Timer);
        press(&mut app, " ");
        let generation = app.countdown_pump.generation();
        app.handle_pump(PumpId::Countdown as usize, generation);
        app.handle_pump(PumpId::Countdown as usize, generation);
        assert_eq!(app.countdown().timer.total_seconds(), 1798);

        press(&mut app, " "); // pause
        app.handle_pump(PumpId::Countdown as usize, generation);
        assert_eq!(app.countdown().timer.total_seconds(), 1798);

        press(&mut app, " ");
        app.handle_pump(PumpId::Countdown as usize, generation); // stale
        assert_eq!(app.countdown().timer.total_seconds(), 1798);
        app.handle_pump(PumpId::Countdown as usize, app.countdown_pump.generation());
        assert_eq!(app.countdown().timer.total_seconds(), 1797);

        press(&mut app, "r");
        assert_eq!(app.snapshot_text(), "00:30:00");
        assert!(!app.countdown_pump.is_running());
    }

    #[test]
    fn late_countdown_sample_applies_every_missed_second() {
        let (mut app, _clock, _rx) = app(AppMode::Timer);
        press(&mut app, " ");
        app.countdown_pump.take_ticks();
        app.countdown_pump.record_ticks(3);
        app.handle_pump(PumpId::Countdown as usize, app.countdown_pump.generation());
        assert_eq!(app.countdown().timer.total_seconds(), 1797);
        assert_eq!(app.countdown_pump.take_ticks(), 0);
    }

    #[test]
    fn countdown_runs_into_overtime() {
        let (mut app, _clock, _rx) = app(AppMode::Timer);
        assert!(app.countdown.timer.apply_input("", "", "2"));
        press(&mut app, " ");
        for _ in 0..3 {
            app.handle_pump(PumpId::Countdown as usize, app.countdown_pump.generation());
        }
        assert_eq!(app.snapshot_text(), "-00:00:01 (overtime)");
        assert!(app.countdown().timer.is_running());
    }

    #[test]
    fn countdown_edit_commits_on_confirm() {
        let (mut app, _clock, _rx) = app(AppMode::Timer);
        press(&mut app, "e");
        // hours field holds "0"; erase it and type 1
        press(&mut app, &format!("{}1", KEY_BACKSPACE));
        assert_eq!(app.countdown().timer.total_seconds(), 1800);
        press(&mut app, "\t");
        // minutes "30" -> "3"
        press(&mut app, &format!("{}", KEY_BACKSPACE));
        press(&mut app, "\r");
        assert_eq!(app.countdown().editing, None);
        assert_eq!(app.countdown().timer.total_seconds(), 3600 + 180);
        // space is a start/pause again once editing is over
        press(&mut app, " ");
        assert!(app.countdown().timer.is_running());
    }

    #[test]
    fn blank_countdown_input_is_ignored() {
        let (mut app, _clock, _rx) = app(AppMode::Timer);
        assert!(!app.countdown.timer.apply_input("", "", ""));
        assert_eq!(app.countdown().timer.total_seconds(), 1800);
        assert!(app.countdown.timer.apply_input("1", "", ""));
        assert_eq!(app.countdown().timer.total_seconds(), 3600);
    }

    #[test]
    fn dropdown_switches_widgets_without_stopping_them() {
        let (mut app, _clock, _rx) = app(AppMode::Stopwatch);
        press(&mut app, " ");
        press(&mut app, "\t");
        assert_eq!(app.nav_cursor(), Some(0));
        press(&mut app, "jjjj\r");
        assert_eq!(app.mode(), AppMode::Timer);
        assert_eq!(app.nav_cursor(), None);
        assert_eq!(app.stopwatch_state(), TimerState::Running);

        press(&mut app, &format!("\t{}", KEY_ESC));
        assert_eq!(app.mode(), AppMode::Timer);
        assert_eq!(app.nav_cursor(), None);
    }

    #[test]
    fn format_choice_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _clock, _rx) = app_with(AppMode::Digital, SettingsStore::open(dir.path()));
        assert_eq!(app.hour_format(), HourFormat::TwelveHour);
        press(&mut app, "2");
        assert_eq!(app.hour_format(), HourFormat::TwentyFourHour);
        let snapshot = app.snapshot_text();
        let time_line = snapshot.lines().next().unwrap();
        assert!(!time_line.ends_with("AM") && !time_line.ends_with("PM"));

        let mut reopened = SettingsStore::open(dir.path());
        assert!(!reopened.load_use_12_hour());
    }

    #[test]
    fn settings_panel_applies_swatches_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _clock, _rx) = app_with(AppMode::Analog, SettingsStore::open(dir.path()));
        assert_eq!(app.accent(), Accent::Swatch(0));
        assert_eq!(SettingsStore::open(dir.path()).get("chosenSwatchId"), Some("swatch-teal"));

        press(&mut app, "s");
        assert_eq!(app.settings_focus(), Some(SettingsFocus::Format(HourFormat::TwelveHour)));
        press(&mut app, &format!("{}\r", KEY_RIGHT));
        assert_eq!(app.hour_format(), HourFormat::TwentyFourHour);

        press(&mut app, &format!("{}{}{}\r", KEY_DOWN, KEY_LEFT, KEY_LEFT));
        let expected = SWATCHES.len() - 2;
        assert_eq!(app.accent(), Accent::Swatch(expected));
        press(&mut app, &KEY_ESC.to_string());
        assert_eq!(app.settings_focus(), None);

        let (app2, _clock, _rx) = app_with(AppMode::Analog, SettingsStore::open(dir.path()));
        assert_eq!(app2.accent(), Accent::Swatch(expected));
        assert_eq!(app2.hour_format(), HourFormat::TwentyFourHour);
    }

    #[test]
    fn help_overlay_swallows_one_key() {
        let (mut app, _clock, _rx) = app(AppMode::Stopwatch);
        press(&mut app, "?");
        assert!(app.help_visible());
        press(&mut app, " ");
        assert!(!app.help_visible());
        assert_eq!(app.stopwatch_state(), TimerState::Idle);
    }

    #[test]
    fn redraws_wait_for_focus() {
        let (mut app, _clock, _rx) = app(AppMode::Stopwatch);
        app.take_redraw();
        app.set_focus(false);
        press(&mut app, " ");
        assert!(!app.take_redraw());
        app.set_focus(true);
        assert!(app.take_redraw());
    }

    #[test]
    fn clock_samples_redraw_only_clock_faces() {
        let (mut app, _clock, _rx) = app(AppMode::Stopwatch);
        app.activate();
        app.take_redraw();
        let generation = app.clock_pump.generation();
        app.handle_pump(PumpId::Clock as usize, generation);
        assert!(!app.take_redraw());
        app.select_mode(AppMode::Analog);
        app.take_redraw();
        app.handle_pump(PumpId::Clock as usize, generation);
        assert!(app.take_redraw());
        assert!(app.snapshot_text().starts_with("hour "));
        app.shutdown();
    }

    #[test]
    fn q_requests_quit() {
        let (mut app, _clock, _rx) = app(AppMode::Digital);
        press(&mut app, "q");
        assert!(app.quit_requested());
    }
}
