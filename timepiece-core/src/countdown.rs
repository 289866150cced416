use crate::format::format_hms_secs;

/// Thirty minutes.
pub const DEFAULT_COUNTDOWN_SECS: i64 = 30 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountdownDisplay {
    /// "HH:MM:SS", or "-HH:MM:SS" in overtime
    pub text: String,
    pub overtime: bool,
}

/// Second-granular countdown. Keeps counting past zero into overtime; there
/// is no floor and no automatic stop.
#[derive(Debug)]
pub struct Countdown {
    total_seconds: i64,
    default_seconds: i64,
    running: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}

impl Countdown {
    pub fn new(default_seconds: i64) -> Self {
        Self {
            total_seconds: default_seconds,
            default_seconds,
            running: false,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.total_seconds
    }

    pub fn default_seconds(&self) -> i64 {
        self.default_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Start/pause share one control. Returns whether it is now running.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// One second elapsed. Ignored unless running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.total_seconds -= 1;
        true
    }

    /// Stop and restore the configured default, not the last value entered.
    pub fn reset(&mut self) {
        self.running = false;
        self.total_seconds = self.default_seconds;
    }

    /// Commit the hour/minute/second fields. All three blank leaves the
    /// countdown untouched and returns false; otherwise each blank or
    /// non-numeric field counts as zero.
    pub fn apply_input(&mut self, hours: &str, minutes: &str, seconds: &str) -> bool {
        if hours.trim().is_empty() && minutes.trim().is_empty() && seconds.trim().is_empty() {
            return false;
        }
        let h = parse_field(hours);
        let m = parse_field(minutes);
        let s = parse_field(seconds);
        self.total_seconds = h
            .saturating_mul(3600)
            .saturating_add(m.saturating_mul(60))
            .saturating_add(s);
        true
    }

    pub fn is_overtime(&self) -> bool {
        self.total_seconds < 0
    }

    pub fn display(&self) -> CountdownDisplay {
        let formatted = format_hms_secs(self.total_seconds.unsigned_abs());
        if self.is_overtime() {
            CountdownDisplay {
                text: format!("-{}", formatted),
                overtime: true,
            }
        } else {
            CountdownDisplay {
                text: formatted,
                overtime: false,
            }
        }
    }

    /// The default split into hour, minute and second field values.
    pub fn default_fields(&self) -> [String; 3] {
        let d = self.default_seconds;
        [
            (d / 3600).to_string(),
            ((d % 3600) / 60).to_string(),
            (d % 60).to_string(),
        ]
    }
}

/// Lenient integer parse of one input field: integers as-is, finite decimals
/// floored, anything else zero.
pub fn parse_field(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return value;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value.floor() as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_into_overtime() {
        let mut cd = Countdown::default();
        assert_eq!(cd.total_seconds(), 1800);
        assert_eq!(cd.display().text, "00:30:00");

        cd.start();
        for _ in 0..1800 {
            assert!(cd.tick());
        }
        assert_eq!(cd.total_seconds(), 0);
        assert_eq!(
            cd.display(),
            CountdownDisplay { text: "00:00:00".into(), overtime: false }
        );

        cd.tick();
        assert_eq!(cd.total_seconds(), -1);
        assert_eq!(
            cd.display(),
            CountdownDisplay { text: "-00:00:01".into(), overtime: true }
        );
        assert!(cd.is_running()); // no auto stop
    }

    #[test]
    fn test_tick_ignored_when_paused() {
        let mut cd = Countdown::new(10);
        assert!(!cd.tick());
        assert_eq!(cd.total_seconds(), 10);
        assert!(cd.toggle());
        cd.tick();
        assert!(!cd.toggle());
        cd.tick();
        assert_eq!(cd.total_seconds(), 9);
    }

    #[test]
    fn test_apply_input() {
        let mut cd = Countdown::default();
        assert!(!cd.apply_input("", "", ""));
        assert!(!cd.apply_input("  ", "", " "));
        assert_eq!(cd.total_seconds(), 1800);

        assert!(cd.apply_input("1", "", ""));
        assert_eq!(cd.total_seconds(), 3600);

        assert!(cd.apply_input("0", "abc", "90"));
        assert_eq!(cd.total_seconds(), 90);

        assert!(cd.apply_input(" 1.9 ", "2", "3"));
        assert_eq!(cd.total_seconds(), 3723);
    }

    #[test]
    fn test_reset_restores_configured_default() {
        let mut cd = Countdown::new(300);
        cd.apply_input("0", "1", "0");
        cd.start();
        cd.tick();
        cd.reset();
        assert!(!cd.is_running());
        assert_eq!(cd.total_seconds(), 300);
    }

    #[test]
    fn test_default_fields() {
        assert_eq!(Countdown::default().default_fields(), ["0", "30", "0"]);
        assert_eq!(Countdown::new(3723).default_fields(), ["1", "2", "3"]);
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("42"), 42);
        assert_eq!(parse_field(" +7 "), 7);
        assert_eq!(parse_field("-1.5"), -2);
        assert_eq!(parse_field("1e2"), 100);
        assert_eq!(parse_field("NaN"), 0);
        assert_eq!(parse_field("inf"), 0);
        assert_eq!(parse_field("12ab"), 0);
        assert_eq!(parse_field(""), 0);
    }

    #[test]
    fn test_large_overtime_keeps_hours() {
        let mut cd = Countdown::new(0);
        cd.apply_input("-100", "", "");
        assert_eq!(cd.display().text, "-100:00:00");
    }
}
