use std::fmt;

/// A formatted elapsed time. The sub-second part is kept apart from the main
/// readout so a renderer can style it differently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayParts {
    pub main: String,
    pub sub_second: Option<String>,
}

impl fmt::Display for DisplayParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.main)?;
        if let Some(sub) = &self.sub_second {
            f.write_str(sub)?;
        }
        Ok(())
    }
}

/// Format milliseconds as "HH:MM:SS" plus an optional ".mmm" suffix.
///
/// The hour field is padded to at least two digits and never wraps, so a
/// 100 hour run reads "100:00:00".
pub fn format_elapsed(total_ms: u64, include_sub_second: bool) -> DisplayParts {
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    DisplayParts {
        main: format!("{:02}:{:02}:{:02}", hours, minutes, seconds),
        sub_second: include_sub_second.then(|| format!(".{:03}", millis)),
    }
}

/// Format whole seconds as "HH:MM:SS"
pub fn format_hms_secs(total_secs: u64) -> String {
    format_elapsed(total_secs.saturating_mul(1000), false).main
}
