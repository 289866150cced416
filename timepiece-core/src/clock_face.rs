//! Wall-clock derivations for the analog and digital faces.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HourFormat {
    TwelveHour,
    TwentyFourHour,
}

impl HourFormat {
    pub fn from_use_12_hour(use_12_hour: bool) -> Self {
        if use_12_hour {
            HourFormat::TwelveHour
        } else {
            HourFormat::TwentyFourHour
        }
    }

    pub fn is_12_hour(self) -> bool {
        self == HourFormat::TwelveHour
    }

    pub fn label(self) -> &'static str {
        match self {
            HourFormat::TwelveHour => "12H",
            HourFormat::TwentyFourHour => "24H",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClockReading {
    pub main: String,
    /// "AM"/"PM" in 12-hour mode
    pub meridiem: Option<&'static str>,
}

pub fn read_clock(hour24: u32, minute: u32, second: u32, format: HourFormat) -> ClockReading {
    match format {
        HourFormat::TwentyFourHour => ClockReading {
            main: format!("{:02}:{:02}:{:02}", hour24, minute, second),
            meridiem: None,
        },
        HourFormat::TwelveHour => {
            let hour12 = match hour24 % 12 {
                0 => 12,
                h => h,
            };
            ClockReading {
                main: format!("{:02}:{:02}:{:02}", hour12, minute, second),
                meridiem: Some(if hour24 >= 12 { "PM" } else { "AM" }),
            }
        }
    }
}

/// Clockwise degrees from twelve o'clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

pub fn hand_angles(hour24: u32, minute: u32, second: u32) -> HandAngles {
    let (h, m, s) = (f64::from(hour24 % 12), f64::from(minute), f64::from(second));
    HandAngles {
        // the hour hand creeps with the minutes and seconds
        hour: h * 30.0 + m * 0.5 + s * (0.5 / 60.0),
        minute: m * 6.0,
        second: s * 6.0,
    }
}
