//! Command line definition and the runtime configuration built from it.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use timepiece_core::DEFAULT_COUNTDOWN_SECS;

use crate::app::AppMode;
use crate::error::{Result, TimepieceError};

const CONFIG_DIR_ENV: &str = "TIMEPIECE_CONFIG_DIR";

pub fn build_cli() -> Command {
    Command::new("timepiece")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Clocks, a stopwatch and a countdown timer for the terminal")
        .arg(
            Arg::new("widget")
                .long("widget")
                .short('w')
                .value_name("WIDGET")
                .value_parser(["analog", "digital", "stopwatch", "timer"])
                .default_value("digital")
                .help("Widget shown at startup"),
        )
        .arg(
            Arg::new("countdown")
                .long("countdown")
                .short('c')
                .value_name("SECONDS")
                .help("Countdown duration restored by reset [default: 1800]"),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding settings.json [env: TIMEPIECE_CONFIG_DIR]"),
        )
        .arg(
            Arg::new("show-ms")
                .long("show-ms")
                .action(ArgAction::SetTrue)
                .help("Show milliseconds on the stopwatch"),
        )
        .arg(
            Arg::new("once")
                .long("once")
                .action(ArgAction::SetTrue)
                .help("Print the selected widget's readout and exit"),
        )
}

#[derive(Debug, Clone)]
pub struct Config {
    pub initial_mode: AppMode,
    pub countdown_default_secs: i64,
    pub config_dir: PathBuf,
    pub show_ms: bool,
    pub once: bool,
}

impl Config {
    pub fn from_matches(args: &ArgMatches) -> Result<Self> {
        let initial_mode = args
            .get_one::<String>("widget")
            .map(|w| AppMode::from_name(w))
            .unwrap_or(AppMode::Digital);

        let countdown_default_secs = match args.get_one::<String>("countdown") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                TimepieceError::Config(format!("--countdown expects whole seconds, got {:?}", raw))
            })?,
            None => DEFAULT_COUNTDOWN_SECS,
        };

        let config_dir = match args.get_one::<String>("config-dir") {
            Some(dir) => PathBuf::from(dir),
            None => match std::env::var_os(CONFIG_DIR_ENV) {
                Some(dir) => PathBuf::from(dir),
                None => dirs::config_dir()
                    .map(|dir| dir.join("timepiece"))
                    .ok_or(TimepieceError::NoConfigDir)?,
            },
        };

        Ok(Self {
            initial_mode,
            countdown_default_secs,
            config_dir,
            show_ms: args.get_flag("show-ms"),
            once: args.get_flag("once"),
        })
    }
}
