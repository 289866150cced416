mod app;
mod clock;
mod config;
mod countdown;
mod error;
mod input;
mod logging;
mod pump;
mod stopwatch;
mod storage;
mod swatches;
mod ui;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use crossterm::{
    cursor,
    event::{DisableFocusChange, EnableFocusChange},
    execute, queue,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use num_traits::FromPrimitive;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::Result;
use crate::storage::SettingsStore;

#[derive(Debug, num_derive::FromPrimitive)]
pub enum AppOp {
    Redraw = 0,
    Rawkeys,
    FocusChange,
    Pump,
    Quit,
}

/// One message for the main loop: an `AppOp` id plus two scalar arguments.
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    pub id: usize,
    pub arg1: usize,
    pub arg2: usize,
}

impl Envelope {
    pub fn new(op: AppOp, arg1: usize, arg2: usize) -> Self {
        Self {
            id: op as usize,
            arg1,
            arg2,
        }
    }
}

fn main() {
    let log_buffer = logging::init();
    let args = config::build_cli().get_matches();

    if let Err(err) = run(&args, &log_buffer) {
        log::error!("{}", err);
        eprintln!("timepiece: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &clap::ArgMatches, log_buffer: &logging::LogBuffer) -> Result<()> {
    let config = Config::from_matches(args)?;
    let storage = SettingsStore::open(&config.config_dir);
    let (tx, rx) = mpsc::channel();

    let mut app = App::new(&config, storage, Box::new(SystemClock::new()), tx.clone());

    if config.once {
        println!("{}", app.snapshot_text());
        app.shutdown();
        return Ok(());
    }

    log::info!("timepiece starting on {}", app.mode().name());

    let _screen = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let quit = Arc::new(AtomicBool::new(false));
    let input = {
        let quit = quit.clone();
        std::thread::spawn(move || input::input_thread(tx, quit))
    };

    app.activate();

    'main: loop {
        if app.take_redraw() {
            let log_lines = logging::snapshot(log_buffer);
            terminal.draw(|f| ui::draw(f, &app, &log_lines))?;
        }

        let Ok(msg) = rx.recv() else {
            break;
        };
        // Handle everything already queued before the next draw.
        for msg in std::iter::once(msg).chain(rx.try_iter()) {
            if !dispatch(&mut app, msg) {
                break 'main;
            }
        }
    }

    // Clean up
    app.shutdown();
    quit.store(true, Ordering::Relaxed);
    input.join().ok();
    log::info!("timepiece exiting");
    Ok(())
}

/// Returns false once the app should exit.
fn dispatch(app: &mut App, msg: Envelope) -> bool {
    match FromPrimitive::from_usize(msg.id) {
        Some(AppOp::Redraw) => app.request_redraw(),
        Some(AppOp::Rawkeys) => {
            if let Some(key) = char::from_u32(msg.arg1 as u32) {
                app.handle_key(key);
            }
            return !app.quit_requested();
        }
        Some(AppOp::FocusChange) => app.set_focus(msg.arg1 != 0),
        Some(AppOp::Pump) => app.handle_pump(msg.arg1, msg.arg2),
        Some(AppOp::Quit) => return false,
        None => log::error!("unknown opcode: {:?}", msg),
    }
    true
}

/// Raw mode, alternate screen, focus reporting and a hidden cursor, all
/// undone on drop, including on the error path.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen, EnableFocusChange, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal(&mut io::stdout());
        let _ = terminal::disable_raw_mode();
    }
}

fn restore_terminal(out: &mut impl io::Write) -> io::Result<()> {
    queue!(out, DisableFocusChange, LeaveAlternateScreen, cursor::Show)?;
    out.flush()
}
