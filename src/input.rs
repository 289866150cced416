//! Terminal events to key envelopes. Keys travel as chars, with the
//! non-printing keys mapped onto control characters and arrow glyphs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{AppOp, Envelope};

pub const KEY_ENTER: char = '\r';
pub const KEY_TAB: char = '\t';
pub const KEY_BACKTAB: char = '\u{0019}';
pub const KEY_ESC: char = '\u{001b}';
pub const KEY_BACKSPACE: char = '\u{0008}';
pub const KEY_F1: char = '\u{0011}';
pub const KEY_UP: char = '↑';
pub const KEY_DOWN: char = '↓';
pub const KEY_LEFT: char = '←';
pub const KEY_RIGHT: char = '→';

pub fn encode_key(key: &KeyEvent) -> Option<char> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            None
        }
        KeyCode::Char(c) => Some(c),
        KeyCode::Enter => Some(KEY_ENTER),
        KeyCode::Tab => Some(KEY_TAB),
        KeyCode::BackTab => Some(KEY_BACKTAB),
        KeyCode::Esc => Some(KEY_ESC),
        KeyCode::Backspace => Some(KEY_BACKSPACE),
        KeyCode::F(1) => Some(KEY_F1),
        KeyCode::Up => Some(KEY_UP),
        KeyCode::Down => Some(KEY_DOWN),
        KeyCode::Left => Some(KEY_LEFT),
        KeyCode::Right => Some(KEY_RIGHT),
        _ => None,
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

pub fn input_thread(main: Sender<Envelope>, quit: Arc<AtomicBool>) {
    while !quit.load(Ordering::Relaxed) {
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                log::error!("terminal input failed: {}", e);
                main.send(Envelope::new(AppOp::Quit, 0, 0)).ok();
                break;
            }
        }
        let envelope = match event::read() {
            Ok(Event::Key(key)) if is_interrupt(&key) => Some(Envelope::new(AppOp::Quit, 0, 0)),
            Ok(Event::Key(key)) => {
                encode_key(&key).map(|c| Envelope::new(AppOp::Rawkeys, c as usize, 0))
            }
            Ok(Event::Resize(_, _)) => Some(Envelope::new(AppOp::Redraw, 0, 0)),
            Ok(Event::FocusGained) => Some(Envelope::new(AppOp::FocusChange, 1, 0)),
            Ok(Event::FocusLost) => Some(Envelope::new(AppOp::FocusChange, 0, 0)),
            Ok(_) => None,
            Err(e) => {
                log::warn!("could not read terminal event: {}", e);
                None
            }
        };
        if let Some(envelope) = envelope {
            if main.send(envelope).is_err() {
                break;
            }
        }
    }
}
