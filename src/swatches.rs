use ratatui::style::Color;

use crate::storage::SavedSwatch;

pub struct Swatch {
    pub id: &'static str,
    pub name: &'static str,
    pub color: Color,
}

/// The first entry is the default accent.
pub const SWATCHES: &[Swatch] = &[
    Swatch { id: "swatch-teal", name: "Teal", color: Color::Rgb(0x2d, 0xd4, 0xbf) },
    Swatch { id: "swatch-amber", name: "Amber", color: Color::Rgb(0xf5, 0x9e, 0x0b) },
    Swatch { id: "swatch-rose", name: "Rose", color: Color::Rgb(0xf4, 0x3f, 0x5e) },
    Swatch { id: "swatch-violet", name: "Violet", color: Color::Rgb(0x8b, 0x5c, 0xf6) },
    Swatch { id: "swatch-sky", name: "Sky", color: Color::Rgb(0x38, 0xbd, 0xf8) },
    Swatch { id: "swatch-lime", name: "Lime", color: Color::Rgb(0x84, 0xcc, 0x16) },
];

/// The active accent: one of the palette entries, or a raw color restored
/// from an older save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accent {
    Swatch(usize),
    Raw(Color),
}

impl Accent {
    pub fn color(self) -> Color {
        match self {
            Accent::Swatch(index) => SWATCHES[index].color,
            Accent::Raw(color) => color,
        }
    }

    pub fn swatch_index(self) -> Option<usize> {
        match self {
            Accent::Swatch(index) => Some(index),
            Accent::Raw(_) => None,
        }
    }
}

pub fn find(id: &str) -> Option<usize> {
    SWATCHES.iter().position(|s| s.id == id)
}

/// Resolve the saved accent: a known id first, then a raw color, then `None`
/// when the caller should apply (and persist) the default.
pub fn resolve(saved: &SavedSwatch) -> Option<Accent> {
    if let Some(id) = &saved.id {
        match find(id) {
            Some(index) => return Some(Accent::Swatch(index)),
            None => log::warn!("Saved swatch {} is not in the palette", id),
        }
    }
    let raw = saved.color.as_deref()?;
    match parse_color(raw) {
        Some(color) => Some(Accent::Raw(color)),
        None => {
            log::warn!("Saved swatch color {:?} is not a color", raw);
            None
        }
    }
}

/// Accepts "#rrggbb" and "rgb(r, g, b)".
pub fn parse_color(raw: &str) -> Option<Color> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    let inner = raw.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut channels = inner.split(',').map(|c| c.trim().parse::<u8>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    if channels.next().is_some() {
        return None;
    }
    Some(Color::Rgb(r, g, b))
}

/// Step through the palette with wrap-around in both directions.
pub fn step(index: usize, forward: bool) -> usize {
    let len = SWATCHES.len();
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}
