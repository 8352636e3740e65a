//! Theme palettes.
//!
//! A fixed table of named colour schemes. Every entry supplies the same eight
//! roles; adding a theme means adding a row to [`THEMES`] and its name to
//! [`THEME_ORDER`].
use std::fmt;

use phf::phf_map;
use tracing::warn;

/// Name of the palette used when nothing else matches.
pub const DEFAULT_THEME: &str = "dark_purple";

/// A 24-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(u32);

impl Rgb {
    /// Build from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Rgb(value & 0x00FF_FFFF)
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

/// Uppercase `RRGGBB`, the form used by `<a:srgbClr val="...">`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}", self.0)
    }
}

/// The eight colour roles of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub title: Rgb,
    pub subtitle: Rgb,
    pub body: Rgb,
    pub accent: Rgb,
    pub accent_light: Rgb,
    pub background_start: Rgb,
    pub background_end: Rgb,
    pub muted: Rgb,
}

impl Palette {
    /// Role names paired with their colours.
    pub fn roles(&self) -> [(&'static str, Rgb); 8] {
        [
            ("titleColor", self.title),
            ("subtitleColor", self.subtitle),
            ("bodyColor", self.body),
            ("accent", self.accent),
            ("accentLight", self.accent_light),
            ("backgroundStart", self.background_start),
            ("backgroundEnd", self.background_end),
            ("mutedColor", self.muted),
        ]
    }
}

/// A named palette from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub palette: Palette,
}

macro_rules! theme {
    ($name:literal, bg: $bg0:literal -> $bg1:literal, title: $t:literal, subtitle: $s:literal,
     body: $b:literal, accent: $a:literal -> $al:literal, muted: $m:literal) => {
        Theme {
            name: $name,
            palette: Palette {
                title: Rgb::hex($t),
                subtitle: Rgb::hex($s),
                body: Rgb::hex($b),
                accent: Rgb::hex($a),
                accent_light: Rgb::hex($al),
                background_start: Rgb::hex($bg0),
                background_end: Rgb::hex($bg1),
                muted: Rgb::hex($m),
            },
        }
    };
}

pub static THEMES: phf::Map<&'static str, Theme> = phf_map! {
    "dark_purple" => theme!("dark_purple", bg: 0x0F0A1A -> 0x1A0A2E, title: 0xFFFFFF, subtitle: 0xC4B5FD,
        body: 0xE0E0E0, accent: 0x7C3AED -> 0xA78BFA, muted: 0x9CA3AF),
    "ocean" => theme!("ocean", bg: 0x03131A -> 0x061E33, title: 0xFFFFFF, subtitle: 0x7DD3FC,
        body: 0xD6EDF5, accent: 0x068FCF -> 0x38BDF8, muted: 0x8EA8BB),
    "forest" => theme!("forest", bg: 0x07150B -> 0x0A2814, title: 0xFFFFFF, subtitle: 0x86EFAC,
        body: 0xD8F0DB, accent: 0x16A34A -> 0x4ADE80, muted: 0x8CAF94),
    "sunset" => theme!("sunset", bg: 0x1A0A05 -> 0x301008, title: 0xFFFFFF, subtitle: 0xFDBA74,
        body: 0xF0E0D0, accent: 0xEA580C -> 0xFB923C, muted: 0xBBA08C),
    "midnight" => theme!("midnight", bg: 0x0A0A14 -> 0x121222, title: 0xFFFFFF, subtitle: 0x93C5FD,
        body: 0xD4DEEC, accent: 0x2563EB -> 0x60A5FA, muted: 0x8899AA),
    "crimson" => theme!("crimson", bg: 0x1A0608 -> 0x2D0A0F, title: 0xFFFFFF, subtitle: 0xFCA5A5,
        body: 0xF0DCDC, accent: 0xDC2626 -> 0xF87171, muted: 0xBB8C8C),
    "emerald_gold" => theme!("emerald_gold", bg: 0x0B1410 -> 0x12241A, title: 0xFFFFFF, subtitle: 0xFDE68A,
        body: 0xE8EDE0, accent: 0xCA8810 -> 0xFACC15, muted: 0xA0AA90),
    "rose" => theme!("rose", bg: 0x180814 -> 0x280C22, title: 0xFFFFFF, subtitle: 0xF9A8D4,
        body: 0xF0DCE8, accent: 0xDB2777 -> 0xF472B6, muted: 0xB08CA0),
};

/// Table order, used for listing and for substring matching.
pub const THEME_ORDER: [&str; 8] = [
    "dark_purple",
    "ocean",
    "forest",
    "sunset",
    "midnight",
    "crimson",
    "emerald_gold",
    "rose",
];

/// Names of every available theme, in table order.
pub fn available_themes() -> &'static [&'static str] {
    &THEME_ORDER
}

/// The default theme.
pub fn default_theme() -> &'static Theme {
    &THEMES[DEFAULT_THEME]
}

/// Find a theme by name without falling back.
///
/// Tries the exact name, then the name lower-cased and trimmed with spaces and
/// hyphens turned into underscores, then the first table entry that contains
/// the normalised name or is contained in it.
pub fn lookup(name: &str) -> Option<&'static Theme> {
    if let Some(theme) = THEMES.get(name) {
        return Some(theme);
    }
    let key = name.trim().to_lowercase().replace([' ', '-'], "_");
    if key.is_empty() {
        return None;
    }
    if let Some(theme) = THEMES.get(key.as_str()) {
        return Some(theme);
    }
    THEME_ORDER
        .iter()
        .find(|candidate| candidate.contains(key.as_str()) || key.contains(**candidate))
        .and_then(|candidate| THEMES.get(*candidate))
}

/// Find a theme by name, falling back to [`DEFAULT_THEME`].
///
/// An unknown name is not an error; it is logged and the default is used.
///
/// ```rust
/// use deckforge::theme::resolve;
///
/// assert_eq!(resolve("Emerald Gold").name, "emerald_gold");
/// assert_eq!(resolve("no such theme").name, "dark_purple");
/// ```
pub fn resolve(name: &str) -> &'static Theme {
    match lookup(name) {
        Some(theme) => theme,
        None => {
            if !name.trim().is_empty() {
                warn!(theme = name, fallback = DEFAULT_THEME, "unknown theme, using default");
            }
            default_theme()
        },
    }
}
