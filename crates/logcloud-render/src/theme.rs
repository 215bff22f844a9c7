//! Colour themes for word clouds and terminal charts.
//!
//! Themes are defined as TOML files. The built-in themes are embedded in the
//! binary via [`include_str!`] so rendering works without any files on disk.
//!
//! # Colour assignment for words
//!
//! Words are hashed to a stable index into the palette so the same word
//! always gets the same colour, regardless of its rank or of what else is in
//! the cloud.

use anyhow::Context;
use config::{Config, File, FileFormat};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

const FALLBACK_FONT_FAMILY: &str = "sans-serif";

// ---------------------------------------------------------------------------
// Raw (serde) types, mirroring the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawCloud {
    font_family: Option<String>,
    palette: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawChart {
    border: RawStyle,
    bar: RawStyle,
    label: RawStyle,
    value: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    cloud: RawCloud,
    #[serde(default)]
    chart: RawChart,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Resolved colour theme.
#[derive(Debug, Clone)]
pub struct Theme {
    /// CSS `font-family` list used in SVG output.
    pub font_family: String,
    pub chart_border: Style,
    pub chart_bar: Style,
    pub chart_label: Style,
    pub chart_value: Style,
    /// Word colours, cycled by word hash.
    palette: Vec<Color>,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Load and parse the embedded Gruvbox Dark theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str(GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Resolve a built-in theme by name.
    pub fn by_name(name: &str) -> anyhow::Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::load_default()),
            "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Ok(Self::load_gruvbox_dark()),
            other => anyhow::bail!("unknown theme {other:?}, expected `default` or `gruvbox_dark`"),
        }
    }

    /// Parse a theme from a TOML string.
    ///
    /// Palette entries that are not valid colours are rejected; an empty
    /// palette is an error since every word needs a colour.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        let palette = raw
            .cloud
            .palette
            .iter()
            .map(|s| parse_color(s).with_context(|| format!("invalid palette colour {s:?}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        anyhow::ensure!(!palette.is_empty(), "theme palette must not be empty");

        Ok(Self {
            font_family: raw
                .cloud
                .font_family
                .unwrap_or_else(|| FALLBACK_FONT_FAMILY.to_string()),
            chart_border: raw.chart.border.into_style(),
            chart_bar: raw.chart.bar.into_style(),
            chart_label: raw.chart.label.into_style(),
            chart_value: raw.chart.value.into_style(),
            palette,
        })
    }

    /// Stable palette colour for a word.
    pub fn word_color(&self, word: &str) -> Color {
        self.palette[stable_hash(word) % self.palette.len()]
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Simple djb2-style hash that is stable across Rust versions and process
/// restarts, making word colour assignment deterministic.
fn stable_hash(s: &str) -> usize {
    s.bytes().fold(5381usize, |acc, b| {
        acc.wrapping_mul(31).wrapping_add(b as usize)
    })
}

/// Parse a colour name into a ratatui [`Color`].
///
/// Accepts:
/// - Named terminal colours (case-insensitive): `red`, `dark_gray`, etc.
/// - A few CSS names used by word-cloud defaults: `steelblue`, `navy`, `orange`
/// - Hex RGB: `#rrggbb`
/// - 256-colour indexed: `indexed:N`
pub fn parse_color(s: &str) -> Option<Color> {
    match s.trim().to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        "steelblue" => Some(Color::Rgb(70, 130, 180)),
        "navy" => Some(Color::Rgb(0, 0, 128)),
        "orange" => Some(Color::Rgb(255, 165, 0)),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::Indexed(n))
        }
        _ => None,
    }
}

/// The 16 ANSI colours as xterm renders them.
const ANSI_RGB: [(u8, u8, u8); 16] = [
    (0x00, 0x00, 0x00),
    (0xcd, 0x00, 0x00),
    (0x00, 0xcd, 0x00),
    (0xcd, 0xcd, 0x00),
    (0x00, 0x00, 0xee),
    (0xcd, 0x00, 0xcd),
    (0x00, 0xcd, 0xcd),
    (0xe5, 0xe5, 0xe5),
    (0x7f, 0x7f, 0x7f),
    (0xff, 0x00, 0x00),
    (0x00, 0xff, 0x00),
    (0xff, 0xff, 0x00),
    (0x5c, 0x5c, 0xff),
    (0xff, 0x00, 0xff),
    (0x00, 0xff, 0xff),
    (0xff, 0xff, 0xff),
];

/// RGB components of a colour, or `None` for [`Color::Reset`].
pub fn color_rgb(color: Color) -> Option<(u8, u8, u8)> {
    let ansi = |i: usize| Some(ANSI_RGB[i]);
    match color {
        Color::Reset => None,
        Color::Black => ansi(0),
        Color::Red => ansi(1),
        Color::Green => ansi(2),
        Color::Yellow => ansi(3),
        Color::Blue => ansi(4),
        Color::Magenta => ansi(5),
        Color::Cyan => ansi(6),
        Color::Gray => ansi(7),
        Color::DarkGray => ansi(8),
        Color::LightRed => ansi(9),
        Color::LightGreen => ansi(10),
        Color::LightYellow => ansi(11),
        Color::LightBlue => ansi(12),
        Color::LightMagenta => ansi(13),
        Color::LightCyan => ansi(14),
        Color::White => ansi(15),
        Color::Rgb(r, g, b) => Some((r, g, b)),
        Color::Indexed(n) => Some(indexed_rgb(n)),
    }
}

/// xterm 256-colour table: 16 ANSI colours, a 6×6×6 cube, then 24 greys.
fn indexed_rgb(n: u8) -> (u8, u8, u8) {
    match n {
        0..=15 => ANSI_RGB[n as usize],
        16..=231 => {
            let i = n - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            (level(i / 36), level((i / 6) % 6), level(i % 6))
        }
        232..=255 => {
            let v = 8 + (n - 232) * 10;
            (v, v, v)
        }
    }
}

/// `#rrggbb` for a colour; [`Color::Reset`] maps to `none`.
pub fn color_hex(color: Color) -> String {
    match color_rgb(color) {
        Some((r, g, b)) => format!("#{r:02x}{g:02x}{b:02x}"),
        None => "none".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
