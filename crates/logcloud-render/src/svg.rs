//! SVG word cloud output.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use logcloud_core::config::RenderSettings;
use logcloud_core::FrequencyTable;
use ratatui::style::Color;

use crate::layout::{layout, LayoutOptions, PlacedWord};
use crate::theme::{color_hex, parse_color, Theme};
use crate::{RenderError, Rendered, Renderer};

/// Baseline offset from the top of a word box, as a fraction of font size.
const BASELINE_EM: f64 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    pub layout: LayoutOptions,
    pub background: Color,
    /// Border drawn around the canvas; zero disables it.
    pub contour_width: u32,
    pub contour_color: Color,
}

impl SvgOptions {
    pub fn from_settings(settings: &RenderSettings) -> Result<Self, RenderError> {
        let color = |name: &str| {
            parse_color(name).ok_or_else(|| RenderError::InvalidColor(name.to_string()))
        };
        Ok(Self {
            layout: LayoutOptions::new(settings.width, settings.height, settings.max_words),
            background: color(&settings.background_color)?,
            contour_width: settings.contour_width,
            contour_color: color(&settings.contour_color)?,
        })
    }
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            background: Color::White,
            contour_width: 3,
            contour_color: Color::Rgb(70, 130, 180),
        }
    }
}

/// Escape text for use in XML character data and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Render placed words as a standalone SVG document.
pub fn to_svg(words: &[PlacedWord], options: &SvgOptions, theme: &Theme) -> String {
    let (w, h) = (options.layout.width, options.layout.height);
    let mut doc = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(
        doc,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(
        doc,
        r#"  <rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
        color_hex(options.background)
    );
    let _ = writeln!(
        doc,
        r#"  <g font-family="{}">"#,
        escape(&theme.font_family)
    );
    for word in words {
        let _ = writeln!(
            doc,
            r#"    <text x="{:.1}" y="{:.1}" font-size="{:.1}" fill="{}">{}</text>"#,
            word.x,
            word.y + word.font_size * BASELINE_EM,
            word.font_size,
            color_hex(theme.word_color(&word.text)),
            escape(&word.text)
        );
    }
    doc.push_str("  </g>\n");

    if options.contour_width > 0 {
        let inset = f64::from(options.contour_width) / 2.0;
        let _ = writeln!(
            doc,
            r#"  <rect x="{inset:.1}" y="{inset:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            f64::from(w) - 2.0 * inset,
            f64::from(h) - 2.0 * inset,
            color_hex(options.contour_color),
            options.contour_width
        );
    }
    doc.push_str("</svg>\n");
    doc
}

/// Writes word clouds to an SVG file.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    output: PathBuf,
    options: SvgOptions,
    theme: Theme,
}

impl SvgRenderer {
    pub fn new(output: impl Into<PathBuf>, options: SvgOptions, theme: Theme) -> Self {
        Self {
            output: output.into(),
            options,
            theme,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, table: &FrequencyTable) -> Result<Rendered, RenderError> {
        if table.is_empty() {
            return Err(RenderError::EmptyTable);
        }
        let words = layout(table, &self.options.layout);
        let doc = to_svg(&words, &self.options, &self.theme);
        let path = self.output();
        std::fs::write(path, doc).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), words = words.len(), "wrote word cloud");
        Ok(Rendered::File {
            path: path.to_path_buf(),
            words: words.len(),
        })
    }
}
