//! Word cloud layout.
//!
//! Words are placed largest first. Font size follows relative frequency,
//! damped by `relative_scaling`: at `0.0` every word keeps the previous size,
//! at `1.0` size is proportional to count. Each word walks an Archimedean
//! spiral out from the canvas centre and takes the first position where its
//! box is inside the canvas and clear of every word already placed. A word
//! that finds no position shrinks and tries again; once a word fails at the
//! minimum size the layout ends, since every later word is no larger.
//!
//! Text extents are estimated from character count, not measured from a
//! font, so boxes are approximate.

use logcloud_core::FrequencyTable;

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_EM: f64 = 0.6;
/// Line box height as a fraction of the font size.
const LINE_HEIGHT_EM: f64 = 1.2;
/// Radial distance between spiral turns, in pixels.
const SPIRAL_SPACING: f64 = 3.0;
/// Distance travelled along the spiral per step, in pixels.
const SPIRAL_STEP: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
    pub min_font_size: f64,
    /// Defaults to a fraction of the canvas height when unset.
    pub max_font_size: Option<f64>,
    pub relative_scaling: f64,
    /// Multiplier applied to the font size after a failed placement.
    pub shrink_factor: f64,
    /// Empty space kept around every word box.
    pub padding: f64,
}

impl LayoutOptions {
    pub fn new(width: u32, height: u32, max_words: usize) -> Self {
        Self {
            width,
            height,
            max_words,
            ..Self::default()
        }
    }

    fn resolved_max_font_size(&self) -> f64 {
        self.max_font_size
            .unwrap_or(f64::from(self.height) * 0.3)
            .max(self.min_font_size)
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            max_words: 200,
            min_font_size: 4.0,
            max_font_size: None,
            relative_scaling: 0.5,
            shrink_factor: 0.9,
            padding: 1.0,
        }
    }
}

/// A word with its final size and the top-left corner of its box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub count: u64,
    pub font_size: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacedWord {
    fn overlaps(&self, x: f64, y: f64, w: f64, h: f64, padding: f64) -> bool {
        x < self.x + self.width + padding
            && self.x < x + w + padding
            && y < self.y + self.height + padding
            && self.y < y + h + padding
    }
}

fn text_extent(text: &str, font_size: f64) -> (f64, f64) {
    let chars = text.chars().count().max(1) as f64;
    (chars * font_size * CHAR_WIDTH_EM, font_size * LINE_HEIGHT_EM)
}

/// Lay out the top `max_words` entries of `table`.
///
/// The result is in placement order: counts are non-increasing and so are
/// font sizes.
pub fn layout(table: &FrequencyTable, options: &LayoutOptions) -> Vec<PlacedWord> {
    // Zero counts have no size relative to anything else.
    let ranked: Vec<_> = table
        .top(options.max_words)
        .into_iter()
        .filter(|&(_, count)| count > 0)
        .collect();
    let Some(&(_, max_count)) = ranked.first() else {
        return Vec::new();
    };

    let canvas = (f64::from(options.width), f64::from(options.height));
    let scaling = options.relative_scaling.clamp(0.0, 1.0);
    let shrink = options.shrink_factor.clamp(0.1, 0.99);

    let mut placed: Vec<PlacedWord> = Vec::with_capacity(ranked.len());
    let mut font_size = options.resolved_max_font_size();
    let mut last_count = max_count;

    for (i, &(text, count)) in ranked.iter().enumerate() {
        if i == 0 {
            // Never start wider than the canvas.
            let (w, _) = text_extent(text, 1.0);
            font_size = font_size.min(canvas.0 * 0.98 / w);
        } else {
            let ratio = count as f64 / last_count as f64;
            font_size *= scaling * ratio + (1.0 - scaling);
        }

        let found = loop {
            if !font_size.is_finite() || font_size < options.min_font_size {
                break None;
            }
            if let Some(pos) = find_position(text, font_size, canvas, &placed, options.padding) {
                break Some(pos);
            }
            if font_size <= options.min_font_size {
                break None;
            }
            // The minimum itself gets one attempt.
            font_size = (font_size * shrink).max(options.min_font_size);
        };

        let Some((x, y)) = found else {
            tracing::debug!(word = text, placed = placed.len(), "canvas full, ending layout");
            break;
        };

        let (width, height) = text_extent(text, font_size);
        placed.push(PlacedWord {
            text: text.to_string(),
            count,
            font_size,
            x,
            y,
            width,
            height,
        });
        last_count = count;
    }

    placed
}

/// Walk the spiral until a clear in-bounds box is found.
fn find_position(
    text: &str,
    font_size: f64,
    (cw, ch): (f64, f64),
    placed: &[PlacedWord],
    padding: f64,
) -> Option<(f64, f64)> {
    let (w, h) = text_extent(text, font_size);
    if w > cw || h > ch {
        return None;
    }

    let (cx, cy) = (cw / 2.0, ch / 2.0);
    let aspect = ch / cw;
    let max_radius = cw.hypot(ch) / 2.0;
    let b = SPIRAL_SPACING / std::f64::consts::TAU;

    let mut theta = 0.0_f64;
    loop {
        let r = b * theta;
        if r > max_radius {
            return None;
        }
        // Flatten the spiral to the canvas shape so wide canvases fill evenly.
        let x = cx + r * theta.cos() - w / 2.0;
        let y = cy + r * aspect * theta.sin() - h / 2.0;

        let inside = x >= 0.0 && y >= 0.0 && x + w <= cw && y + h <= ch;
        if inside && !placed.iter().any(|p| p.overlaps(x, y, w, h, padding)) {
            return Some((x, y));
        }

        theta += SPIRAL_STEP / r.max(SPIRAL_STEP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(words: &[(&str, u64)]) -> FrequencyTable {
        words.iter().copied().collect()
    }

    fn sample() -> FrequencyTable {
        table(&[
            ("error", 40),
            ("timeout", 25),
            ("connection", 18),
            ("refused", 12),
            ("database", 9),
            ("retry", 7),
            ("upstream", 5),
            ("gateway", 4),
            ("latency", 3),
            ("cache", 2),
            ("miss", 1),
        ])
    }

    #[test]
    fn empty_table_places_nothing() {
        assert!(layout(&FrequencyTable::new(), &LayoutOptions::default()).is_empty());
    }

    #[test]
    fn single_word_is_centred() {
        let words = layout(&table(&[("error", 3)]), &LayoutOptions::default());
        assert_eq!(words.len(), 1);
        let w = &words[0];
        assert!((w.x + w.width / 2.0 - 400.0).abs() < 1e-6);
        assert!((w.y + w.height / 2.0 - 200.0).abs() < 1e-6);
    }

    #[test]
    fn words_stay_inside_canvas_and_do_not_overlap() {
        let opts = LayoutOptions::new(400, 200, 50);
        let words = layout(&sample(), &opts);
        assert!(!words.is_empty());
        for (i, a) in words.iter().enumerate() {
            assert!(a.x >= 0.0 && a.y >= 0.0, "{a:?}");
            assert!(a.x + a.width <= 400.0 && a.y + a.height <= 200.0, "{a:?}");
            for b in &words[i + 1..] {
                assert!(!a.overlaps(b.x, b.y, b.width, b.height, 0.0), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn font_sizes_do_not_increase() {
        let words = layout(&sample(), &LayoutOptions::default());
        assert!(words.windows(2).all(|w| w[0].font_size >= w[1].font_size));
        assert!(words.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn max_words_caps_output() {
        let opts = LayoutOptions::new(800, 400, 3);
        let words: Vec<_> = layout(&sample(), &opts).into_iter().map(|w| w.text).collect();
        assert_eq!(words, ["error", "timeout", "connection"]);
    }

    #[test]
    fn zero_scaling_keeps_one_size_until_shrinking() {
        let opts = LayoutOptions {
            relative_scaling: 0.0,
            ..LayoutOptions::default()
        };
        let words = layout(&table(&[("aaa", 10), ("bbb", 1)]), &opts);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].font_size, words[1].font_size);
    }

    #[test]
    fn long_first_word_is_sized_to_fit() {
        let long = "x".repeat(200);
        let words = layout(&table(&[(long.as_str(), 1)]), &LayoutOptions::new(800, 400, 10));
        assert_eq!(words.len(), 1);
        assert!(words[0].width <= 800.0);
    }

    #[test]
    fn tiny_canvas_ends_layout_early() {
        let opts = LayoutOptions {
            min_font_size: 10.0,
            ..LayoutOptions::new(60, 20, 100)
        };
        let words = layout(&sample(), &opts);
        assert!(words.len() < sample().len());
    }

    #[test]
    fn zero_counts_are_not_laid_out() {
        let zeros = table(&[("alpha", 0), ("beta", 0), ("gamma", 0)]);
        assert!(layout(&zeros, &LayoutOptions::default()).is_empty());

        let mixed = table(&[("alpha", 3), ("beta", 0), ("gamma", 1)]);
        let words = layout(&mixed, &LayoutOptions::default());
        let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, ["alpha", "gamma"]);
    }

    #[test]
    fn shrinking_tries_the_minimum_size() {
        // 4.3 is too tall for the canvas and 4.3 * 0.9 falls below the minimum.
        let opts = LayoutOptions {
            min_font_size: 4.0,
            max_font_size: Some(4.3),
            ..LayoutOptions::new(100, 5, 10)
        };
        let words = layout(&table(&[("abcde", 1)]), &opts);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].font_size, 4.0);
    }

    #[test]
    fn layout_is_deterministic() {
        let opts = LayoutOptions::new(300, 150, 100);
        assert_eq!(layout(&sample(), &opts), layout(&sample(), &opts));
    }
}
