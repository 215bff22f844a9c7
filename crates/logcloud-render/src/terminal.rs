//! Terminal output: a horizontal bar chart of the most frequent words,
//! drawn into an inline viewport below the prompt.

use std::io;

use logcloud_core::FrequencyTable;
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Direction, Rect},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Widget},
    Terminal, TerminalOptions, Viewport,
};

use crate::theme::Theme;
use crate::{RenderError, Rendered, Renderer};

/// Bar chart of ranked `(word, count)` pairs, one row per word.
pub struct CloudChart<'a> {
    words: &'a [(&'a str, u64)],
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> CloudChart<'a> {
    pub fn new(words: &'a [(&'a str, u64)], title: &'a str, theme: &'a Theme) -> Self {
        Self { words, title, theme }
    }
}

impl Widget for CloudChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bars: Vec<Bar> = self
            .words
            .iter()
            .map(|&(word, count)| {
                Bar::default()
                    .value(count)
                    .label(Line::from(word.to_string()))
                    .style(self.theme.chart_bar)
                    .value_style(self.theme.chart_value)
            })
            .collect();

        BarChart::default()
            .block(
                Block::bordered()
                    .title(format!(" {} ", self.title))
                    .border_style(self.theme.chart_border),
            )
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .bar_style(self.theme.chart_bar)
            .label_style(self.theme.chart_label)
            .data(BarGroup::default().bars(&bars))
            .render(area, buf);
    }
}

/// Draws the chart inline on stdout.
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    max_words: usize,
    theme: Theme,
}

impl TerminalRenderer {
    pub fn new(max_words: usize, theme: Theme) -> Self {
        Self { max_words, theme }
    }
}

/// Rows available for bars once borders and the prompt line are taken.
fn visible_rows(terminal_height: u16, max_words: usize) -> usize {
    usize::from(terminal_height.saturating_sub(3)).min(max_words)
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, table: &FrequencyTable) -> Result<Rendered, RenderError> {
        if table.is_empty() {
            return Err(RenderError::EmptyTable);
        }

        let (_, rows) = crossterm::terminal::size()?;
        let words = table.top(visible_rows(rows, self.max_words).max(1));
        let title = format!("top {} of {} terms", words.len(), table.len());
        let height = words.len() as u16 + 2;

        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(height),
            },
        )?;
        terminal.draw(|f| {
            f.render_widget(CloudChart::new(&words, &title, &self.theme), f.area());
        })?;
        drop(terminal);
        println!();

        tracing::info!(words = words.len(), "drew terminal chart");
        Ok(Rendered::Terminal { words: words.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn chart_draws_one_row_per_word_inside_border() {
        let theme = Theme::load_default();
        let words = [("error", 10u64), ("timeout", 5), ("retry", 1)];
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);

        CloudChart::new(&words, "terms", &theme).render(area, &mut buf);

        assert!(row(&buf, 0).contains("terms"));
        assert!(row(&buf, 1).contains("error"));
        assert!(row(&buf, 2).contains("timeout"));
        assert!(row(&buf, 3).contains("retry"));
        assert_eq!(buf[(0, 0)].symbol(), "┌");
        assert_eq!(buf[(0, 4)].symbol(), "└");
    }

    #[test]
    fn longest_bar_belongs_to_top_word() {
        let theme = Theme::load_default();
        let words = [("error", 10u64), ("retry", 1)];
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);

        CloudChart::new(&words, "terms", &theme).render(area, &mut buf);

        let bar_cells = |y| row(&buf, y).matches('█').count();
        assert!(bar_cells(1) > bar_cells(2));
    }

    #[test]
    fn visible_rows_leave_room_for_borders() {
        assert_eq!(visible_rows(24, 200), 21);
        assert_eq!(visible_rows(24, 5), 5);
        assert_eq!(visible_rows(2, 5), 0);
    }
}
