//! logcloud-render: turn a frequency table into something to look at.
//!
//! Two renderers are provided: [`SvgRenderer`] lays words out as a cloud and
//! writes an SVG file, [`TerminalRenderer`] draws a bar chart on stdout.

pub mod layout;
pub mod svg;
pub mod terminal;
pub mod theme;

use std::path::PathBuf;

use logcloud_core::config::{OutputFormat, RenderSettings};
use logcloud_core::FrequencyTable;

pub use svg::{SvgOptions, SvgRenderer};
pub use terminal::TerminalRenderer;
pub use theme::Theme;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("nothing to render: frequency table is empty")]
    EmptyTable,

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("unknown colour {0:?}")]
    InvalidColor(String),
}

/// Where a rendered artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    File { path: PathBuf, words: usize },
    Terminal { words: usize },
}

impl std::fmt::Display for Rendered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rendered::File { path, words } => {
                write!(f, "Word cloud with {words} words saved to {}", path.display())
            }
            Rendered::Terminal { words } => write!(f, "Displayed {words} words"),
        }
    }
}

pub trait Renderer {
    /// Render a non-empty table.
    fn render(&mut self, table: &FrequencyTable) -> Result<Rendered, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, table: &FrequencyTable) -> Result<Rendered, RenderError> {
        (**self).render(table)
    }
}

/// Build the renderer selected by `settings`.
pub fn from_settings(settings: &RenderSettings) -> anyhow::Result<Box<dyn Renderer>> {
    let theme = Theme::by_name(&settings.theme)?;
    Ok(match settings.output_format()? {
        OutputFormat::Svg => Box::new(SvgRenderer::new(
            settings.output_file.clone(),
            SvgOptions::from_settings(settings)?,
            theme,
        )),
        OutputFormat::Terminal => Box::new(TerminalRenderer::new(settings.max_words, theme)),
    })
}
