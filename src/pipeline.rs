//! One end-to-end run: fetch, extract, analyze, render.

use logcloud_core::extract::extract_messages;
use logcloud_core::{analyze, AnalysisConfig, ConfigurationError, FrequencyTable};
use logcloud_feeds::{FeedError, ListRequest, LogSource};
use logcloud_render::{RenderError, Rendered, Renderer};

/// How a run ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The source returned no entries, or none had a usable payload.
    NoEntries,
    /// Messages were found but every token was filtered out.
    NoTokens { messages: usize },
    Rendered { messages: usize, terms: usize, artifact: Rendered },
}

/// A fatal failure, named by the stage it happened in.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("log source: {0}")]
    Source(#[from] FeedError),

    #[error("configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("render: {0}")]
    Render(#[from] RenderError),
}

/// Fetch and analyze without rendering.
///
/// Returns the number of extracted messages alongside the table.
pub async fn collect<S>(
    source: &S,
    request: &ListRequest,
    analysis: &AnalysisConfig,
) -> Result<(usize, FrequencyTable), PipelineError>
where
    S: LogSource,
{
    let entries = source.list_entries(request).await?;
    tracing::info!(
        log_name = %request.qualified_log_name(),
        entries = entries.len(),
        "fetched log entries"
    );

    let messages = extract_messages(&entries);
    let table = analyze(&messages, analysis);
    tracing::info!(
        messages = messages.len(),
        terms = table.len(),
        mode = %analysis.mode,
        "analyzed messages"
    );
    Ok((messages.len(), table))
}

/// Run the whole pipeline. The renderer is only invoked with a non-empty
/// table.
pub async fn run<S, R>(
    source: &S,
    request: &ListRequest,
    analysis: &AnalysisConfig,
    renderer: &mut R,
) -> Result<Outcome, PipelineError>
where
    S: LogSource,
    R: Renderer + ?Sized,
{
    let (messages, table) = collect(source, request, analysis).await?;

    if messages == 0 {
        return Ok(Outcome::NoEntries);
    }
    if table.is_empty() {
        tracing::warn!(messages, "every token was filtered out, nothing to render");
        return Ok(Outcome::NoTokens { messages });
    }

    let artifact = renderer.render(&table)?;
    Ok(Outcome::Rendered {
        messages,
        terms: table.len(),
        artifact,
    })
}
