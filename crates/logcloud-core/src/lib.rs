//! logcloud-core: payload extraction, text normalisation and frequency
//! analysis.
//!
//! # Architecture
//!
//! ```text
//! RawEntry ──► extract ──► normalizer ──► analysis ──► FrequencyTable
//! ```
//!
//! Everything here is synchronous and pure apart from warning logs for
//! skipped entries. Sources and renderers live in sibling crates.

pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalizer;
pub mod stopwords;
pub mod types;

pub use analysis::{analyze, AnalysisConfig, AnalysisMode, FrequencyTable};
pub use error::{ConfigurationError, ExtractionError};
pub use stopwords::StopWords;
pub use types::{Payload, RawEntry, Severity};
