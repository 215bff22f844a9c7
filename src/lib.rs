//! logcloud: word and phrase clouds from Cloud Logging exports.
//!
//! The binary is a thin shell over [`pipeline`]; the layers themselves live
//! in the workspace crates, re-exported here so integration tests can reach
//! everything through one dependency.
//!
//! # Architecture
//!
//! ```text
//! LogSource ──► extract ──► analyze ──► Renderer
//!  (feeds)       (core)      (core)     (render)
//! ```
//!
//! Only fetching is async. Analysis is a pure fold over the fetched batch.

pub mod pipeline;

pub use logcloud_core as core;
pub use logcloud_feeds as feeds;
pub use logcloud_render as render;

pub use pipeline::{Outcome, PipelineError};
