//! Batch sessions and the sequential processing pipeline
//!
//! A batch is the set of files uploaded together in one request,
//! processed as one unit with one resulting archive:
//! 1. The collector creates a session and hands the ordered files to
//!    the pipeline.
//! 2. The pipeline extracts each file's text, matches the policy
//!    number, and stages the renamed archive entry.
//! 3. The finished ZIP is attached to the session and delivered
//!    exactly once.

pub mod manager;
pub mod pipeline;
pub mod types;

pub use manager::BatchManager;
pub use pipeline::process_batch;
pub use types::*;
