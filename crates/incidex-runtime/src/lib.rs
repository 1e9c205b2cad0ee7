//! Runtime orchestrator — sequences the extraction pipeline for one request.
//!
//! normalize → prompt → complete → extract JSON → reconcile → build.
//! Failures are terminal and surface immediately; nothing is retried.

pub mod pipeline;
pub mod types;

pub use pipeline::ExtractionPipeline;
pub use types::PipelineStage;
