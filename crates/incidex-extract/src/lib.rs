//! Incidex Extract — the pure steps of the extraction pipeline.
//!
//! Text normalization, prompt rendering, tolerant JSON extraction from model
//! output, field-name reconciliation and record building. Nothing here does
//! I/O; the backend call lives in `incidex-llm`.

pub mod normalize;
pub mod prompt;
pub mod reconcile;
pub mod record;
pub mod response;

pub use normalize::{normalize, TextNormalizer};
pub use prompt::ExtractionPrompt;
pub use reconcile::{reconcile, ReconciledFields, FUZZY_THRESHOLD};
pub use record::build;
pub use response::{extract_json, ParsedFields};
