//! Runtime types.

use serde::Serialize;

/// Position of one request in the extraction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    /// Input accepted and validated.
    Received,
    /// Whitespace, dates, times and punctuation rewritten.
    Normalized,
    /// Prompt rendered from the template.
    Prompted,
    /// Backend returned raw text.
    Completed,
    /// JSON object isolated from the raw text.
    Extracted,
    /// Keys mapped onto the canonical fields.
    Reconciled,
    /// Typed record built.
    Built,
    Done,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Normalized => "normalized",
            Self::Prompted => "prompted",
            Self::Completed => "completed",
            Self::Extracted => "extracted",
            Self::Reconciled => "reconciled",
            Self::Built => "built",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}
