//! Extraction pipeline — one sequential run per request.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use incidex_core::{Error, IncidentInfo, IncidentText, Result};
use incidex_extract::{ExtractionPrompt, TextNormalizer};
use incidex_llm::CompletionClient;
use tracing::{debug, info, warn};

use crate::types::PipelineStage;

/// Sequences normalizer, prompt, backend, extractor, reconciler and builder.
///
/// Holds no mutable state; one instance is shared by all concurrent requests.
pub struct ExtractionPipeline {
    client: Arc<dyn CompletionClient>,
    normalizer: TextNormalizer,
    prompt: ExtractionPrompt,
}

impl ExtractionPipeline {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            normalizer: TextNormalizer::new(),
            prompt: ExtractionPrompt::default(),
        }
    }

    /// Replace the normalizer (e.g. to pin the reference date).
    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Run the full pipeline on raw incident text.
    ///
    /// Blank input fails with `InvalidInput` before the backend is touched.
    /// A panic in any step is reported as `Internal`.
    pub async fn extract(&self, raw_text: &str) -> Result<IncidentInfo> {
        let text = IncidentText::new(raw_text).map_err(|e| {
            warn!("Rejected incident text: {}", e);
            e
        })?;

        match AssertUnwindSafe(self.run(&text)).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                warn!("Extraction step panicked: {}", msg);
                Err(Error::Internal(msg))
            }
        }
    }

    async fn run(&self, text: &IncidentText) -> Result<IncidentInfo> {
        let mut stage = PipelineStage::Received;

        let normalized = self.normalizer.normalize(text.as_str());
        advance(&mut stage, PipelineStage::Normalized);

        let prompt = self.prompt.render(&normalized);
        advance(&mut stage, PipelineStage::Prompted);

        let raw = self
            .client
            .generate(&prompt)
            .await
            .map_err(|e| fail(stage, e))?;
        advance(&mut stage, PipelineStage::Completed);

        let parsed = incidex_extract::extract_json(&raw).map_err(|e| fail(stage, e))?;
        advance(&mut stage, PipelineStage::Extracted);

        let fields = incidex_extract::reconcile(&parsed);
        advance(&mut stage, PipelineStage::Reconciled);

        let info = incidex_extract::build(&fields);
        advance(&mut stage, PipelineStage::Built);

        info!(
            "Extracted incident: {} of {} canonical fields resolved",
            fields.len(),
            incidex_core::CanonicalField::ALL.len()
        );
        advance(&mut stage, PipelineStage::Done);
        Ok(info)
    }
}

fn advance(stage: &mut PipelineStage, next: PipelineStage) {
    debug!(from = %stage, to = %next, "Pipeline stage");
    *stage = next;
}

fn fail(stage: PipelineStage, err: Error) -> Error {
    warn!(after = %stage, kind = err.kind(), "Extraction failed: {}", err);
    err
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected failure".to_string()
    }
}
