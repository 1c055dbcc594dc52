use crate::planner::Planner;
use crate::synthesizer::Synthesizer;
use chatskcet_common::{ChatError, Response, Result};
use std::time::Instant;

/// One query in, one grounded answer out.
pub struct Assistant {
    planner: Planner,
    synthesizer: Synthesizer,
}

impl Assistant {
    pub fn new(planner: Planner, synthesizer: Synthesizer) -> Self {
        Self {
            planner,
            synthesizer,
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Plan, optionally search, then synthesize.
    ///
    /// Planner and search failures degrade to an answer without references;
    /// only a failed synthesis call is reported as an error.
    pub async fn generate_response(&self, query: &str) -> Result<Response> {
        if query.trim().is_empty() {
            return Err(ChatError::InvalidQuery("query must not be empty".into()));
        }

        let started = Instant::now();
        tracing::info!(query_len = query.len(), "assistant.request.start");

        let references = self.planner.plan(query).await;
        let content = self
            .synthesizer
            .synthesize(query, &references)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "assistant.synthesis.failed"))?;

        tracing::info!(
            references = references.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "assistant.request.done"
        );
        Ok(Response::new(content, references))
    }
}
