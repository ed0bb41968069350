/// Errors raised inside the enrichment pipeline.
///
/// `process_content` never surfaces these to callers; any of them switches the
/// call over to basic sentence-split output.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{scorer} scorer failed: {reason}")]
    Scorer { scorer: &'static str, reason: String },

    #[error("enrichment task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("enrichment result missing for chunk {0}")]
    MissingEnrichment(usize),

    #[error("notification delivery failed: {0}")]
    Notification(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl PipelineError {
    pub fn scorer(scorer: &'static str, reason: impl Into<String>) -> Self {
        Self::Scorer {
            scorer,
            reason: reason.into(),
        }
    }
}
