/// Failures of a single summarize request.
///
/// Persistence failures after a successful generation are not represented
/// here; they are reported through [`crate::Persistence::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("Collection not found")]
    NotFound,
    #[error("Summary generation failed: {0}")]
    GenerationFailed(String),
    #[error("Datastore error: {0:#}")]
    Store(#[from] anyhow::Error),
}
