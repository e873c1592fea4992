pub mod prompt;

use chrono::{DateTime, Utc};
use collection_datastore::{CollectionContext, Comment, DataStore, Summary};
use uuid::Uuid;

use crate::{error::SummarizeError, TextGenerator};

/// What a summarize request should do with the stored summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Not enough comments yet; answer with an empty summary
    InsufficientData,
    ReturnCached(String),
    RegenerateFull {
        comments: Vec<Comment>,
        context: CollectionContext,
    },
    /// Fold comments newer than the stored summary into it
    RegenerateIncremental {
        previous: String,
        new_comments: Vec<Comment>,
        context: CollectionContext,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    InsufficientData,
    Cached,
    RegeneratedFull,
    RegeneratedIncremental,
}

/// Outcome of writing a freshly generated summary back to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    /// Nothing was generated, so nothing was written
    NotAttempted,
    Persisted { generated_at: DateTime<Utc> },
    /// The write failed; the generated text is still returned to the caller
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    pub summary: String,
    pub source: SummarySource,
    pub persistence: Persistence,
}

/// Decides whether a collection's stored summary is still fresh and
/// regenerates it through `G` when it is not.
///
/// Requests are independent: two concurrent requests for the same stale
/// collection both regenerate and the later write wins.
#[derive(Debug)]
pub struct SummaryService<D, G>
where
    D: DataStore + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    store: D,
    generator: G,
}

impl<D, G> SummaryService<D, G>
where
    D: DataStore + Send + Sync + 'static,
    G: TextGenerator + Send + Sync + 'static,
{
    /// Upper bound on comments fed to a single generation
    pub const COMMENT_LIMIT: u32 = 50;
    /// Fewest non-empty comments worth summarizing from scratch
    pub const MIN_COMMENTS: usize = 3;

    pub fn new(store: D, generator: G) -> Self {
        Self { store, generator }
    }

    /// Reads the stored summary and recent comment activity and picks one of
    /// the [`Decision`] variants. Never writes to the store.
    #[tracing::instrument(skip(self))]
    pub async fn decide(&self, collection_id: Uuid) -> Result<Decision, SummarizeError> {
        let meta = self
            .store
            .fetch_collection_meta(collection_id)
            .await?
            .filter(|meta| !meta.is_vacant())
            .ok_or(SummarizeError::NotFound)?;

        let previous = match meta.summary() {
            Summary::Present(text) => text,
            Summary::Absent => return self.decide_from_scratch(collection_id).await,
        };

        let Some(generated_at) = meta.summary_generated_at else {
            tracing::warn!(%collection_id, "Summary text present without generation timestamp");
            return Ok(Decision::ReturnCached(previous));
        };

        let new_comments = self
            .store
            .fetch_new_comments_after(collection_id, generated_at, Self::COMMENT_LIMIT)
            .await?
            .into_iter()
            .filter(Comment::has_text)
            .collect::<Vec<_>>();

        if new_comments.is_empty() {
            return Ok(Decision::ReturnCached(previous));
        }

        tracing::debug!(
            %collection_id,
            new_comments = new_comments.len(),
            "Stored summary is stale"
        );

        Ok(Decision::RegenerateIncremental {
            previous,
            new_comments,
            context: self.load_context(collection_id).await,
        })
    }

    async fn decide_from_scratch(&self, collection_id: Uuid) -> Result<Decision, SummarizeError> {
        let count = self.store.fetch_comment_count(collection_id).await?;
        if count < Self::MIN_COMMENTS as u64 {
            return Ok(Decision::InsufficientData);
        }

        let comments = self
            .store
            .fetch_latest_comments(collection_id, Self::COMMENT_LIMIT)
            .await?
            .into_iter()
            .filter(Comment::has_text)
            .collect::<Vec<_>>();

        if comments.len() < Self::MIN_COMMENTS {
            return Ok(Decision::InsufficientData);
        }

        Ok(Decision::RegenerateFull {
            comments,
            context: self.load_context(collection_id).await,
        })
    }

    /// Context only enriches the prompt, so a failed lookup degrades to an
    /// empty context instead of failing the request
    async fn load_context(&self, collection_id: Uuid) -> CollectionContext {
        self.store
            .fetch_collection_context(collection_id)
            .await
            .inspect_err(|e| {
                tracing::warn!(error = ?e, %collection_id, "Failed to load collection context")
            })
            .unwrap_or_default()
    }

    /// Returns the summary for `collection_id`, regenerating and persisting it
    /// when the stored one is missing or stale.
    #[tracing::instrument(skip(self))]
    pub async fn summarize(&self, collection_id: Uuid) -> Result<SummaryOutcome, SummarizeError> {
        let decision = self.decide(collection_id).await?;

        let (source, user_prompt) = match decision {
            Decision::InsufficientData => {
                tracing::info!(%collection_id, "Not enough comments to summarize");
                return Ok(SummaryOutcome {
                    summary: String::new(),
                    source: SummarySource::InsufficientData,
                    persistence: Persistence::NotAttempted,
                });
            }
            Decision::ReturnCached(summary) => {
                return Ok(SummaryOutcome {
                    summary,
                    source: SummarySource::Cached,
                    persistence: Persistence::NotAttempted,
                });
            }
            Decision::RegenerateFull { comments, context } => (
                SummarySource::RegeneratedFull,
                prompt::build_prompt(&comment_texts(&comments), None, Some(&context)),
            ),
            Decision::RegenerateIncremental {
                previous,
                new_comments,
                context,
            } => (
                SummarySource::RegeneratedIncremental,
                prompt::build_prompt(&comment_texts(&new_comments), Some(&previous), Some(&context)),
            ),
        };

        tracing::info!(
            %collection_id,
            ?source,
            model = self.generator.model(),
            "Generating summary"
        );

        let summary = self
            .generator
            .generate(&user_prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %collection_id, "Failed to generate summary"))
            .map_err(|e| SummarizeError::GenerationFailed(e.to_string()))?;

        let generated_at = Utc::now();
        let persistence = match self
            .store
            .update_summary(collection_id, &summary, generated_at)
            .await
        {
            Ok(()) => Persistence::Persisted { generated_at },
            Err(e) => {
                tracing::error!(error = ?e, %collection_id, "Failed to persist generated summary");
                Persistence::Failed(format!("{e:#}"))
            }
        };

        Ok(SummaryOutcome {
            summary,
            source,
            persistence,
        })
    }
}

fn comment_texts(comments: &[Comment]) -> Vec<&str> {
    comments.iter().map(|c| c.text.as_str()).collect()
}
