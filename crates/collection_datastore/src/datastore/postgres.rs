use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{datastore::DataStore, CollectionContext, CollectionMeta, Comment};

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, Clone)]
pub struct PgDataStore {
    pub pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_text: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment::new(row.comment_text.unwrap_or_default(), row.created_at)
    }
}

impl PgDataStore {
    /// Establish connection to database and create the collections and
    /// comments tables if not exists
    pub async fn init(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .inspect_err(
                |e| tracing::error!(error = ?e, "Failed to establish connection to database"),
            )
            .context("Failed to connect to postgres database")?;

        MIGRATOR
            .run(&pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to run database migrations"))
            .context("Failed to run database migrations")?;

        Ok(PgDataStore { pool })
    }
}

impl DataStore for PgDataStore {
    async fn fetch_collection_meta(
        &self,
        collection_id: Uuid,
    ) -> anyhow::Result<Option<CollectionMeta>> {
        let row = sqlx::query_as::<_, (Option<String>, Option<DateTime<Utc>>)>(
            "SELECT ai_summary_text, last_summary_generated_at FROM collections WHERE id = $1",
        )
        .bind(collection_id)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(error = ?e, %collection_id, "Failed to fetch collection meta")
        })
        .context("Failed to fetch collection meta")?;

        Ok(row.map(|(summary_text, summary_generated_at)| CollectionMeta {
            summary_text,
            summary_generated_at,
        }))
    }

    async fn fetch_comment_count(&self, collection_id: Uuid) -> anyhow::Result<u64> {
        let (count,) =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM comments WHERE collection_id = $1")
                .bind(collection_id)
                .fetch_one(&self.pool)
                .await
                .inspect_err(|e| {
                    tracing::error!(error = ?e, %collection_id, "Failed to count comments")
                })
                .context("Failed to count comments")?;

        Ok(count.max(0) as u64)
    }

    async fn fetch_latest_comments(
        &self,
        collection_id: Uuid,
        limit: u32,
    ) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT comment_text, created_at
            FROM comments
            WHERE collection_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(collection_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(error = ?e, %collection_id, "Failed to fetch latest comments")
        })
        .context("Failed to fetch latest comments")?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn fetch_new_comments_after(
        &self,
        collection_id: Uuid,
        after: DateTime<Utc>,
        limit: u32,
    ) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT comment_text, created_at
            FROM comments
            WHERE collection_id = $1 AND created_at > $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(collection_id)
        .bind(after)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(error = ?e, %collection_id, %after, "Failed to fetch new comments")
        })
        .context("Failed to fetch new comments")?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn fetch_collection_context(
        &self,
        collection_id: Uuid,
    ) -> anyhow::Result<CollectionContext> {
        let row = sqlx::query_as::<_, (Option<String>, Option<String>)>(
            "SELECT name, explanation FROM collections WHERE id = $1",
        )
        .bind(collection_id)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(error = ?e, %collection_id, "Failed to fetch collection context")
        })
        .context("Failed to fetch collection context")?;

        Ok(row
            .map(|(name, explanation)| CollectionContext { name, explanation })
            .unwrap_or_default())
    }

    async fn update_summary(
        &self,
        collection_id: Uuid,
        summary: &str,
        generated_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE collections
            SET ai_summary_text = $2, last_summary_generated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(collection_id)
        .bind(summary)
        .bind(generated_at)
        .execute(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(error = ?e, %collection_id, "Failed to update collection summary")
        })
        .context("Failed to update collection summary")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("No rows updated for collection {collection_id}");
        }

        tracing::info!(%collection_id, "Updated collection summary");
        Ok(())
    }
}
