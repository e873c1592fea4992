use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{CollectionContext, CollectionMeta, Comment};

pub mod postgres;

pub trait DataStore {
    /// Summary columns of the collection, `None` when no such row exists
    fn fetch_collection_meta(
        &self,
        collection_id: Uuid,
    ) -> impl Future<Output = anyhow::Result<Option<CollectionMeta>>> + Send;

    fn fetch_comment_count(
        &self,
        collection_id: Uuid,
    ) -> impl Future<Output = anyhow::Result<u64>> + Send;

    /// Up to `limit` comments, newest first
    fn fetch_latest_comments(
        &self,
        collection_id: Uuid,
        limit: u32,
    ) -> impl Future<Output = anyhow::Result<Vec<Comment>>> + Send;

    /// Up to `limit` comments created strictly after `after`, newest first
    fn fetch_new_comments_after(
        &self,
        collection_id: Uuid,
        after: DateTime<Utc>,
        limit: u32,
    ) -> impl Future<Output = anyhow::Result<Vec<Comment>>> + Send;

    fn fetch_collection_context(
        &self,
        collection_id: Uuid,
    ) -> impl Future<Output = anyhow::Result<CollectionContext>> + Send;

    /// Writes summary text and generation timestamp in a single update
    fn update_summary(
        &self,
        collection_id: Uuid,
        summary: &str,
        generated_at: DateTime<Utc>,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl<T: DataStore + Send + Sync> DataStore for &T {
    async fn fetch_collection_meta(
        &self,
        collection_id: Uuid,
    ) -> anyhow::Result<Option<CollectionMeta>> {
        (**self).fetch_collection_meta(collection_id).await
    }

    async fn fetch_comment_count(&self, collection_id: Uuid) -> anyhow::Result<u64> {
        (**self).fetch_comment_count(collection_id).await
    }

    async fn fetch_latest_comments(
        &self,
        collection_id: Uuid,
        limit: u32,
    ) -> anyhow::Result<Vec<Comment>> {
        (**self).fetch_latest_comments(collection_id, limit).await
    }

    async fn fetch_new_comments_after(
        &self,
        collection_id: Uuid,
        after: DateTime<Utc>,
        limit: u32,
    ) -> anyhow::Result<Vec<Comment>> {
        (**self)
            .fetch_new_comments_after(collection_id, after, limit)
            .await
    }

    async fn fetch_collection_context(
        &self,
        collection_id: Uuid,
    ) -> anyhow::Result<CollectionContext> {
        (**self).fetch_collection_context(collection_id).await
    }

    async fn update_summary(
        &self,
        collection_id: Uuid,
        summary: &str,
        generated_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        (**self)
            .update_summary(collection_id, summary, generated_at)
            .await
    }
}
