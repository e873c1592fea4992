use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use collection_datastore::{CollectionContext, CollectionMeta, Comment, DataStore};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct MockCollection {
    pub meta: CollectionMeta,
    pub comments: Vec<Comment>,
    pub context: CollectionContext,
}

impl MockCollection {
    /// A collection as it looks right after creation: empty summary text and
    /// no generation timestamp
    pub fn fresh(comments: Vec<Comment>) -> Self {
        Self {
            meta: CollectionMeta {
                summary_text: Some(String::new()),
                summary_generated_at: None,
            },
            comments,
            context: CollectionContext::default(),
        }
    }

    pub fn summarized(text: &str, generated_at: DateTime<Utc>, comments: Vec<Comment>) -> Self {
        Self {
            meta: CollectionMeta {
                summary_text: Some(text.to_string()),
                summary_generated_at: Some(generated_at),
            },
            comments,
            context: CollectionContext::default(),
        }
    }

    pub fn with_context(mut self, name: &str, explanation: &str) -> Self {
        self.context = CollectionContext {
            name: Some(name.to_string()),
            explanation: Some(explanation.to_string()),
        };
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryUpdate {
    pub collection_id: Uuid,
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct MockDataStore {
    pub collections: Arc<Mutex<HashMap<Uuid, MockCollection>>>,
    pub updates: Arc<Mutex<Vec<SummaryUpdate>>>,
    pub fail_reads_with: Option<String>,
    pub fail_updates_with: Option<String>,
    pub fail_context_with: Option<String>,
}

impl MockDataStore {
    pub fn with_collection(id: Uuid, collection: MockCollection) -> Self {
        let store = Self::default();
        store.collections.lock().unwrap().insert(id, collection);
        store
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_reads_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn failing_updates(mut self, msg: &str) -> Self {
        self.fail_updates_with = Some(msg.to_string());
        self
    }

    pub fn failing_context(mut self, msg: &str) -> Self {
        self.fail_context_with = Some(msg.to_string());
        self
    }

    pub fn add_comment(&self, id: Uuid, comment: Comment) {
        if let Some(collection) = self.collections.lock().unwrap().get_mut(&id) {
            collection.comments.push(comment);
        }
    }

    pub fn meta(&self, id: Uuid) -> Option<CollectionMeta> {
        self.collections
            .lock()
            .unwrap()
            .get(&id)
            .map(|c| c.meta.clone())
    }

    fn check_reads(&self) -> anyhow::Result<()> {
        match self.fail_reads_with {
            Some(ref msg) => Err(anyhow::anyhow!("{}", msg)),
            None => Ok(()),
        }
    }

    fn newest_first<F>(&self, id: Uuid, limit: u32, keep: F) -> Vec<Comment>
    where
        F: Fn(&Comment) -> bool,
    {
        let collections = self.collections.lock().unwrap();
        let mut comments = collections
            .get(&id)
            .map(|c| c.comments.iter().filter(|c| keep(c)).cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments.truncate(limit as usize);
        comments
    }
}

impl DataStore for MockDataStore {
    async fn fetch_collection_meta(&self, id: Uuid) -> anyhow::Result<Option<CollectionMeta>> {
        self.check_reads()?;
        Ok(self.meta(id))
    }

    async fn fetch_comment_count(&self, id: Uuid) -> anyhow::Result<u64> {
        self.check_reads()?;
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(&id)
            .map(|c| c.comments.len() as u64)
            .unwrap_or_default())
    }

    async fn fetch_latest_comments(&self, id: Uuid, limit: u32) -> anyhow::Result<Vec<Comment>> {
        self.check_reads()?;
        Ok(self.newest_first(id, limit, |_| true))
    }

    async fn fetch_new_comments_after(
        &self,
        id: Uuid,
        after: DateTime<Utc>,
        limit: u32,
    ) -> anyhow::Result<Vec<Comment>> {
        self.check_reads()?;
        Ok(self.newest_first(id, limit, |c| c.created_at > after))
    }

    async fn fetch_collection_context(&self, id: Uuid) -> anyhow::Result<CollectionContext> {
        self.check_reads()?;
        if let Some(ref msg) = self.fail_context_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(&id)
            .map(|c| c.context.clone())
            .unwrap_or_default())
    }

    async fn update_summary(
        &self,
        id: Uuid,
        summary: &str,
        generated_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        if let Some(ref msg) = self.fail_updates_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        let mut collections = self.collections.lock().unwrap();
        let Some(collection) = collections.get_mut(&id) else {
            anyhow::bail!("Collection {id} no longer exists");
        };
        collection.meta = CollectionMeta {
            summary_text: Some(summary.to_string()),
            summary_generated_at: Some(generated_at),
        };

        self.updates.lock().unwrap().push(SummaryUpdate {
            collection_id: id,
            text: summary.to_string(),
            generated_at,
        });
        Ok(())
    }
}
