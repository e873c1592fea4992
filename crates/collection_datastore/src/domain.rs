use chrono::{DateTime, Utc};

/// Stored AI summary of a collection.
///
/// A stored text that is empty after trimming is never a usable summary, so it
/// maps to [`Summary::Absent`] just like a `NULL` column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Summary {
    #[default]
    Absent,
    Present(String),
}

impl Summary {
    pub fn is_present(&self) -> bool {
        matches!(self, Summary::Present(_))
    }
}

impl From<Option<String>> for Summary {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) if !text.trim().is_empty() => Summary::Present(text),
            _ => Summary::Absent,
        }
    }
}

/// Summary columns of a single `collections` row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionMeta {
    /// Raw `ai_summary_text` column; `None` only when the column is `NULL`
    pub summary_text: Option<String>,
    pub summary_generated_at: Option<DateTime<Utc>>,
}

impl CollectionMeta {
    /// True when neither summary column carries a value.
    ///
    /// A row in this state is indistinguishable from a missing collection.
    pub fn is_vacant(&self) -> bool {
        self.summary_text.is_none() && self.summary_generated_at.is_none()
    }

    pub fn summary(&self) -> Summary {
        Summary::from(self.summary_text.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            created_at,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Curator metadata used to enrich prompts when visitor comments are thin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionContext {
    pub name: Option<String>,
    pub explanation: Option<String>,
}

impl CollectionContext {
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    pub fn explanation(&self) -> Option<&str> {
        non_blank(self.explanation.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.name().is_none() && self.explanation().is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_summary_text_is_absent() {
        assert_eq!(Summary::from(None), Summary::Absent);
        assert_eq!(Summary::from(Some(String::new())), Summary::Absent);
        assert_eq!(Summary::from(Some("  \n\t ".into())), Summary::Absent);
        assert_eq!(
            Summary::from(Some("Pengunjung terharu.".into())),
            Summary::Present("Pengunjung terharu.".into())
        );
    }

    #[test]
    fn test_vacant_meta_requires_both_columns_null() {
        let vacant = CollectionMeta::default();
        assert!(vacant.is_vacant());

        let empty_text = CollectionMeta {
            summary_text: Some(String::new()),
            summary_generated_at: None,
        };
        assert!(!empty_text.is_vacant());
        assert!(!empty_text.summary().is_present());

        let dangling_timestamp = CollectionMeta {
            summary_text: None,
            summary_generated_at: Some(Utc::now()),
        };
        assert!(!dangling_timestamp.is_vacant());
        assert!(!dangling_timestamp.summary().is_present());
    }

    #[test]
    fn test_context_ignores_blank_fields() {
        let context = CollectionContext {
            name: Some("   ".into()),
            explanation: Some(String::new()),
        };
        assert!(context.is_empty());

        let context = CollectionContext {
            name: Some(" Topeng Panji ".into()),
            explanation: None,
        };
        assert_eq!(context.name(), Some("Topeng Panji"));
        assert!(!context.is_empty());
    }
}
