//! Data models for Keepsake
//!
//! Defines the core data structures: CapturedItem, Tag, and the input
//! types used by the store (NewItem, ItemPatch, SearchQuery).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::StoreError;

/// Default page size for multi-filter search
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

/// Default result cap for semantic search
pub const DEFAULT_SEMANTIC_LIMIT: u32 = 10;

/// The kind of content an item holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Code,
    Image,
    Link,
}

impl ContentType {
    /// All known content types
    pub const ALL: [ContentType; 4] = [
        ContentType::Text,
        ContentType::Code,
        ContentType::Image,
        ContentType::Link,
    ];

    /// The lowercase name used in storage and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Code => "code",
            ContentType::Image => "image",
            ContentType::Link => "link",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentType::Text),
            "code" => Ok(ContentType::Code),
            "image" => Ok(ContentType::Image),
            "link" => Ok(ContentType::Link),
            other => Err(StoreError::Validation(format!(
                "invalid content type '{}' (expected one of: text, code, image, link)",
                other
            ))),
        }
    }
}

/// A captured piece of content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapturedItem {
    /// Unique identifier, assigned by the store
    pub id: i64,
    /// What kind of content this is
    pub content_type: ContentType,
    /// The content itself (text body, code snippet, URL, image reference)
    pub content: String,
    /// Optional display title
    pub title: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Tags for organization; unique, order-preserving
    pub tags: Vec<String>,
    /// Open string-keyed metadata (image dimensions, code language, ...)
    pub metadata: Option<Map<String, Value>>,
    /// When this item was created
    pub created_at: DateTime<Utc>,
    /// When this item was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new item
///
/// Carries no tags on purpose: items always start with an empty tag set,
/// and tags are attached through the update path so that the tag usage
/// counters have a single write path.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub content_type: ContentType,
    pub content: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

impl NewItem {
    /// Create a new item input with the given type and content
    pub fn new(content_type: ContentType, content: impl Into<String>) -> Self {
        Self {
            content_type,
            content: content.into(),
            title: None,
            description: None,
            metadata: None,
        }
    }
}

/// A partial update to an item
///
/// The outer `Option` distinguishes "change this field" from "leave it
/// untouched". For nullable fields the inner `Option` distinguishes
/// "set a value" from "clear it".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub content_type: Option<ContentType>,
    pub content: Option<String>,
    pub title: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub metadata: Option<Option<Map<String, Value>>>,
}

/// Parameters for multi-filter search
///
/// All filters combine conjunctively: substring match on content,
/// exact content type, and tag containment (the item must carry every
/// requested tag). Results are paged with `limit`/`offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub content_type: Option<ContentType>,
    pub tags: Vec<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: None,
            content_type: None,
            tags: Vec::new(),
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }
}

/// A tag with its live usage counter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Unique identifier, assigned by the store
    pub id: i64,
    /// Tag name, unique across the store
    pub name: String,
    /// Number of items currently carrying this tag
    pub usage_count: i64,
    /// When this tag was first used
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_round_trip() {
        for ct in ContentType::ALL {
            let parsed: ContentType = ct.as_str().parse().unwrap();
            assert_eq!(parsed, ct);
        }
    }

    #[test]
    fn test_content_type_parse_rejects_unknown() {
        let err = "video".parse::<ContentType>().unwrap_err();
        assert!(err.to_string().contains("invalid content type"));

        // Case matters: storage names are lowercase
        assert!("Text".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_content_type_serde_lowercase() {
        let json = serde_json::to_string(&ContentType::Code).unwrap();
        assert_eq!(json, "\"code\"");

        let parsed: ContentType = serde_json::from_str("\"link\"").unwrap();
        assert_eq!(parsed, ContentType::Link);
    }

    #[test]
    fn test_new_item_defaults() {
        let item = NewItem::new(ContentType::Text, "hello");
        assert_eq!(item.content, "hello");
        assert!(item.title.is_none());
        assert!(item.description.is_none());
        assert!(item.metadata.is_none());
    }

    #[test]
    fn test_patch_default_changes_nothing() {
        let patch = ItemPatch::default();
        assert!(patch.content_type.is_none());
        assert!(patch.content.is_none());
        assert!(patch.title.is_none());
        assert!(patch.description.is_none());
        assert!(patch.tags.is_none());
        assert!(patch.metadata.is_none());
    }

    #[test]
    fn test_search_query_defaults() {
        let query = SearchQuery::default();
        assert_eq!(query.limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(query.offset, 0);
        assert!(query.query.is_none());
        assert!(query.tags.is_empty());
    }

    #[test]
    fn test_captured_item_serialization() {
        let mut metadata = Map::new();
        metadata.insert("language".to_string(), Value::String("rust".to_string()));

        let item = CapturedItem {
            id: 7,
            content_type: ContentType::Code,
            content: "fn main() {}".to_string(),
            title: Some("entry point".to_string()),
            description: None,
            tags: vec!["rust".to_string()],
            metadata: Some(metadata),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&item).unwrap();
        let deserialized: CapturedItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, deserialized);
    }
}
