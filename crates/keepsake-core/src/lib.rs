//! Keepsake Core Library
//!
//! This crate provides the core functionality for Keepsake, a personal
//! content-capture tool for snippets of text, code, images, and links.
//!
//! # Architecture
//!
//! - **SQLite**: single-file storage for captured items and tags
//! - **Tag counters**: each tag row carries a denormalized usage count,
//!   kept in step with item mutations inside one transaction
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! // Capture something
//! let item = store.create_item(&NewItem::new(ContentType::Text, "hello"))?;
//!
//! // Tags are attached via update
//! let patch = ItemPatch { tags: Some(vec!["inbox".into()]), ..Default::default() };
//! store.update_item(item.id, patch)?;
//!
//! // Query
//! let items = store.get_all_items()?;
//! ```
//!
//! # Modules
//!
//! - `store`: unified storage interface (main entry point)
//! - `models`: data structures for captured items and tags
//! - `storage`: SQLite schema and error types
//! - `tagger`: rule-based tag suggestion
//! - `config`: application configuration

pub mod config;
pub mod models;
pub mod storage;
pub mod store;
pub mod tagger;

pub use config::Config;
pub use models::{CapturedItem, ContentType, ItemPatch, NewItem, SearchQuery, Tag};
pub use storage::{StoreError, StoreResult};
pub use store::Store;
pub use tagger::suggest_tags;
