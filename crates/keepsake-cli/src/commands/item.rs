//! Item command handlers

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use keepsake_core::{suggest_tags, ContentType, ItemPatch, NewItem, SearchQuery, Store};

use crate::output::Output;

/// Arguments for `item create`
pub struct CreateArgs {
    pub content: String,
    pub content_type: ContentType,
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
    pub tags: Vec<String>,
    pub auto_tag: bool,
}

/// Arguments for `item edit`
pub struct EditArgs {
    pub content: Option<String>,
    pub content_type: Option<ContentType>,
    pub title: Option<String>,
    pub clear_title: bool,
    pub description: Option<String>,
    pub clear_description: bool,
    pub tags: Vec<String>,
    pub clear_tags: bool,
    pub metadata: Option<String>,
    pub clear_metadata: bool,
}

/// Capture a new item
pub fn create(store: &mut Store, args: CreateArgs, output: &Output) -> Result<()> {
    let metadata = args.metadata.as_deref().map(parse_metadata).transpose()?;

    let mut input = NewItem::new(args.content_type, args.content);
    input.title = args.title;
    input.description = args.description;
    input.metadata = metadata;

    let mut item = store.create_item(&input).context("Failed to create item")?;

    // Items are born untagged; requested and suggested tags go in via update
    let mut tags = args.tags;
    if args.auto_tag {
        tags.extend(suggest_tags(
            &item.content,
            item.content_type,
            item.title.as_deref(),
            item.description.as_deref(),
        ));
    }
    if !tags.is_empty() {
        item = store
            .update_item(
                item.id,
                ItemPatch {
                    tags: Some(tags),
                    ..Default::default()
                },
            )
            .context("Failed to attach tags")?;
    }

    output.success(&format!("Captured item {}", item.id));
    output.print_item(&item);

    Ok(())
}

/// List items, optionally filtered by content type and/or tag overlap
pub fn list(
    store: &Store,
    content_type: Option<ContentType>,
    tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    let mut items = if tags.is_empty() {
        match content_type {
            Some(ct) => store.get_items_by_content_type(ct)?,
            None => store.get_all_items()?,
        }
    } else {
        store.get_items_by_tags(&tags)?
    };

    // Tag filter already applied in SQL; narrow by type here if both given
    if !tags.is_empty() {
        if let Some(ct) = content_type {
            items.retain(|item| item.content_type == ct);
        }
    }

    output.print_items(&items);
    Ok(())
}

/// Show a single item
pub fn show(store: &Store, id: i64, output: &Output) -> Result<()> {
    let item = store
        .get_item(id)?
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;

    output.print_item(&item);
    Ok(())
}

/// Edit an item
pub fn edit(store: &mut Store, id: i64, args: EditArgs, output: &Output) -> Result<()> {
    let title = if args.clear_title {
        Some(None)
    } else {
        args.title.map(Some)
    };
    let description = if args.clear_description {
        Some(None)
    } else {
        args.description.map(Some)
    };
    let tags = if args.clear_tags {
        Some(Vec::new())
    } else if !args.tags.is_empty() {
        Some(args.tags)
    } else {
        None
    };
    let metadata = if args.clear_metadata {
        Some(None)
    } else {
        args.metadata
            .as_deref()
            .map(parse_metadata)
            .transpose()?
            .map(Some)
    };

    let patch = ItemPatch {
        content_type: args.content_type,
        content: args.content,
        title,
        description,
        tags,
        metadata,
    };

    let item = store.update_item(id, patch).context("Failed to update item")?;

    output.success("Item updated");
    output.print_item(&item);

    Ok(())
}

/// Delete an item
pub fn delete(store: &mut Store, id: i64, yes: bool, output: &Output) -> Result<()> {
    let item = store
        .get_item(id)?
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;

    // Confirm deletion
    if output.should_prompt() && !yes {
        println!(
            "Delete item {}: {}",
            item.id,
            item.title.as_deref().unwrap_or(&item.content)
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete_item(id).context("Failed to delete item")?;

    output.success(&format!("Deleted item {}", id));

    Ok(())
}

/// Multi-filter search with pagination
pub fn search(
    store: &Store,
    query: Option<String>,
    content_type: Option<ContentType>,
    tags: Vec<String>,
    limit: u32,
    offset: u32,
    output: &Output,
) -> Result<()> {
    let items = store.search_items(&SearchQuery {
        query,
        content_type,
        tags,
        limit,
        offset,
    })?;

    output.print_items(&items);
    Ok(())
}

/// Keyword search, newest first
pub fn find(
    store: &Store,
    query: &str,
    limit: u32,
    content_type: Option<ContentType>,
    output: &Output,
) -> Result<()> {
    let items = store.semantic_search(query, limit, content_type)?;
    output.print_items(&items);
    Ok(())
}

/// Parse a metadata argument as a JSON object
fn parse_metadata(raw: &str) -> Result<Map<String, Value>> {
    serde_json::from_str(raw).context("Metadata must be a JSON object, e.g. '{\"key\": \"value\"}'")
}

/// Ask a yes/no question on stdin
fn confirm(prompt: &str) -> Result<bool> {
    use std::io::{self, Write};

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata_object() {
        let metadata = parse_metadata(r#"{"language": "rust", "lines": 3}"#).unwrap();
        assert_eq!(metadata.get("language"), Some(&Value::from("rust")));
        assert_eq!(metadata.get("lines"), Some(&Value::from(3)));
    }

    #[test]
    fn test_parse_metadata_rejects_non_object() {
        assert!(parse_metadata("[1, 2, 3]").is_err());
        assert!(parse_metadata("not json").is_err());
    }
}
