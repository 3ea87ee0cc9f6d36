//! Tag command handlers

use anyhow::Result;

use keepsake_core::{suggest_tags, ContentType, Store};

use crate::output::Output;

/// List all tags with usage counts
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let tags = store.list_tags()?;
    output.print_tags(&tags);
    Ok(())
}

/// Print suggested tags for ad-hoc content
pub fn suggest(
    content: &str,
    content_type: ContentType,
    title: Option<&str>,
    description: Option<&str>,
    output: &Output,
) -> Result<()> {
    let suggestions = suggest_tags(content, content_type, title, description);
    output.print_suggestions(&suggestions);
    Ok(())
}
