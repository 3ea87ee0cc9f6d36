//! Rule-based tag suggestion
//!
//! A deterministic keyword classifier standing in for a model-backed
//! tagger: content-type defaults plus substring checks against a small
//! fixed vocabulary. Pure function, no I/O, no randomness, so callers can
//! rely on exact output for a given input.

use crate::models::ContentType;

/// Maximum number of suggested tags
pub const MAX_SUGGESTED_TAGS: usize = 5;

/// Suggest up to five tags for a piece of content
///
/// Suggestions come from three rule groups, in order:
/// 1. content-type defaults ("programming", "reference", "visual"/"media",
///    "notes") plus language detection for code and host detection for links
/// 2. topic keywords found anywhere in the lowercased title, description,
///    or content
/// 3. a "misc" fallback when nothing else matched
///
/// The result is deduplicated (first occurrence wins) and capped at
/// [`MAX_SUGGESTED_TAGS`].
pub fn suggest_tags(
    content: &str,
    content_type: ContentType,
    title: Option<&str>,
    description: Option<&str>,
) -> Vec<String> {
    let mut tags: Vec<&str> = Vec::new();

    // Combined text for topic checks
    let text = [title, description, Some(content)]
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    match content_type {
        ContentType::Code => {
            tags.push("programming");
            if let Some(language) = detect_language(content) {
                tags.push(language);
            }
        }
        ContentType::Link => {
            tags.push("reference");
            if content.contains("github.com") {
                tags.push("github");
            } else if content.contains("stackoverflow.com") {
                tags.push("stackoverflow");
            }
        }
        ContentType::Image => {
            tags.push("visual");
            tags.push("media");
        }
        ContentType::Text => {
            tags.push("notes");
        }
    }

    // Topic keywords over all text content
    if text.contains("api") || text.contains("endpoint") {
        tags.push("api");
    }
    if text.contains("database")
        || text.contains("db")
        || text.contains("sql")
        || text.contains("select")
        || text.contains("users")
        || text.contains("query")
    {
        tags.push("database");
    }
    if text.contains("auth") || text.contains("login") {
        tags.push("authentication");
    }
    if text.contains("test") || text.contains("testing") {
        tags.push("testing");
    }
    if text.contains("docker") || text.contains("container") {
        tags.push("docker");
    }
    if text.contains("react") || text.contains("component") {
        tags.push("react");
    }

    if tags.is_empty() {
        tags.push("misc");
    }

    // Deduplicate (first occurrence wins) and cap
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(*tag))
        .take(MAX_SUGGESTED_TAGS)
        .map(str::to_string)
        .collect()
}

/// Best-effort language detection from code content
///
/// Matches are on the raw (unlowercased) content: the SQL keywords are
/// only recognized uppercase, the way they appear in typical snippets.
fn detect_language(content: &str) -> Option<&'static str> {
    if content.contains("function") || content.contains("const") || content.contains("require") {
        Some("javascript")
    } else if content.contains("def ") || content.contains("import ") {
        Some("python")
    } else if content.contains("SELECT") || content.contains("FROM") || content.contains("WHERE") {
        Some("sql")
    } else {
        None
    }
}
