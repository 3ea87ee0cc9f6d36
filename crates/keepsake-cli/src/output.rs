//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use keepsake_core::{CapturedItem, Tag};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single item in full
    pub fn print_item(&self, item: &CapturedItem) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", item.id);
                println!("Type:        {}", item.content_type);
                if let Some(ref title) = item.title {
                    println!("Title:       {}", title);
                }
                println!("Content:     {}", item.content);
                if let Some(ref desc) = item.description {
                    println!("Description: {}", desc);
                }
                if !item.tags.is_empty() {
                    println!("Tags:        {}", item.tags.join(", "));
                }
                if let Some(ref metadata) = item.metadata {
                    let json = serde_json::to_string(metadata)
                        .unwrap_or_else(|_| "(unprintable)".to_string());
                    println!("Metadata:    {}", json);
                }
                println!("Created:     {}", item.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:     {}", item.updated_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(item).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", item.id);
            }
        }
    }

    /// Print a list of items, one line each
    pub fn print_items(&self, items: &[CapturedItem]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No items found.");
                    return;
                }
                for item in items {
                    let label = item.title.as_deref().unwrap_or(&item.content);
                    let tags = if item.tags.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", item.tags.join(", "))
                    };
                    println!(
                        "{:>4} | {:5} | {}{}",
                        item.id,
                        item.content_type.to_string(),
                        truncate_line(label, 50),
                        tags
                    );
                }
                println!("\n{} item(s)", items.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(items).unwrap());
            }
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print a list of tags with usage counts
    pub fn print_tags(&self, tags: &[Tag]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for tag in tags {
                    println!("{} ({})", tag.name, tag.usage_count);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(tags).unwrap());
            }
            OutputFormat::Quiet => {
                for tag in tags {
                    println!("{}", tag.name);
                }
            }
        }
    }

    /// Print suggested tag names
    pub fn print_suggestions(&self, suggestions: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if suggestions.is_empty() {
                    println!("No suggestions.");
                    return;
                }
                println!("Suggested tags: {}", suggestions.join(", "));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(suggestions).unwrap());
            }
            OutputFormat::Quiet => {
                for tag in suggestions {
                    println!("{}", tag);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("single line", 20), "single line");
        assert_eq!(truncate_line("line one\nline two", 20), "line one");
        assert_eq!(
            truncate_line("very long single line here", 10),
            "very lo..."
        );
    }

    #[test]
    fn test_should_prompt_only_in_human_mode() {
        assert!(Output::new(OutputFormat::Human).should_prompt());
        assert!(!Output::new(OutputFormat::Json).should_prompt());
        assert!(!Output::new(OutputFormat::Quiet).should_prompt());
    }
}
