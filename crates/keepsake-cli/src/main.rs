//! Keepsake CLI
//!
//! Command-line interface for Keepsake - personal content capture.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use keepsake_core::models::{DEFAULT_SEARCH_LIMIT, DEFAULT_SEMANTIC_LIMIT};
use keepsake_core::{Config, ContentType, Store};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "keepsake")]
#[command(about = "Keepsake - capture snippets, links, and images with tags")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage captured items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// List all tags with usage counts
    Tags,
    /// Suggest tags for a piece of content (does not touch the store)
    Suggest {
        /// Content to analyze
        content: String,
        /// Content type (text, code, image, link)
        #[arg(short = 't', long = "type", value_parser = parse_content_type)]
        content_type: ContentType,
        /// Title to include in the analysis
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Description to include in the analysis
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (storage location, counts)
    Status,
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Capture a new item
    #[command(alias = "add")]
    Create {
        /// The content to capture (text body, code snippet, URL, image reference)
        content: String,
        /// Content type (text, code, image, link)
        #[arg(short = 't', long = "type", value_parser = parse_content_type)]
        content_type: ContentType,
        /// Display title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Metadata as a JSON object, e.g. '{"language": "rust"}'
        #[arg(short, long)]
        metadata: Option<String>,
        /// Tags to attach (repeatable; applied via a follow-up update)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Also attach rule-based suggested tags
        #[arg(long)]
        auto_tag: bool,
    },
    /// List items
    #[command(alias = "ls")]
    List {
        /// Filter by content type
        #[arg(short = 't', long = "type", value_parser = parse_content_type)]
        content_type: Option<ContentType>,
        /// Filter by tag (repeatable; matches items carrying any of them)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show item details
    Show {
        /// Item id
        id: i64,
    },
    /// Edit an item
    Edit {
        /// Item id
        id: i64,
        /// Replace the content
        #[arg(long)]
        content: Option<String>,
        /// Change the content type
        #[arg(short = 't', long = "type", value_parser = parse_content_type)]
        content_type: Option<ContentType>,
        /// Set the title
        #[arg(short = 'T', long, conflicts_with = "clear_title")]
        title: Option<String>,
        /// Clear the title
        #[arg(long)]
        clear_title: bool,
        /// Set the description
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Clear the description
        #[arg(long)]
        clear_description: bool,
        /// Replace the tag set (repeatable)
        #[arg(long = "tag", conflicts_with = "clear_tags")]
        tags: Vec<String>,
        /// Remove all tags
        #[arg(long)]
        clear_tags: bool,
        /// Set metadata as a JSON object
        #[arg(short, long, conflicts_with = "clear_metadata")]
        metadata: Option<String>,
        /// Clear the metadata
        #[arg(long)]
        clear_metadata: bool,
    },
    /// Delete an item
    #[command(alias = "rm")]
    Delete {
        /// Item id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Search items (all filters must match; tags are containment)
    Search {
        /// Substring to find in content (case-insensitive)
        query: Option<String>,
        /// Filter by content type
        #[arg(short = 't', long = "type", value_parser = parse_content_type)]
        content_type: Option<ContentType>,
        /// Required tag (repeatable; the item must carry every one)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Page size
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
        /// Page offset
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
    },
    /// Keyword search over content, title, and description, newest first
    Find {
        /// Search terms (all must match somewhere)
        query: String,
        /// Result cap
        #[arg(short, long, default_value_t = DEFAULT_SEMANTIC_LIMIT)]
        limit: u32,
        /// Filter by content type
        #[arg(short = 't', long = "type", value_parser = parse_content_type)]
        content_type: Option<ContentType>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Commands that don't need the store
    match &cli.command {
        Commands::Config { command } => {
            return handle_config_command(command.clone(), &output);
        }
        Commands::Suggest {
            content,
            content_type,
            title,
            description,
        } => {
            return commands::tag::suggest(
                content,
                *content_type,
                title.as_deref(),
                description.as_deref(),
                &output,
            );
        }
        _ => {}
    }

    let config = Config::load()?;
    let mut store = Store::open_with_config(&config)?;

    match cli.command {
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Suggest { .. } => unreachable!(), // Handled above
        Commands::Item { command } => handle_item_command(command, &mut store, &output),
        Commands::Tags => commands::tag::list(&store, &output),
        Commands::Status => commands::status::show(&store, &config, &output),
    }
}

fn handle_item_command(command: ItemCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        ItemCommands::Create {
            content,
            content_type,
            title,
            description,
            metadata,
            tags,
            auto_tag,
        } => commands::item::create(
            store,
            commands::item::CreateArgs {
                content,
                content_type,
                title,
                description,
                metadata,
                tags,
                auto_tag,
            },
            output,
        ),
        ItemCommands::List { content_type, tags } => {
            commands::item::list(store, content_type, tags, output)
        }
        ItemCommands::Show { id } => commands::item::show(store, id, output),
        ItemCommands::Edit {
            id,
            content,
            content_type,
            title,
            clear_title,
            description,
            clear_description,
            tags,
            clear_tags,
            metadata,
            clear_metadata,
        } => commands::item::edit(
            store,
            id,
            commands::item::EditArgs {
                content,
                content_type,
                title,
                clear_title,
                description,
                clear_description,
                tags,
                clear_tags,
                metadata,
                clear_metadata,
            },
            output,
        ),
        ItemCommands::Delete { id, yes } => commands::item::delete(store, id, yes, output),
        ItemCommands::Search {
            query,
            content_type,
            tags,
            limit,
            offset,
        } => commands::item::search(store, query, content_type, tags, limit, offset, output),
        ItemCommands::Find {
            query,
            limit,
            content_type,
        } => commands::item::find(store, &query, limit, content_type, output),
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

/// Parse a content type CLI argument
fn parse_content_type(s: &str) -> Result<ContentType, String> {
    s.parse::<ContentType>().map_err(|e| e.to_string())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Logs go to stderr so they never mix with --json output on stdout
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_type() {
        assert_eq!(parse_content_type("code").unwrap(), ContentType::Code);
        assert!(parse_content_type("movie").is_err());
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
