//! Status command handler

use anyhow::Result;

use keepsake_core::{Config, Store};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, config: &Config, output: &Output) -> Result<()> {
    let db_path = config.sqlite_path();
    let db_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
    let items = store.item_count().unwrap_or(0);
    let tags = store.tag_count().unwrap_or(0);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "database": {
                        "path": db_path,
                        "size": db_size,
                    },
                    "counts": {
                        "items": items,
                        "tags": tags,
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{} {}", items, tags);
        }
        OutputFormat::Human => {
            println!("Keepsake Status");
            println!("===============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Database: {}", db_path.display());
            println!("  Size:     {}", human_size(db_size));
            println!();
            println!("Contents:");
            println!("  Items: {}", items);
            println!("  Tags:  {}", tags);
        }
    }

    Ok(())
}

/// Format a byte count for humans
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }
}
