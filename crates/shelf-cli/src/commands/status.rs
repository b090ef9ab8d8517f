//! Status command handler

use anyhow::Result;

use shelf_core::{Config, Store};

use crate::output::{Output, OutputFormat};

/// Show database location, size and record counts
pub async fn show(store: &Store, config: &Config, output: &Output) -> Result<()> {
    let stats = store.stats().await?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "database": stats.path,
                    "schema_version": stats.schema_version,
                    "size": stats.size_bytes,
                    "counts": {
                        "categories": stats.categories,
                        "bookmarks": stats.bookmarks
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.database_path().display());
        }
        OutputFormat::Human => {
            println!("Shelf Status");
            println!("============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.database_path().display());
            println!("  Size:     {}", stats.size_human());
            if let Some(version) = stats.schema_version {
                println!("  Schema:   v{}", version);
            }
            println!();
            println!("Contents:");
            println!("  Categories: {}", stats.categories);
            println!("  Bookmarks:  {}", stats.bookmarks);
        }
    }

    Ok(())
}
