//! Tag command handlers

use anyhow::Result;

use shelf_core::Store;

use crate::output::Output;

/// List all tags with usage counts
pub async fn list(store: &Store, output: &Output) -> Result<()> {
    let tags = store.tags_with_counts().await?;
    output.print_tags(&tags);
    Ok(())
}
