//! Category command handlers

use anyhow::{Context, Result};

use shelf_core::{Category, Store};

use crate::editor::confirm;
use crate::output::Output;

/// List categories, "All Bookmarks" first, with bookmark counts
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let entries: Vec<_> = store
        .list_categories()
        .into_iter()
        .map(|entry| {
            let count = store.compute_view(entry.id, "").bookmarks.len();
            (entry, count)
        })
        .collect();

    output.print_categories(&entries);
    Ok(())
}

/// Create a new category
pub async fn add(store: &mut Store, name: String, output: &Output) -> Result<()> {
    let category = store.create_category(&name).await?;
    output.success(&format!(
        "Created category {}: {}",
        category.id, category.name
    ));
    Ok(())
}

/// Rename a category
pub async fn rename(store: &mut Store, id: i64, name: String, output: &Output) -> Result<()> {
    let category = store.rename_category(id, &name).await?;
    output.success(&format!("Renamed category {} to {}", category.id, category.name));
    Ok(())
}

/// Delete a category and uncategorize its bookmarks
pub async fn delete(store: &mut Store, id: i64, yes: bool, output: &Output) -> Result<()> {
    let Some(category) = store.category(id).cloned() else {
        output.warning(&format!("Category {} does not exist, nothing to delete", id));
        return Ok(());
    };

    if !yes && output.should_prompt() {
        let affected = store.compute_view(category.id.into(), "").bookmarks.len();
        println!(
            "Delete category: {} ({} bookmark(s) will become uncategorized)",
            category.name, affected
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let detached = store
        .delete_category(category.id)
        .await
        .context("Failed to delete category")?;

    output.success(&format!(
        "Deleted category {} ({} bookmark(s) uncategorized)",
        category.name, detached
    ));
    Ok(())
}

/// Submit the final category order
pub async fn reorder(store: &mut Store, ids: Vec<i64>, output: &Output) -> Result<()> {
    let written = store.reorder_categories(&ids).await?;
    output.success(&format!("Reordered categories ({} updated)", written));
    Ok(())
}

/// Resolve a category argument given as an id or a name (case-insensitive)
pub fn resolve(store: &Store, arg: &str) -> Result<Category> {
    if let Ok(id) = arg.parse::<i64>() {
        if let Some(category) = store.category(id) {
            return Ok(category.clone());
        }
    }

    store
        .categories()
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(arg.trim()))
        .ok_or_else(|| anyhow::anyhow!("No category found matching: {}", arg))
}
