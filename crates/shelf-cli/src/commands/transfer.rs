//! Export and import command handlers

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use shelf_core::{Config, Store};

use crate::editor::confirm;
use crate::output::Output;

/// Write all data to a JSON file
///
/// Without `--output` the file lands in the current directory as
/// `bookmark_data_<date>.json`.
pub async fn export(store: &Store, path: Option<PathBuf>, output: &Output) -> Result<()> {
    let path = path.unwrap_or_else(|| {
        PathBuf::from(Config::export_file_name(chrono::Local::now().date_naive()))
    });

    let json = store.export_json().await?;
    atomic_write(&path, json.as_bytes())?;
    info!("Exported data to {:?}", path);

    output.success(&format!(
        "Exported {} categories and {} bookmarks to {}",
        store.category_count(),
        store.bookmark_count(),
        path.display()
    ));
    Ok(())
}

/// Replace all data with the contents of a JSON export
pub async fn import(store: &mut Store, path: PathBuf, yes: bool, output: &Output) -> Result<()> {
    let json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read import file {:?}", path))?;

    if !yes && output.should_prompt() {
        println!(
            "Importing will replace all {} categories and {} bookmarks.",
            store.category_count(),
            store.bookmark_count()
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let summary = store.import_json(&json).await?;
    output.print_import_summary(&summary);
    Ok(())
}

/// Write data to a file atomically
///
/// The data goes to a sibling temp file which is synced and then renamed
/// over the target.
fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let temp_path = path.with_extension("json.tmp");

    let mut file = File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;
    file.write_all(data)
        .with_context(|| format!("Failed to write to temp file {:?}", temp_path))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {:?}", temp_path))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename {:?} to {:?}", temp_path, path))?;

    Ok(())
}
