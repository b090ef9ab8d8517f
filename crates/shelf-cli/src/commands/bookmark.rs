//! Bookmark command handlers

use anyhow::{Context, Result};

use shelf_core::{BookmarkDraft, Category, Store};

use crate::commands::category;
use crate::editor::{confirm, edit_text};
use crate::output::Output;

/// Field values supplied on the command line
#[derive(Debug, Default)]
pub struct BookmarkFields {
    pub title: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<String>,
    /// Category id or name; an empty string means uncategorized
    pub category: Option<String>,
}

impl BookmarkFields {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.notes.is_none()
            && self.tags.is_none()
            && self.category.is_none()
    }
}

/// Create a new bookmark
pub async fn add(
    store: &mut Store,
    fields: BookmarkFields,
    edit_notes: bool,
    output: &Output,
) -> Result<()> {
    let category_id = resolve_category_arg(store, fields.category.as_deref())?;

    let mut notes = fields.notes.unwrap_or_default();
    if edit_notes {
        notes = edit_text(&notes).context("Failed to edit notes")?;
    }

    let draft = BookmarkDraft::new(
        fields.title.unwrap_or_default(),
        fields.url.unwrap_or_default(),
    )
    .notes(notes)
    .tags(fields.tags.unwrap_or_default())
    .category(category_id);

    let bookmark = store.create_bookmark(draft).await?;

    output.success(&format!("Created bookmark: {}", bookmark.id));
    output.print_bookmark(&bookmark, category_of(store, bookmark.category_id));
    Ok(())
}

/// Edit a bookmark from flags, or interactively when none are given
pub async fn edit(
    store: &mut Store,
    id: i64,
    fields: BookmarkFields,
    edit_notes: bool,
    output: &Output,
) -> Result<()> {
    let Some(existing) = store.bookmark(id).cloned() else {
        output.warning(&format!("Bookmark {} no longer exists, nothing to edit", id));
        return Ok(());
    };

    let mut draft = BookmarkDraft::from_bookmark(&existing);
    let interactive = fields.is_empty() && !edit_notes;

    if interactive {
        println!("Editing bookmark: {}", existing.id);
        println!("Press Enter to keep current value, or type new value.\n");

        if let Some(title) = prompt_with_default("Title", &draft.title)? {
            draft.title = title;
        }
        if let Some(url) = prompt_with_default("URL", &draft.url)? {
            draft.url = url;
        }
        if let Some(notes) = prompt_with_default("Notes", &draft.notes)? {
            draft.notes = notes;
        }
        if let Some(tags) = prompt_with_default("Tags (comma-separated)", &draft.tags)? {
            draft.tags = tags;
        }
        let current_category = category_of(store, draft.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        if let Some(arg) =
            prompt_with_default("Category (name, id or '-' for none)", &current_category)?
        {
            let arg = if arg == "-" { String::new() } else { arg };
            draft.category_id = resolve_category_arg(store, Some(&arg))?;
        }
    } else {
        if let Some(title) = fields.title {
            draft.title = title;
        }
        if let Some(url) = fields.url {
            draft.url = url;
        }
        if let Some(notes) = fields.notes {
            draft.notes = notes;
        }
        if let Some(tags) = fields.tags {
            draft.tags = tags;
        }
        if fields.category.is_some() {
            draft.category_id = resolve_category_arg(store, fields.category.as_deref())?;
        }
        if edit_notes {
            draft.notes = edit_text(&draft.notes).context("Failed to edit notes")?;
        }
    }

    let bookmark = store.update_bookmark(id, draft).await?;

    output.success("Bookmark updated");
    output.print_bookmark(&bookmark, category_of(store, bookmark.category_id));
    Ok(())
}

/// Delete a bookmark
pub async fn delete(store: &mut Store, id: i64, yes: bool, output: &Output) -> Result<()> {
    let Some(bookmark) = store.bookmark(id).cloned() else {
        output.warning(&format!("Bookmark {} does not exist, nothing to delete", id));
        return Ok(());
    };

    if !yes && output.should_prompt() {
        println!("Delete bookmark: {} - {}", bookmark.id, bookmark.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .delete_bookmark(id)
        .await
        .context("Failed to delete bookmark")?;

    output.success(&format!("Deleted bookmark: {}", id));
    Ok(())
}

/// Show a single bookmark
pub fn show(store: &Store, id: i64, output: &Output) -> Result<()> {
    let bookmark = store
        .bookmark(id)
        .ok_or_else(|| anyhow::anyhow!("Bookmark not found: {}", id))?;

    output.print_bookmark(bookmark, category_of(store, bookmark.category_id));
    Ok(())
}

/// Open a bookmark's URL in the default browser
pub fn open(store: &Store, id: i64, output: &Output) -> Result<()> {
    let bookmark = store
        .bookmark(id)
        .ok_or_else(|| anyhow::anyhow!("Bookmark not found: {}", id))?;

    open::that(&bookmark.url).with_context(|| format!("Failed to open {}", bookmark.url))?;

    output.success(&format!("Opened {}", bookmark.url));
    Ok(())
}

/// Submit the final bookmark order
pub async fn reorder(store: &mut Store, ids: Vec<i64>, output: &Output) -> Result<()> {
    let written = store.reorder_bookmarks(&ids).await?;
    output.success(&format!("Reordered bookmarks ({} updated)", written));
    Ok(())
}

fn category_of(store: &Store, category_id: Option<i64>) -> Option<&Category> {
    category_id.and_then(|id| store.category(id))
}

/// `None` or an empty argument means uncategorized
fn resolve_category_arg(store: &Store, arg: Option<&str>) -> Result<Option<i64>> {
    match arg.map(str::trim) {
        None | Some("") => Ok(None),
        Some(arg) => category::resolve(store, arg).map(|c| Some(c.id)),
    }
}

/// Prompt with a default value, returns None if user keeps default
fn prompt_with_default(prompt: &str, default: &str) -> Result<Option<String>> {
    use std::io::{self, Write};

    if default.is_empty() {
        print!("{}: ", prompt);
    } else {
        print!("{} [{}]: ", prompt, default);
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[tokio::test]
    async fn test_add_resolves_category_name() {
        let mut store = Store::open_in_memory().await.unwrap();
        let tech = store.create_category("Tech").await.unwrap();

        let fields = BookmarkFields {
            title: Some("Rust".to_string()),
            url: Some("https://rust-lang.org".to_string()),
            tags: Some("lang, systems".to_string()),
            category: Some("tech".to_string()),
            ..Default::default()
        };
        add(&mut store, fields, false, &quiet()).await.unwrap();

        let view = store.compute_view(tech.id.into(), "");
        assert_eq!(view.bookmarks.len(), 1);
        assert_eq!(view.bookmarks[0].tags, vec!["lang", "systems"]);
    }

    #[tokio::test]
    async fn test_add_unknown_category_fails() {
        let mut store = Store::open_in_memory().await.unwrap();

        let fields = BookmarkFields {
            title: Some("Rust".to_string()),
            url: Some("https://rust-lang.org".to_string()),
            category: Some("Missing".to_string()),
            ..Default::default()
        };
        assert!(add(&mut store, fields, false, &quiet()).await.is_err());
        assert_eq!(store.bookmark_count(), 0);
    }

    #[tokio::test]
    async fn test_edit_with_flags_keeps_other_fields() {
        let mut store = Store::open_in_memory().await.unwrap();
        let created = store
            .create_bookmark(BookmarkDraft::new("Rust", "https://rust-lang.org").tags("lang"))
            .await
            .unwrap();

        let fields = BookmarkFields {
            title: Some("The Rust Language".to_string()),
            ..Default::default()
        };
        edit(&mut store, created.id, fields, false, &quiet())
            .await
            .unwrap();

        let updated = store.bookmark(created.id).unwrap();
        assert_eq!(updated.title, "The Rust Language");
        assert_eq!(updated.url, "https://rust-lang.org");
        assert_eq!(updated.tags, vec!["lang"]);
    }

    #[tokio::test]
    async fn test_edit_clears_category() {
        let mut store = Store::open_in_memory().await.unwrap();
        let tech = store.create_category("Tech").await.unwrap();
        let created = store
            .create_bookmark(
                BookmarkDraft::new("Rust", "https://rust-lang.org").category(Some(tech.id)),
            )
            .await
            .unwrap();

        let fields = BookmarkFields {
            category: Some(String::new()),
            ..Default::default()
        };
        edit(&mut store, created.id, fields, false, &quiet())
            .await
            .unwrap();

        assert_eq!(store.bookmark(created.id).unwrap().category_id, None);
    }

    #[tokio::test]
    async fn test_edit_and_delete_missing_are_noops() {
        let mut store = Store::open_in_memory().await.unwrap();

        edit(&mut store, 42, BookmarkFields::default(), false, &quiet())
            .await
            .unwrap();
        delete(&mut store, 42, true, &quiet()).await.unwrap();
        assert_eq!(store.bookmark_count(), 0);
    }
}
