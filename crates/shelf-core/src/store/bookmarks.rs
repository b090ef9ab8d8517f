//! Bookmark operations

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{parse_tags, Bookmark, BookmarkDraft};
use crate::storage::Collection;
use crate::store::Store;

/// Validated bookmark fields, ready to store
struct CleanDraft {
    title: String,
    url: String,
    notes: String,
    tags: Vec<String>,
    category_id: Option<i64>,
}

impl Store {
    /// Look up a bookmark in the snapshot
    pub fn bookmark(&self, id: i64) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    /// Create a bookmark at the end of the list
    pub async fn create_bookmark(&mut self, draft: BookmarkDraft) -> Result<Bookmark> {
        let clean = self.validate(draft)?;

        let mut bookmark = Bookmark {
            id: 0,
            title: clean.title,
            url: clean.url,
            notes: clean.notes,
            tags: clean.tags,
            category_id: clean.category_id,
            display_order: self.bookmarks.len() as i64,
        };
        bookmark.id = self.db.add(&bookmark).await?;
        debug!("Created bookmark {} ({})", bookmark.id, bookmark.url);

        self.refresh().await?;
        Ok(bookmark)
    }

    /// Replace a bookmark's fields, keeping its id and display order
    pub async fn update_bookmark(&mut self, id: i64, draft: BookmarkDraft) -> Result<Bookmark> {
        let mut bookmark = self
            .bookmark(id)
            .cloned()
            .ok_or_else(|| Error::bookmark_not_found(id))?;
        let clean = self.validate(draft)?;

        bookmark.title = clean.title;
        bookmark.url = clean.url;
        bookmark.notes = clean.notes;
        bookmark.tags = clean.tags;
        bookmark.category_id = clean.category_id;

        self.db.upsert(&bookmark).await?;
        debug!("Updated bookmark {}", id);

        self.refresh().await?;
        Ok(bookmark)
    }

    /// Delete a bookmark; unknown ids are a no-op
    pub async fn delete_bookmark(&mut self, id: i64) -> Result<()> {
        self.db.remove(Collection::Bookmarks, id).await?;
        self.refresh().await
    }

    fn validate(&self, draft: BookmarkDraft) -> Result<CleanDraft> {
        let title = draft.title.trim();
        let url = draft.url.trim();
        if title.is_empty() || url.is_empty() {
            return Err(Error::validation("Bookmark title and URL are required"));
        }

        if let Some(category_id) = draft.category_id {
            if self.category(category_id).is_none() {
                return Err(Error::validation(format!(
                    "Category {} does not exist",
                    category_id
                )));
            }
        }

        Ok(CleanDraft {
            title: title.to_string(),
            url: url.to_string(),
            notes: draft.notes.trim().to_string(),
            tags: parse_tags(&draft.tags),
            category_id: draft.category_id,
        })
    }
}
