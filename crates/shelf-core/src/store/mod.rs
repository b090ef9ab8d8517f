//! Session store
//!
//! The `Store` is the single owned session over the bookmark database. It
//! holds the last-fetched snapshot of both collections together with the
//! current category selection and search text.
//!
//! ## Snapshot
//!
//! The snapshot is loaded before `open` returns and re-fetched after every
//! mutation, so reads never see an unloaded or stale state.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open(&config).await?;
//!
//! let tech = store.create_category("Tech").await?;
//! store
//!     .create_bookmark(BookmarkDraft::new("Rust", "https://rust-lang.org").category(Some(tech.id)))
//!     .await?;
//!
//! let view = store.compute_view(CategoryFilter::Id(tech.id), "rust");
//! ```

mod bookmarks;
mod categories;
pub mod ordering;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Bookmark, Category, CategoryEntry, CategoryFilter};
use crate::query::{self, View};
use crate::storage::{Database, DatabaseStats, ImportSummary};
use crate::transfer::{self, ExportData};

/// Everything the presentation layer needs for one render cycle
#[derive(Debug, Clone, Serialize)]
pub struct RenderModel {
    /// Ordered categories, starting with the synthetic "all" entry
    pub categories: Vec<CategoryEntry>,
    pub selected: CategoryFilter,
    pub search: String,
    /// Active category's display title
    pub title: String,
    pub bookmarks: Vec<Bookmark>,
}

/// Single-user session over the bookmark database
pub struct Store {
    db: Database,
    categories: Vec<Category>,
    bookmarks: Vec<Bookmark>,
    selected: CategoryFilter,
    search: String,
}

impl Store {
    /// Open the database described by `config` and load the snapshot
    pub async fn open(config: &Config) -> Result<Self> {
        Self::open_path(&config.database_path()).await
    }

    /// Open a database file directly
    pub async fn open_path(path: &Path) -> Result<Self> {
        let db = Database::open(path).await?;
        Self::with_database(db).await
    }

    /// Open a fresh in-memory database (for testing)
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Self::with_database(db).await
    }

    async fn with_database(db: Database) -> Result<Self> {
        let mut store = Self {
            db,
            categories: Vec::new(),
            bookmarks: Vec::new(),
            selected: CategoryFilter::All,
            search: String::new(),
        };
        store.refresh().await?;
        Ok(store)
    }

    /// Re-fetch both collections from storage
    pub async fn refresh(&mut self) -> Result<()> {
        self.categories = self.db.get_all().await?;
        self.bookmarks = self.db.get_all().await?;

        // Selection must keep pointing at an existing category
        if let CategoryFilter::Id(id) = self.selected {
            if !self.categories.iter().any(|c| c.id == id) {
                self.selected = CategoryFilter::All;
            }
        }

        debug!(
            "Snapshot refreshed: {} categories, {} bookmarks",
            self.categories.len(),
            self.bookmarks.len()
        );
        Ok(())
    }

    // ==================== Query ====================

    /// Filter and order the snapshot for a category and search query
    pub fn compute_view(&self, filter: CategoryFilter, query: &str) -> View {
        query::compute_view(&self.categories, &self.bookmarks, filter, query)
    }

    /// View for the current selection and search text
    pub fn current_view(&self) -> View {
        self.compute_view(self.selected, &self.search)
    }

    // ==================== Presentation State ====================

    /// Select the category whose bookmarks are shown
    ///
    /// Only existing categories can be selected.
    pub fn select_category(&mut self, filter: CategoryFilter) -> Result<()> {
        if let CategoryFilter::Id(id) = filter {
            if self.category(id).is_none() {
                return Err(Error::category_not_found(id));
            }
        }
        self.selected = filter;
        Ok(())
    }

    pub fn selected_category(&self) -> CategoryFilter {
        self.selected
    }

    /// Set the free-text search
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Build the render model for the current state
    pub fn render_model(&self) -> RenderModel {
        let view = self.current_view();
        RenderModel {
            categories: self.list_categories(),
            selected: self.selected,
            search: self.search.clone(),
            title: view.title,
            bookmarks: view.bookmarks,
        }
    }

    // ==================== Export / Import ====================

    /// Read both collections fresh from storage
    pub async fn export(&self) -> Result<ExportData> {
        let categories = self.db.get_all().await?;
        let bookmarks = self.db.get_all().await?;
        let data = ExportData::new(categories, bookmarks);
        info!(
            "Exported {} categories and {} bookmarks",
            data.categories.len(),
            data.bookmarks.len()
        );
        Ok(data)
    }

    /// Export as pretty-printed JSON
    pub async fn export_json(&self) -> Result<String> {
        self.export().await?.to_json()
    }

    /// Replace all data with the contents of an export file
    ///
    /// The file is parsed completely before anything is cleared, so a
    /// malformed file leaves the database untouched.
    pub async fn import_json(&mut self, json: &str) -> Result<ImportSummary> {
        let data = transfer::parse_import(json)?;
        self.import(data).await
    }

    /// Replace all data with already-parsed export data
    pub async fn import(&mut self, data: ExportData) -> Result<ImportSummary> {
        let data = data.normalized();
        let summary = self.db.replace_all(data.categories, data.bookmarks).await?;
        info!(
            "Imported {} categories and {} bookmarks ({} skipped)",
            summary.categories, summary.bookmarks, summary.skipped
        );
        self.refresh().await?;
        Ok(summary)
    }

    // ==================== Stats ====================

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn bookmark_count(&self) -> usize {
        self.bookmarks.len()
    }

    /// Tags with usage counts
    pub async fn tags_with_counts(&self) -> Result<Vec<(String, i64)>> {
        Ok(self.db.tag_counts().await?)
    }

    /// Database size and counts
    pub async fn stats(&self) -> Result<DatabaseStats> {
        Ok(self.db.stats().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookmarkDraft;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_database() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            db_name: "test".to_string(),
            log_file: None,
        };

        let store = Store::open(&config).await.unwrap();
        assert!(config.database_path().exists());
        assert_eq!(store.category_count(), 0);
        assert_eq!(store.bookmark_count(), 0);
    }

    #[tokio::test]
    async fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shelf.sqlite3");

        {
            let mut store = Store::open_path(&path).await.unwrap();
            let tech = store.create_category("Tech").await.unwrap();
            store
                .create_bookmark(
                    BookmarkDraft::new("Rust", "https://rust-lang.org")
                        .tags("lang, systems")
                        .category(Some(tech.id)),
                )
                .await
                .unwrap();
        }

        let store = Store::open_path(&path).await.unwrap();
        assert_eq!(store.category_count(), 1);
        let view = store.compute_view(CategoryFilter::All, "");
        assert_eq!(view.bookmarks.len(), 1);
        assert_eq!(view.bookmarks[0].tags, vec!["lang", "systems"]);
    }

    #[tokio::test]
    async fn test_select_category_and_render_model() {
        let mut store = Store::open_in_memory().await.unwrap();
        let tech = store.create_category("Tech").await.unwrap();
        store
            .create_bookmark(BookmarkDraft::new("Rust", "https://rust-lang.org").category(Some(tech.id)))
            .await
            .unwrap();
        store
            .create_bookmark(BookmarkDraft::new("Loose", "https://loose.dev"))
            .await
            .unwrap();

        store.select_category(CategoryFilter::Id(tech.id)).unwrap();
        let model = store.render_model();
        assert_eq!(model.title, "Tech");
        assert_eq!(model.categories.len(), 2);
        assert_eq!(model.bookmarks.len(), 1);

        store.set_search("nothing matches");
        assert!(store.render_model().bookmarks.is_empty());
    }

    #[tokio::test]
    async fn test_select_unknown_category_is_not_found() {
        let mut store = Store::open_in_memory().await.unwrap();
        let err = store.select_category(CategoryFilter::Id(3)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.selected_category(), CategoryFilter::All);
    }

    #[tokio::test]
    async fn test_export_import_round_trip_populated() {
        let mut source = Store::open_in_memory().await.unwrap();
        let tech = source.create_category("Tech").await.unwrap();
        source.create_category("News").await.unwrap();
        source
            .create_bookmark(
                BookmarkDraft::new("Rust", "https://rust-lang.org")
                    .notes("systems language")
                    .tags("rust, lang")
                    .category(Some(tech.id)),
            )
            .await
            .unwrap();
        source
            .create_bookmark(BookmarkDraft::new("Loose", "https://loose.dev"))
            .await
            .unwrap();
        let json = source.export_json().await.unwrap();

        let mut target = Store::open_in_memory().await.unwrap();
        target
            .create_bookmark(BookmarkDraft::new("Old", "https://old.dev"))
            .await
            .unwrap();
        let summary = target.import_json(&json).await.unwrap();
        assert_eq!(summary.categories, 2);
        assert_eq!(summary.bookmarks, 2);
        assert_eq!(summary.skipped, 0);

        let mut before = source.export().await.unwrap();
        let mut after = target.export().await.unwrap();
        before.sort_by_id();
        after.sort_by_id();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_export_import_round_trip_empty() {
        let source = Store::open_in_memory().await.unwrap();
        let json = source.export_json().await.unwrap();

        let mut target = Store::open_in_memory().await.unwrap();
        target.create_category("Leftover").await.unwrap();
        target.import_json(&json).await.unwrap();

        assert_eq!(target.category_count(), 0);
        assert_eq!(target.bookmark_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_import_changes_nothing() {
        let mut store = Store::open_in_memory().await.unwrap();
        store.create_category("Keep").await.unwrap();

        let err = store.import_json("{ not json").await.unwrap_err();
        assert!(matches!(err, Error::MalformedImport(_)));

        let err = store
            .import_json(r#"{"categories": "nope"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedImport(_)));

        assert_eq!(store.category_count(), 1);
    }

    #[tokio::test]
    async fn test_import_resets_selection_when_category_gone() {
        let mut store = Store::open_in_memory().await.unwrap();
        let tech = store.create_category("Tech").await.unwrap();
        store.select_category(CategoryFilter::Id(tech.id)).unwrap();

        store
            .import_json(r#"{"categories": [], "bookmarks": []}"#)
            .await
            .unwrap();
        assert_eq!(store.selected_category(), CategoryFilter::All);
    }
}
