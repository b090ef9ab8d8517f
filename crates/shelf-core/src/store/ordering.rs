//! Manual ordering
//!
//! The caller submits the final visual order as a list of ids. Position
//! `i` in that list becomes `display_order = i`; only records whose stored
//! order differs are written.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Bookmark, Category};
use crate::storage::Collection;
use crate::store::Store;

/// Writes needed to apply a submitted order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReorderPlan {
    /// `(id, new display order)` for records whose order changes
    pub changes: Vec<(i64, i64)>,
    /// Submitted ids that no longer exist
    pub missing: Vec<i64>,
}

/// Plan a reorder against the current `(id, display_order)` pairs
///
/// Duplicate ids are rejected. Missing ids keep their position in the
/// list but produce no write.
pub fn plan_reorder(
    current: impl IntoIterator<Item = (i64, i64)>,
    ids: &[i64],
) -> Result<ReorderPlan> {
    let mut seen = HashSet::new();
    if let Some(dup) = ids.iter().find(|id| !seen.insert(**id)) {
        return Err(Error::validation(format!(
            "Id {} appears more than once in the new order",
            dup
        )));
    }

    let current: HashMap<i64, i64> = current.into_iter().collect();
    let mut plan = ReorderPlan::default();

    for (position, id) in ids.iter().enumerate() {
        let position = position as i64;
        match current.get(id) {
            Some(&order) if order == position => {}
            Some(_) => plan.changes.push((*id, position)),
            None => plan.missing.push(*id),
        }
    }

    Ok(plan)
}

impl Store {
    /// Apply a new category order; returns the number of records written
    pub async fn reorder_categories(&mut self, ids: &[i64]) -> Result<usize> {
        let plan = plan_reorder(
            self.categories.iter().map(|c: &Category| (c.id, c.display_order)),
            ids,
        )?;
        self.apply_reorder(Collection::Categories, plan).await
    }

    /// Apply a new bookmark order; returns the number of records written
    ///
    /// Only display order changes; category assignment is untouched.
    pub async fn reorder_bookmarks(&mut self, ids: &[i64]) -> Result<usize> {
        let plan = plan_reorder(
            self.bookmarks.iter().map(|b: &Bookmark| (b.id, b.display_order)),
            ids,
        )?;
        self.apply_reorder(Collection::Bookmarks, plan).await
    }

    async fn apply_reorder(&mut self, collection: Collection, plan: ReorderPlan) -> Result<usize> {
        for id in &plan.missing {
            warn!("Skipping vanished {} record {} in reorder", collection, id);
        }

        let written = self.db.set_display_orders(collection, plan.changes).await?;
        debug!("Reordered {}: {} record(s) written", collection, written);

        if written > 0 {
            self.refresh().await?;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookmarkDraft;

    #[test]
    fn test_plan_only_changed_positions() {
        let plan = plan_reorder(vec![(1, 0), (2, 1), (3, 2)], &[1, 3, 2]).unwrap();
        assert_eq!(plan.changes, vec![(3, 1), (2, 2)]);
        assert!(plan.missing.is_empty());
    }

    #[test]
    fn test_plan_unchanged_order_writes_nothing() {
        let plan = plan_reorder(vec![(1, 0), (2, 1)], &[1, 2]).unwrap();
        assert!(plan.changes.is_empty());
    }

    #[test]
    fn test_plan_missing_ids_keep_position() {
        let plan = plan_reorder(vec![(1, 0), (2, 1)], &[9, 2, 1]).unwrap();
        assert_eq!(plan.missing, vec![9]);
        assert_eq!(plan.changes, vec![(1, 2)]);
    }

    #[test]
    fn test_plan_rejects_duplicates() {
        let err = plan_reorder(vec![(1, 0), (2, 1)], &[1, 2, 1]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_reorder_bookmarks_survives_reload() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("shelf.sqlite3");

        let (a, b, c) = {
            let mut store = Store::open_path(&path).await.unwrap();
            let a = store
                .create_bookmark(BookmarkDraft::new("A", "https://a.dev"))
                .await
                .unwrap();
            let b = store
                .create_bookmark(BookmarkDraft::new("B", "https://b.dev"))
                .await
                .unwrap();
            let c = store
                .create_bookmark(BookmarkDraft::new("C", "https://c.dev"))
                .await
                .unwrap();

            let written = store.reorder_bookmarks(&[c.id, a.id, b.id]).await.unwrap();
            assert_eq!(written, 3);
            (a.id, b.id, c.id)
        };

        let store = Store::open_path(&path).await.unwrap();
        let ids: Vec<i64> = store
            .compute_view(crate::models::CategoryFilter::All, "")
            .bookmarks
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![c, a, b]);
    }

    #[tokio::test]
    async fn test_reorder_keeps_category_assignment() {
        let mut store = Store::open_in_memory().await.unwrap();
        let tech = store.create_category("Tech").await.unwrap();
        let a = store
            .create_bookmark(BookmarkDraft::new("A", "https://a.dev").category(Some(tech.id)))
            .await
            .unwrap();
        let b = store
            .create_bookmark(BookmarkDraft::new("B", "https://b.dev"))
            .await
            .unwrap();

        store.reorder_bookmarks(&[b.id, a.id]).await.unwrap();

        let a = store.bookmark(a.id).unwrap();
        assert_eq!(a.category_id, Some(tech.id));
        assert_eq!(a.display_order, 1);
    }

    #[tokio::test]
    async fn test_reorder_categories() {
        let mut store = Store::open_in_memory().await.unwrap();
        let tech = store.create_category("Tech").await.unwrap();
        let news = store.create_category("News").await.unwrap();

        let written = store.reorder_categories(&[news.id, tech.id]).await.unwrap();
        assert_eq!(written, 2);

        let names: Vec<String> = store
            .list_categories()
            .into_iter()
            .skip(1)
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["News", "Tech"]);

        // Submitting the same order again writes nothing
        assert_eq!(store.reorder_categories(&[news.id, tech.id]).await.unwrap(), 0);
    }
}
