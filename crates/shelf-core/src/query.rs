//! Filtered, ordered views over a snapshot
//!
//! Pure functions: the result depends only on the records passed in and
//! the filter/query arguments.

use serde::Serialize;

use crate::models::{Bookmark, Category, CategoryEntry, CategoryFilter, ALL_BOOKMARKS};

/// The visible bookmark list for one category selection and search
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct View {
    /// Name of the active category, or "All Bookmarks"
    pub title: String,
    pub bookmarks: Vec<Bookmark>,
}

/// Sort by display order, ties by name
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Sort by display order, ties by title
pub fn sort_bookmarks(bookmarks: &mut [Bookmark]) {
    bookmarks.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// Sidebar listing: the synthetic "all" entry, then categories in order
pub fn category_entries(categories: &[Category]) -> Vec<CategoryEntry> {
    let mut sorted = categories.to_vec();
    sort_categories(&mut sorted);

    std::iter::once(CategoryEntry::all())
        .chain(sorted.iter().map(CategoryEntry::from))
        .collect()
}

/// Display title for a category selection
///
/// Unknown category ids fall back to "All Bookmarks".
pub fn view_title(categories: &[Category], filter: CategoryFilter) -> String {
    match filter {
        CategoryFilter::All => ALL_BOOKMARKS.to_string(),
        CategoryFilter::Id(id) => categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| ALL_BOOKMARKS.to_string()),
    }
}

/// Compute the visible bookmarks for a category filter and search query
pub fn compute_view(
    categories: &[Category],
    bookmarks: &[Bookmark],
    filter: CategoryFilter,
    query: &str,
) -> View {
    let needle = query.trim().to_lowercase();

    let mut visible: Vec<Bookmark> = bookmarks
        .iter()
        .filter(|b| filter.admits(b.category_id))
        .filter(|b| needle.is_empty() || b.matches(&needle))
        .cloned()
        .collect();
    sort_bookmarks(&mut visible);

    View {
        title: view_title(categories, filter),
        bookmarks: visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str, order: i64) -> Category {
        Category {
            id,
            name: name.to_string(),
            display_order: order,
        }
    }

    fn bookmark(id: i64, title: &str, category_id: Option<i64>, order: i64) -> Bookmark {
        Bookmark {
            id,
            title: title.to_string(),
            url: format!("https://example.com/{}", id),
            notes: String::new(),
            tags: Vec::new(),
            category_id,
            display_order: order,
        }
    }

    fn titles(view: &View) -> Vec<&str> {
        view.bookmarks.iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn test_all_returns_everything_in_order() {
        let bookmarks = vec![
            bookmark(1, "beta", Some(1), 1),
            bookmark(2, "alpha", None, 1),
            bookmark(3, "gamma", Some(2), 0),
        ];

        let view = compute_view(&[], &bookmarks, CategoryFilter::All, "");
        assert_eq!(view.title, ALL_BOOKMARKS);
        assert_eq!(titles(&view), vec!["gamma", "alpha", "beta"]);
    }

    #[test]
    fn test_title_tie_break_is_case_sensitive() {
        let bookmarks = vec![
            bookmark(1, "apple", None, 0),
            bookmark(2, "Banana", None, 0),
        ];

        let view = compute_view(&[], &bookmarks, CategoryFilter::All, "");
        assert_eq!(titles(&view), vec!["Banana", "apple"]);
    }

    #[test]
    fn test_category_filter_excludes_uncategorized() {
        let categories = vec![category(1, "Tech", 0)];
        let bookmarks = vec![
            bookmark(1, "in tech", Some(1), 0),
            bookmark(2, "loose", None, 1),
            bookmark(3, "elsewhere", Some(2), 2),
        ];

        let view = compute_view(&categories, &bookmarks, CategoryFilter::Id(1), "");
        assert_eq!(view.title, "Tech");
        assert_eq!(titles(&view), vec!["in tech"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_fields() {
        let mut by_title = bookmark(1, "FOO manual", Some(1), 0);
        by_title.url = "https://a.dev".to_string();
        let mut by_url = bookmark(2, "url", Some(1), 1);
        by_url.url = "https://Foo.dev".to_string();
        let mut by_notes = bookmark(3, "notes", Some(1), 2);
        by_notes.notes = "about fOo".to_string();
        let mut by_tag = bookmark(4, "tag", Some(1), 3);
        by_tag.tags = vec!["foobar".to_string()];
        let other_category = bookmark(5, "foo elsewhere", Some(2), 4);
        let miss = bookmark(6, "nothing", Some(1), 5);

        let bookmarks = vec![by_title, by_url, by_notes, by_tag, other_category, miss];
        let view = compute_view(&[], &bookmarks, CategoryFilter::Id(1), "  Foo ");
        assert_eq!(titles(&view), vec!["FOO manual", "url", "notes", "tag"]);
    }

    #[test]
    fn test_unknown_category_title_falls_back() {
        let view = compute_view(&[category(1, "Tech", 0)], &[], CategoryFilter::Id(9), "");
        assert_eq!(view.title, ALL_BOOKMARKS);
        assert!(view.bookmarks.is_empty());
    }

    #[test]
    fn test_category_entries_prepends_all() {
        let categories = vec![
            category(1, "b", 1),
            category(2, "a", 1),
            category(3, "z", 0),
        ];

        let entries = category_entries(&categories);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![ALL_BOOKMARKS, "z", "a", "b"]);
        assert_eq!(entries[0].id, CategoryFilter::All);
        assert_eq!(entries[1].id, CategoryFilter::Id(3));
    }
}
