//! Data models for Shelf
//!
//! Defines the persisted records (Category, Bookmark), the category
//! selector used by views, and the raw input accepted by the bookmark store.
//! Field names serialize in camelCase, which is also the export format.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Display name of the synthetic "all" category
pub const ALL_BOOKMARKS: &str = "All Bookmarks";

/// A named grouping bucket for bookmarks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier, assigned by storage
    pub id: i64,
    /// Unique (case-insensitively) display name
    pub name: String,
    /// Manual sort key
    #[serde(default)]
    pub display_order: i64,
}

impl Category {
    /// Create an unsaved category; `id` is assigned on insert
    pub fn new(name: impl Into<String>, display_order: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            display_order,
        }
    }
}

/// A saved bookmark
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Unique identifier, assigned by storage
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub notes: String,
    /// Ordered, without duplicates
    #[serde(default)]
    pub tags: Vec<String>,
    /// `None` means uncategorized
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Manual sort key
    #[serde(default)]
    pub display_order: i64,
}

impl Bookmark {
    /// Create an unsaved bookmark; `id` is assigned on insert
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            url: url.into(),
            notes: String::new(),
            tags: Vec::new(),
            category_id: None,
            display_order: 0,
        }
    }

    /// Case-insensitive substring match over title, url, notes and tags
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.url.to_lowercase().contains(needle)
            || self.notes.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}

/// Which bookmarks a view shows: everything, or one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Id(i64),
}

impl CategoryFilter {
    /// Whether a bookmark with this category reference is visible
    pub fn admits(&self, category_id: Option<i64>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Id(id) => category_id == Some(*id),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Id(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<i64>()
            .map(CategoryFilter::Id)
            .map_err(|_| format!("expected 'all' or a category id, got '{}'", s))
    }
}

impl From<i64> for CategoryFilter {
    fn from(id: i64) -> Self {
        CategoryFilter::Id(id)
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CategoryFilter::All => serializer.serialize_str("all"),
            CategoryFilter::Id(id) => serializer.serialize_i64(*id),
        }
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Id(i64),
            Key(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Id(id) => Ok(CategoryFilter::Id(id)),
            Repr::Key(key) => key.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// One row of the category sidebar, including the synthetic "all" entry
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    pub id: CategoryFilter,
    pub name: String,
    /// Absent for the synthetic entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
}

impl CategoryEntry {
    /// The never-persisted "all" entry
    pub fn all() -> Self {
        Self {
            id: CategoryFilter::All,
            name: ALL_BOOKMARKS.to_string(),
            display_order: None,
        }
    }
}

impl From<&Category> for CategoryEntry {
    fn from(category: &Category) -> Self {
        Self {
            id: CategoryFilter::Id(category.id),
            name: category.name.clone(),
            display_order: Some(category.display_order),
        }
    }
}

/// Raw bookmark fields as entered by the user
///
/// `tags` is the comma-separated form; validation and normalization happen
/// in the bookmark store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkDraft {
    pub title: String,
    pub url: String,
    pub notes: String,
    pub tags: String,
    pub category_id: Option<i64>,
}

impl BookmarkDraft {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Prefill a draft from an existing bookmark (for editing)
    pub fn from_bookmark(bookmark: &Bookmark) -> Self {
        Self {
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            notes: bookmark.notes.clone(),
            tags: bookmark.tags.join(", "),
            category_id: bookmark.category_id,
        }
    }
}

/// Parse a comma-separated tag list
///
/// Tags are trimmed, empty entries dropped, and only the first occurrence
/// of a repeated tag is kept.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" rust, web ,, rust,cli "), vec!["rust", "web", "cli"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_parse_tags_is_case_sensitive() {
        assert_eq!(parse_tags("Rust,rust"), vec!["Rust", "rust"]);
    }

    #[test]
    fn test_bookmark_matches() {
        let mut bookmark = Bookmark::new("Rust Book", "https://doc.rust-lang.org/book");
        bookmark.notes = "Read chapter 10".to_string();
        bookmark.tags = vec!["Learning".to_string()];

        assert!(bookmark.matches("rust"));
        assert!(bookmark.matches("doc.rust"));
        assert!(bookmark.matches("chapter"));
        assert!(bookmark.matches("earn"));
        assert!(!bookmark.matches("python"));
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!("ALL".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!("42".parse::<CategoryFilter>(), Ok(CategoryFilter::Id(42)));
        assert!("tech".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_category_filter_admits() {
        assert!(CategoryFilter::All.admits(None));
        assert!(CategoryFilter::All.admits(Some(3)));
        assert!(CategoryFilter::Id(3).admits(Some(3)));
        assert!(!CategoryFilter::Id(3).admits(Some(4)));
        assert!(!CategoryFilter::Id(3).admits(None));
    }

    #[test]
    fn test_category_filter_json() {
        assert_eq!(serde_json::to_string(&CategoryFilter::All).unwrap(), "\"all\"");
        assert_eq!(serde_json::to_string(&CategoryFilter::Id(7)).unwrap(), "7");

        let all: CategoryFilter = serde_json::from_str("\"all\"").unwrap();
        let id: CategoryFilter = serde_json::from_str("7").unwrap();
        assert_eq!(all, CategoryFilter::All);
        assert_eq!(id, CategoryFilter::Id(7));
    }

    #[test]
    fn test_bookmark_json_field_names() {
        let mut bookmark = Bookmark::new("Example", "https://example.com");
        bookmark.category_id = Some(2);
        bookmark.display_order = 5;

        let json = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(json["categoryId"], 2);
        assert_eq!(json["displayOrder"], 5);
    }

    #[test]
    fn test_bookmark_json_optional_fields_default() {
        let bookmark: Bookmark =
            serde_json::from_str(r#"{"id": 3, "title": "T", "url": "https://t.dev"}"#).unwrap();
        assert_eq!(bookmark.notes, "");
        assert!(bookmark.tags.is_empty());
        assert_eq!(bookmark.category_id, None);
        assert_eq!(bookmark.display_order, 0);
    }

    #[test]
    fn test_draft_from_bookmark() {
        let mut bookmark = Bookmark::new("Example", "https://example.com");
        bookmark.tags = vec!["a".to_string(), "b".to_string()];
        bookmark.category_id = Some(1);

        let draft = BookmarkDraft::from_bookmark(&bookmark);
        assert_eq!(draft.tags, "a, b");
        assert_eq!(parse_tags(&draft.tags), bookmark.tags);
        assert_eq!(draft.category_id, Some(1));
    }

    #[test]
    fn test_all_entry() {
        let entry = CategoryEntry::all();
        assert_eq!(entry.id, CategoryFilter::All);
        assert_eq!(entry.name, ALL_BOOKMARKS);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "all");
        assert!(json.get("displayOrder").is_none());
    }
}
