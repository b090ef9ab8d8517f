//! Export and import format
//!
//! A single JSON object `{ "categories": [...], "bookmarks": [...] }`
//! holding every record with its original id.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{Bookmark, Category};
use crate::storage::StorageError;

/// Full contents of the database
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

impl ExportData {
    pub fn new(categories: Vec<Category>, bookmarks: Vec<Bookmark>) -> Self {
        Self {
            categories,
            bookmarks,
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| StorageError::Encode(e).into())
    }

    /// Order both collections by id (stable comparison of exports)
    pub fn sort_by_id(&mut self) {
        self.categories.sort_by_key(|c| c.id);
        self.bookmarks.sort_by_key(|b| b.id);
    }

    /// Drop bookmark references to categories that are not in this data
    pub fn normalized(mut self) -> Self {
        let known: HashSet<i64> = self.categories.iter().map(|c| c.id).collect();
        for bookmark in &mut self.bookmarks {
            if let Some(id) = bookmark.category_id {
                if !known.contains(&id) {
                    warn!(
                        "Bookmark {} references unknown category {}; importing as uncategorized",
                        bookmark.id, id
                    );
                    bookmark.category_id = None;
                }
            }
        }
        self
    }
}

/// Parse an export file
///
/// Missing `categories` or `bookmarks` keys count as empty lists.
pub fn parse_import(json: &str) -> Result<ExportData> {
    serde_json::from_str(json).map_err(|e| Error::MalformedImport(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_shape() {
        let json = r#"{
            "categories": [{"id": 1, "name": "Tech", "displayOrder": 0}],
            "bookmarks": [{
                "id": 4,
                "title": "Rust",
                "url": "https://rust-lang.org",
                "notes": "",
                "tags": ["lang"],
                "categoryId": 1,
                "displayOrder": 2
            }]
        }"#;

        let data = parse_import(json).unwrap();
        assert_eq!(data.categories[0].name, "Tech");
        assert_eq!(data.bookmarks[0].category_id, Some(1));
        assert_eq!(data.bookmarks[0].display_order, 2);
    }

    #[test]
    fn test_missing_keys_are_empty() {
        let data = parse_import("{}").unwrap();
        assert!(data.categories.is_empty());
        assert!(data.bookmarks.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_import("[1, 2"),
            Err(Error::MalformedImport(_))
        ));
        assert!(matches!(
            parse_import(r#"{"bookmarks": [{"id": 1}]}"#),
            Err(Error::MalformedImport(_))
        ));
    }

    #[test]
    fn test_normalized_drops_dangling_category() {
        let mut kept = Bookmark::new("A", "https://a.dev");
        kept.id = 1;
        kept.category_id = Some(1);
        let mut dangling = Bookmark::new("B", "https://b.dev");
        dangling.id = 2;
        dangling.category_id = Some(99);

        let data = ExportData::new(
            vec![Category {
                id: 1,
                name: "Tech".to_string(),
                display_order: 0,
            }],
            vec![kept, dangling],
        )
        .normalized();

        assert_eq!(data.bookmarks[0].category_id, Some(1));
        assert_eq!(data.bookmarks[1].category_id, None);
    }

    #[test]
    fn test_to_json_uses_camel_case() {
        let mut bookmark = Bookmark::new("A", "https://a.dev");
        bookmark.category_id = Some(3);
        let json = ExportData::new(Vec::new(), vec![bookmark]).to_json().unwrap();
        assert!(json.contains("\"categoryId\": 3"));
        assert!(json.contains("\"displayOrder\""));
    }
}
