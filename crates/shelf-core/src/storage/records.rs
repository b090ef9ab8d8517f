//! Row mapping for the two collections
//!
//! `Record` ties a model type to its table so the gateway can offer one
//! set of typed CRUD primitives for both categories and bookmarks.

use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use crate::models::{Bookmark, Category};

/// A named collection of records in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Categories,
    Bookmarks,
}

impl Collection {
    /// Collection name, also the backing table name
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Bookmarks => "bookmarks",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A model type persisted in one collection
pub trait Record: Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> i64;

    /// Every record, in storage order
    fn load_all(conn: &Connection) -> Result<Vec<Self>>;

    fn load(conn: &Connection, id: i64) -> Result<Option<Self>>;

    /// Insert with a freshly assigned id, ignoring `self.id`
    fn insert(conn: &Connection, item: &Self) -> Result<i64>;

    /// Insert or replace the record stored under `item.id()`
    fn upsert(conn: &Connection, item: &Self) -> Result<()>;
}

impl Record for Category {
    const COLLECTION: Collection = Collection::Categories;

    fn id(&self) -> i64 {
        self.id
    }

    fn load_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT id, name, display_order FROM categories")?;
        let rows = stmt.query_map([], category_from_row)?;
        rows.collect()
    }

    fn load(conn: &Connection, id: i64) -> Result<Option<Self>> {
        conn.query_row(
            "SELECT id, name, display_order FROM categories WHERE id = ?",
            params![id],
            category_from_row,
        )
        .optional()
    }

    fn insert(conn: &Connection, item: &Self) -> Result<i64> {
        conn.execute(
            "INSERT INTO categories (name, display_order) VALUES (?, ?)",
            params![item.name, item.display_order],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn upsert(conn: &Connection, item: &Self) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO categories (id, name, display_order) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                display_order = excluded.display_order
            "#,
            params![item.id, item.name, item.display_order],
        )?;
        Ok(())
    }
}

impl Record for Bookmark {
    const COLLECTION: Collection = Collection::Bookmarks;

    fn id(&self) -> i64 {
        self.id
    }

    fn load_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut tags = load_all_tags(conn)?;

        let mut stmt = conn.prepare(
            "SELECT id, title, url, notes, category_id, display_order FROM bookmarks",
        )?;
        let rows = stmt.query_map([], bookmark_from_row)?;

        let mut bookmarks = Vec::new();
        for row in rows {
            let mut bookmark = row?;
            bookmark.tags = tags.remove(&bookmark.id).unwrap_or_default();
            bookmarks.push(bookmark);
        }
        Ok(bookmarks)
    }

    fn load(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let bookmark = conn
            .query_row(
                "SELECT id, title, url, notes, category_id, display_order FROM bookmarks WHERE id = ?",
                params![id],
                bookmark_from_row,
            )
            .optional()?;

        match bookmark {
            Some(mut bookmark) => {
                bookmark.tags = load_tags(conn, id)?;
                Ok(Some(bookmark))
            }
            None => Ok(None),
        }
    }

    fn insert(conn: &Connection, item: &Self) -> Result<i64> {
        conn.execute(
            r#"
            INSERT INTO bookmarks (title, url, notes, category_id, display_order)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                item.title,
                item.url,
                item.notes,
                item.category_id,
                item.display_order
            ],
        )?;
        let id = conn.last_insert_rowid();
        write_tags(conn, id, &item.tags)?;
        Ok(id)
    }

    fn upsert(conn: &Connection, item: &Self) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO bookmarks (id, title, url, notes, category_id, display_order)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                url = excluded.url,
                notes = excluded.notes,
                category_id = excluded.category_id,
                display_order = excluded.display_order
            "#,
            params![
                item.id,
                item.title,
                item.url,
                item.notes,
                item.category_id,
                item.display_order
            ],
        )?;
        write_tags(conn, item.id, &item.tags)
    }
}

fn category_from_row(row: &Row<'_>) -> Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        display_order: row.get(2)?,
    })
}

fn bookmark_from_row(row: &Row<'_>) -> Result<Bookmark> {
    Ok(Bookmark {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        notes: row.get(3)?,
        tags: Vec::new(),
        category_id: row.get(4)?,
        display_order: row.get(5)?,
    })
}

/// Replace the tag rows of one bookmark
fn write_tags(conn: &Connection, bookmark_id: i64, tags: &[String]) -> Result<()> {
    conn.execute(
        "DELETE FROM bookmark_tags WHERE bookmark_id = ?",
        params![bookmark_id],
    )?;

    let mut stmt =
        conn.prepare("INSERT INTO bookmark_tags (bookmark_id, position, tag) VALUES (?, ?, ?)")?;
    for (position, tag) in tags.iter().enumerate() {
        stmt.execute(params![bookmark_id, position as i64, tag])?;
    }
    Ok(())
}

fn load_tags(conn: &Connection, bookmark_id: i64) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT tag FROM bookmark_tags WHERE bookmark_id = ? ORDER BY position")?;
    let rows = stmt.query_map(params![bookmark_id], |row| row.get(0))?;
    rows.collect()
}

fn load_all_tags(conn: &Connection) -> Result<HashMap<i64, Vec<String>>> {
    let mut stmt =
        conn.prepare("SELECT bookmark_id, tag FROM bookmark_tags ORDER BY bookmark_id, position")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;

    let mut tags: HashMap<i64, Vec<String>> = HashMap::new();
    for row in rows {
        let (id, tag) = row?;
        tags.entry(id).or_default().push(tag);
    }
    Ok(tags)
}
