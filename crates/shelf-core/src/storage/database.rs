//! Storage gateway
//!
//! Owns the SQLite connection and exposes async CRUD primitives over the
//! two collections. SQLite calls are blocking, so each one runs on
//! `tokio::task::spawn_blocking`; the caller suspends until it has been
//! committed, which gives read-after-write within a logical operation.
//!
//! Single-record writes are atomic. Operations that touch several records
//! (category cascade, reorder, import) each run in one transaction.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::{Bookmark, Category};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::records::{Collection, Record};
use crate::storage::schema::{get_schema_version, init_schema, needs_init};

/// Outcome of a bulk replace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub categories: usize,
    pub bookmarks: usize,
    /// Records rejected by a uniqueness constraint
    pub skipped: usize,
}

/// Size and record counts, for status output
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatabaseStats {
    pub path: Option<PathBuf>,
    pub size_bytes: u64,
    pub schema_version: Option<i32>,
    pub categories: i64,
    pub bookmarks: i64,
}

impl DatabaseStats {
    /// Format the database size for display
    pub fn size_human(&self) -> String {
        format_bytes(self.size_bytes)
    }
}

/// Handle to the local bookmark database
///
/// Cloning is cheap; clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open or create the database at `path`
    ///
    /// Idempotent: the schema is only (re)initialized when it is missing or
    /// older than `SCHEMA_VERSION`.
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let open_path = path.clone();
        let conn = tokio::task::spawn_blocking(move || open_connection(&open_path))
            .await
            .map_err(|e| StorageError::Worker(e.to_string()))??;

        info!("Opened bookmark database at {:?}", path);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let path = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory().map_err(|source| StorageError::Unavailable {
            path: path.clone(),
            source,
        })?;
        prepare_connection(&conn, &path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// Path of the database file (`None` when in memory)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run a blocking closure against the connection
    async fn call<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Connection) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StorageError::Worker("connection lock poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StorageError::Worker(e.to_string()))?
    }

    // ==================== CRUD Primitives ====================

    /// Insert a new record, returning its assigned id
    pub async fn add<R: Record>(&self, item: &R) -> StorageResult<i64> {
        let item = item.clone();
        let id = self
            .call(move |conn| {
                let tx = conn.transaction()?;
                let id = R::insert(&tx, &item)?;
                tx.commit()?;
                Ok(id)
            })
            .await?;
        debug!("Added {} record {}", R::COLLECTION, id);
        Ok(id)
    }

    /// Every record in the collection, unordered
    pub async fn get_all<R: Record>(&self) -> StorageResult<Vec<R>> {
        self.call(|conn| Ok(R::load_all(conn)?)).await
    }

    /// Look up one record by id
    pub async fn get<R: Record>(&self, id: i64) -> StorageResult<Option<R>> {
        self.call(move |conn| Ok(R::load(conn, id)?)).await
    }

    /// Insert or replace the record with the item's id
    pub async fn upsert<R: Record>(&self, item: &R) -> StorageResult<()> {
        let item = item.clone();
        let id = item.id();
        self.call(move |conn| {
            let tx = conn.transaction()?;
            R::upsert(&tx, &item)?;
            tx.commit()?;
            Ok(())
        })
        .await?;
        debug!("Upserted {} record {}", R::COLLECTION, id);
        Ok(())
    }

    /// Delete a record; absent ids are not an error
    pub async fn remove(&self, collection: Collection, id: i64) -> StorageResult<()> {
        let removed = self
            .call(move |conn| {
                let sql = format!("DELETE FROM {} WHERE id = ?", collection.name());
                Ok(conn.execute(&sql, params![id])?)
            })
            .await?;
        debug!("Removed {} record {} ({} row(s))", collection, id, removed);
        Ok(())
    }

    /// Empty a collection
    pub async fn clear(&self, collection: Collection) -> StorageResult<()> {
        self.call(move |conn| {
            conn.execute(&format!("DELETE FROM {}", collection.name()), [])?;
            Ok(())
        })
        .await?;
        debug!("Cleared {}", collection);
        Ok(())
    }

    /// Number of records in a collection
    pub async fn count(&self, collection: Collection) -> StorageResult<i64> {
        self.call(move |conn| {
            let sql = format!("SELECT COUNT(*) FROM {}", collection.name());
            Ok(conn.query_row(&sql, [], |row| row.get(0))?)
        })
        .await
    }

    // ==================== Multi-Record Operations ====================

    /// Delete a category and detach its bookmarks in one transaction
    ///
    /// Returns the number of bookmarks that became uncategorized.
    pub async fn remove_category_cascade(&self, id: i64) -> StorageResult<usize> {
        let detached = self
            .call(move |conn| {
                let tx = conn.transaction()?;
                let detached = tx.execute(
                    "UPDATE bookmarks SET category_id = NULL WHERE category_id = ?",
                    params![id],
                )?;
                tx.execute("DELETE FROM categories WHERE id = ?", params![id])?;
                tx.commit()?;
                Ok(detached)
            })
            .await?;
        debug!("Removed category {}, detached {} bookmark(s)", id, detached);
        Ok(detached)
    }

    /// Write new display orders for `(id, order)` pairs in one transaction
    ///
    /// Returns the number of rows updated.
    pub async fn set_display_orders(
        &self,
        collection: Collection,
        orders: Vec<(i64, i64)>,
    ) -> StorageResult<usize> {
        if orders.is_empty() {
            return Ok(0);
        }

        self.call(move |conn| {
            let tx = conn.transaction()?;
            let mut updated = 0;
            {
                let sql = format!(
                    "UPDATE {} SET display_order = ? WHERE id = ?",
                    collection.name()
                );
                let mut stmt = tx.prepare(&sql)?;
                for (id, order) in &orders {
                    updated += stmt.execute(params![order, id])?;
                }
            }
            tx.commit()?;
            Ok(updated)
        })
        .await
    }

    /// Clear both collections, then upsert every given record
    ///
    /// Runs as one transaction. A category whose name repeats an earlier
    /// one ignoring case, or any record rejected by a uniqueness
    /// constraint, is skipped; any other failure rolls everything back.
    /// Bookmarks whose category was not stored become uncategorized.
    pub async fn replace_all(
        &self,
        categories: Vec<Category>,
        bookmarks: Vec<Bookmark>,
    ) -> StorageResult<ImportSummary> {
        self.call(move |conn| {
            let mut tx = conn.transaction()?;
            tx.execute("DELETE FROM bookmarks", [])?;
            tx.execute("DELETE FROM categories", [])?;

            let mut summary = ImportSummary::default();
            let mut stored_ids = HashSet::new();
            let mut stored_names = HashSet::new();
            for category in &categories {
                // NOCASE only folds ASCII, so compare the full lowercase form
                let lowered = category.name.to_lowercase();
                if stored_names.contains(&lowered) {
                    warn!(
                        "Skipping category {} on import: name '{}' already taken",
                        category.id, category.name
                    );
                    summary.skipped += 1;
                    continue;
                }
                if upsert_or_skip(&mut tx, category)? {
                    stored_ids.insert(category.id);
                    stored_names.insert(lowered);
                    summary.categories += 1;
                } else {
                    summary.skipped += 1;
                }
            }

            for bookmark in bookmarks {
                let bookmark = match bookmark.category_id {
                    Some(id) if !stored_ids.contains(&id) => {
                        debug!(
                            "Bookmark {} referenced missing category {}, uncategorizing",
                            bookmark.id, id
                        );
                        Bookmark {
                            category_id: None,
                            ..bookmark
                        }
                    }
                    _ => bookmark,
                };
                if upsert_or_skip(&mut tx, &bookmark)? {
                    summary.bookmarks += 1;
                } else {
                    summary.skipped += 1;
                }
            }

            tx.commit()?;
            Ok(summary)
        })
        .await
    }

    // ==================== Lookups ====================

    /// Distinct tags with the number of bookmarks carrying each
    pub async fn tag_counts(&self) -> StorageResult<Vec<(String, i64)>> {
        self.call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT tag, COUNT(*) FROM bookmark_tags GROUP BY tag ORDER BY tag",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    /// Size and counts for status reporting
    pub async fn stats(&self) -> StorageResult<DatabaseStats> {
        let schema_version = self
            .call(|conn| Ok(get_schema_version(conn)?))
            .await?;
        let categories = self.count(Collection::Categories).await?;
        let bookmarks = self.count(Collection::Bookmarks).await?;
        let size_bytes = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(DatabaseStats {
            path: self.path.clone(),
            size_bytes,
            schema_version,
            categories,
            bookmarks,
        })
    }
}

/// Upsert inside a savepoint; `Ok(false)` when a constraint rejected it
fn upsert_or_skip<R: Record>(tx: &mut rusqlite::Transaction<'_>, item: &R) -> StorageResult<bool> {
    let sp = tx.savepoint()?;
    match R::upsert(&sp, item).map_err(StorageError::from) {
        Ok(()) => {
            sp.commit()?;
            Ok(true)
        }
        Err(StorageError::Constraint(reason)) => {
            warn!(
                "Skipping {} record {} on import: {}",
                R::COLLECTION,
                item.id(),
                reason
            );
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Create the parent directory, open the file and initialize the schema
fn open_connection(path: &Path) -> StorageResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
        }
    }

    let conn = Connection::open(path).map_err(|source| StorageError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    prepare_connection(&conn, path)?;
    Ok(conn)
}

fn prepare_connection(conn: &Connection, path: &Path) -> StorageResult<()> {
    let unavailable = |source| StorageError::Unavailable {
        path: path.to_path_buf(),
        source,
    };

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(unavailable)?;

    if needs_init(conn) {
        info!("Initializing bookmark schema at {:?}", path);
        init_schema(conn).map_err(unavailable)?;
    }
    Ok(())
}

/// Format bytes as human-readable string
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
