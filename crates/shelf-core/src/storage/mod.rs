//! Storage layer
//!
//! Local SQLite database with two collections, `categories` and
//! `bookmarks`, each keyed by an auto-assigned integer id.
//!
//! ## Layout
//!
//! - `schema`: versioned table and index creation
//! - `records`: row mapping for each collection (`Record`)
//! - `database`: the async gateway (`Database`)
//! - `error`: typed storage errors

pub mod database;
pub mod error;
pub mod records;
pub mod schema;

pub use database::{Database, DatabaseStats, ImportSummary};
pub use error::{StorageError, StorageResult};
pub use records::{Collection, Record};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
