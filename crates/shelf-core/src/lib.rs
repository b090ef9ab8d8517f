//! Shelf Core Library
//!
//! This crate provides the core functionality for Shelf, a local,
//! single-user bookmark manager: categories, bookmarks, search, manual
//! ordering, and JSON export/import.
//!
//! # Architecture
//!
//! - **SQLite**: two collections (`categories`, `bookmarks`) keyed by
//!   integer ids, accessed through the async `Database` gateway
//! - **Store**: one session object holding the last-fetched snapshot,
//!   refreshed after every mutation
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open(&Config::load()?).await?;
//!
//! let tech = store.create_category("Tech").await?;
//! store.create_bookmark(
//!     BookmarkDraft::new("Rust", "https://rust-lang.org").category(Some(tech.id)),
//! ).await?;
//!
//! let view = store.compute_view(CategoryFilter::All, "rust");
//! ```
//!
//! # Modules
//!
//! - `store`: session and all operations (main entry point)
//! - `models`: categories, bookmarks, filters
//! - `query`: pure filtering and ordering
//! - `transfer`: export/import format
//! - `storage`: SQLite gateway
//! - `config`: application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod storage;
pub mod store;
pub mod transfer;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{
    parse_tags, Bookmark, BookmarkDraft, Category, CategoryEntry, CategoryFilter, ALL_BOOKMARKS,
};
pub use query::View;
pub use storage::{Collection, Database, DatabaseStats, ImportSummary, StorageError};
pub use store::{RenderModel, Store};
pub use transfer::ExportData;
