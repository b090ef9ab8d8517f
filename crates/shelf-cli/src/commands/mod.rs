//! Command handlers for the CLI

pub mod bookmark;
pub mod category;
pub mod config;
pub mod status;
pub mod tag;
pub mod transfer;
