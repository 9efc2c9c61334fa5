//! Docket - a self-hosted to-do list served as a single web page.
//!
//! This library provides the core functionality for the `dk` CLI tool:
//! SQLite-backed task storage, the web server, and the page view model
//! that every task action re-renders from scratch.

pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod storage;
pub mod web;


/// Library-level error type for Docket operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not initialized: run `dk init` first")]
    NotInitialized,

    #[error("Task not found: {0}")]
    NotFound(i64),

    #[error(transparent)]
    Validation(#[from] models::ValidationErrors),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Docket operations.
pub type Result<T> = std::result::Result<T, Error>;
