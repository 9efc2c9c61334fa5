//! Data models for Docket.
//!
//! This module defines the core data structures:
//! - `Task` - the persisted to-do item
//! - `TaskInput` / `TaskChanges` - transport-layer inputs for create/update
//! - `ValidationErrors` - field-level validation failures
//!
//! Input normalization (trimming, collapsing blank descriptions) and title
//! validation live here so the storage layer and the web handlers share
//! one rule set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum title length in characters (not bytes).
pub const MAX_TITLE_LEN: usize = 255;

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the database and never reused
    pub id: i64,

    /// Task title, non-empty and at most [`MAX_TITLE_LEN`] characters
    pub title: String,

    /// Detailed description; serialized as `null` when absent
    pub description: Option<String>,

    /// Completion flag, false for newly created tasks
    pub completed: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TaskInput {
    /// Trim the title and description; a blank description collapses to None.
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: normalize_description(self.description.as_deref()),
        }
    }

    /// Validate the (already normalized) input.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        validate_title(&self.title)
    }
}

/// Input for updating a task.
///
/// `completed` is a typed boolean, so a request carrying anything else is
/// rejected at deserialization time, before any storage call.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskChanges {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
}

impl TaskChanges {
    /// Trim the title and description; a blank description collapses to None.
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: normalize_description(self.description.as_deref()),
            completed: self.completed,
        }
    }

    /// Validate the (already normalized) input.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        validate_title(&self.title)
    }
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Validation failures with field-level messages.
///
/// Raised before any write reaches the database; a request that produces
/// one has no side effect on persisted state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert to Result, failing if any error was recorded.
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Messages grouped by field, for the 422 response body.
    pub fn field_messages(&self) -> BTreeMap<&'static str, Vec<&str>> {
        let mut map: BTreeMap<&'static str, Vec<&str>> = BTreeMap::new();
        for error in &self.errors {
            map.entry(error.field).or_default().push(&error.message);
        }
        map
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "validation failed: {}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a title against the persisted-title invariants.
pub fn validate_title(title: &str) -> std::result::Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if title.trim().is_empty() {
        errors.add("title", "title must not be empty");
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.add(
            "title",
            format!("title must be at most {} characters", MAX_TITLE_LEN),
        );
    }

    errors.into_result()
}
