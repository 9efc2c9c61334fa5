//! Command implementations for the dk CLI.
//!
//! Each command returns a result struct implementing [`Output`], so main
//! can print it as JSON (default) or human-readable text (`-H`).

use crate::config::ResolvedServer;
use crate::models::{TaskChanges, TaskInput};
use crate::storage::Storage;
use crate::Result;
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Result of `dk init`.
#[derive(Debug, Serialize)]
pub struct InitResult {
    pub initialized: bool,
    pub path: String,
}

impl Output for InitResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.initialized {
            format!("Initialized task database at {}", self.path)
        } else {
            format!("Task database already exists at {}", self.path)
        }
    }
}

/// Initialize the task database in the given data directory.
pub fn init(data_dir: &Path) -> Result<InitResult> {
    let path = data_dir.display().to_string();

    if Storage::exists(data_dir) {
        return Ok(InitResult {
            initialized: false,
            path,
        });
    }

    Storage::init(data_dir)?;
    Ok(InitResult {
        initialized: true,
        path,
    })
}

/// Result of `dk seed`.
#[derive(Debug, Serialize)]
pub struct SeedResult {
    pub created: usize,
}

impl Output for SeedResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        format!("Seeded {} sample tasks", self.created)
    }
}

/// Sample tasks: title, description, completion flag.
const SAMPLE_TASKS: [(&str, Option<&str>, bool); 4] = [
    (
        "Set up the task board",
        Some("Initialize the database and open the web page for the first time"),
        true,
    ),
    (
        "Plan this week's errands",
        Some("Collect everything scattered across sticky notes into one list"),
        false,
    ),
    (
        "Write the project notes",
        Some("Summarize the decisions from the kickoff meeting"),
        false,
    ),
    ("Clear the inbox", None, false),
];

/// Insert sample tasks so a fresh install renders a populated page.
pub fn seed(data_dir: &Path) -> Result<SeedResult> {
    let mut storage = Storage::open(data_dir)?;

    for (title, description, completed) in SAMPLE_TASKS {
        let task = storage.create_task(&TaskInput {
            title: title.to_string(),
            description: description.map(str::to_string),
        })?;

        if completed {
            storage.update_task(
                task.id,
                &TaskChanges {
                    title: task.title,
                    description: task.description,
                    completed: true,
                },
            )?;
        }
    }

    Ok(SeedResult {
        created: SAMPLE_TASKS.len(),
    })
}

/// Run the web server until ctrl-c.
pub fn serve(data_dir: &Path, server: &ResolvedServer) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(crate::web::start_server(data_dir, &server.host, server.port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_init_then_reinit() {
        let env = TestEnv::new();

        let first = init(env.data_path()).unwrap();
        assert!(first.initialized);

        let second = init(env.data_path()).unwrap();
        assert!(!second.initialized);
    }

    #[test]
    fn test_seed_requires_init() {
        let env = TestEnv::new();
        assert!(matches!(
            seed(env.data_path()),
            Err(crate::Error::NotInitialized)
        ));
    }

    #[test]
    fn test_seed_populates_both_partitions() {
        let env = TestEnv::new();
        env.init_storage();

        let result = seed(env.data_path()).unwrap();
        assert_eq!(result.created, 4);

        let tasks = env.open_storage().list_tasks().unwrap();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks.iter().filter(|t| t.completed).count(), 1);
        assert!(tasks.iter().any(|t| t.description.is_none()));
    }

    #[test]
    fn test_output_formats() {
        let result = InitResult {
            initialized: true,
            path: "/tmp/docket".to_string(),
        };
        assert!(result.to_json().contains("\"initialized\":true"));
        assert!(result.to_human().contains("Initialized task database"));
    }
}
