//! Configuration for the dk CLI.
//!
//! An optional TOML file holds user preferences:
//!
//! Located at `~/.config/docket/config.toml` (platform equivalent):
//!
//! ```toml
//! data-dir = "/srv/docket"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! ```
//!
//! Precedence per value: CLI flag > environment variable > config file >
//! built-in default. The `--data-dir` flag reads `DK_DATA_DIR` itself (via
//! clap), so resolution here only has to consider flag, file, default.

use crate::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default bind address for `dk serve`.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default port for `dk serve`.
pub const DEFAULT_PORT: u16 = 4617;

/// User preferences read from config.toml.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DocketConfig {
    /// Directory holding the task database
    pub data_dir: Option<PathBuf>,

    /// Web server settings
    #[serde(default)]
    pub server: ServerSection,
}

/// `[server]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl DocketConfig {
    /// Load the config file from the user config directory, or defaults
    /// when no file exists.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load a config file from an explicit path; a missing file yields
    /// defaults, a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| Error::Other(format!("Invalid config {}: {}", path.display(), e)))
    }
}

/// Server settings after merging flags, config file, and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedServer {
    pub host: String,
    pub port: u16,
}

/// Resolve server settings: flag > config file > default.
pub fn resolve_server(
    flag_host: Option<String>,
    flag_port: Option<u16>,
    config: &DocketConfig,
) -> ResolvedServer {
    ResolvedServer {
        host: flag_host
            .or_else(|| config.server.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: flag_port.or(config.server.port).unwrap_or(DEFAULT_PORT),
    }
}

/// Resolve the data directory: flag (or DK_DATA_DIR) > config file >
/// platform data dir.
pub fn resolve_data_dir(flag: Option<PathBuf>, config: &DocketConfig) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = &config.data_dir {
        return Ok(path.clone());
    }
    crate::storage::default_data_dir()
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docket").join("config.toml"))
}
