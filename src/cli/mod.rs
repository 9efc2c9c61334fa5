//! CLI argument definitions for Docket.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Version string with build metadata injected by build.rs.
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("DK_GIT_COMMIT"),
    ", built ",
    env!("DK_BUILD_TIMESTAMP"),
    ")"
);

/// Docket - a self-hosted to-do list served as a single web page.
///
/// Run `dk init` once, then `dk serve` and open the printed address.
#[derive(Parser, Debug)]
#[command(name = "dk")]
#[command(author, version = VERSION, about = "A self-hosted to-do list served as a single web page", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Directory holding the task database.
    /// Can also be set via the DK_DATA_DIR environment variable.
    #[arg(long = "data-dir", global = true, env = "DK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the task database
    Init,

    /// Insert sample tasks into an initialized database
    Seed,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host address to bind to
        #[arg(long)]
        host: Option<String>,
    },
}
