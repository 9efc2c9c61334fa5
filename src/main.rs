//! Docket CLI - a self-hosted to-do list served as a single web page.

use clap::Parser;
use docket::cli::{Cli, Commands};
use docket::commands::{self, Output};
use docket::config::{self, DocketConfig};
use std::process;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    if let Err(e) = run(cli) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!(r#"{{"error": "{}"}}"#, e);
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> docket::Result<()> {
    let human = cli.human_readable;

    let config = DocketConfig::load()?;
    let data_dir = config::resolve_data_dir(cli.data_dir, &config)?;

    match cli.command {
        Commands::Init => {
            let result = commands::init(&data_dir)?;
            output(&result, human);
        }
        Commands::Seed => {
            let result = commands::seed(&data_dir)?;
            output(&result, human);
        }
        Commands::Serve { port, host } => {
            let server = config::resolve_server(host, port, &config);
            commands::serve(&data_dir, &server)?;
        }
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
