use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use reviewctx::cli::{Cli, Commands};
use reviewctx::config::Config;
use reviewctx::logging::init_logging;

fn main() -> Result<()> {
    let working_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Load configuration (if available, otherwise use defaults)
    let config = Config::load(&working_root).unwrap_or_default();

    // The guard must be held until program exit so pending logs are flushed
    let _logging_guard = init_logging(&config.logging, &working_root)?;

    tracing::debug!("reviewctx starting up");

    let cli = Cli::parse();

    match cli.command {
        Commands::ListFiles { project, pretty } => {
            reviewctx::commands::list_files::run(&config, &project, pretty)?;
        }
        Commands::FindDefinition {
            project,
            symbol,
            file,
        } => {
            reviewctx::commands::find_definition::run(&config, &project, &symbol, &file)?;
        }
    }

    Ok(())
}
