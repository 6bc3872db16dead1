use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::context::locator::{rules_for_file, CallableLocator};
use crate::context::CodeFileFetcher;
use crate::git::GitRepoFiles;

/// Locate a symbol definition and print it. Not-found is an expected
/// outcome, not an error: the consumer simply omits the context.
pub fn run(config: &Config, project: &str, symbol: &str, file: &str) -> Result<()> {
    let repo_files = GitRepoFiles::new(&config.git);
    let fetcher = CodeFileFetcher::new(
        &repo_files,
        project,
        config.context.on_demand_base_path.as_str(),
    );

    let rules = rules_for_file(file)?;
    let mut locator = CallableLocator::new(rules, fetcher)?;

    let definition = locator
        .find_definition(symbol, file)
        .with_context(|| format!("Failed searching definition of `{symbol}` in `{project}`"))?;

    match definition {
        Some(definition) => {
            info!("Definition of `{}` located", symbol);
            println!("{definition}");
        }
        None => {
            info!("Definition of `{}` not found", symbol);
            println!("Definition of `{symbol}` not found");
        }
    }
    Ok(())
}
