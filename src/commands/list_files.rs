use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::info;

use crate::config::Config;
use crate::git::{Chunk, FileChunkBuilder, GitRepoFiles};

/// List a repository's filtered files as size-bounded chunks, one JSON
/// object (path -> content) per chunk on stdout.
pub fn run(config: &Config, project: &str, pretty: bool) -> Result<()> {
    let repo_files = GitRepoFiles::new(&config.git);
    let builder = FileChunkBuilder::new(config.context.max_chunk_bytes);

    let chunks = repo_files
        .list_chunked(project, builder)
        .with_context(|| format!("Failed to list files for project `{project}`"))?;
    info!("Assembled {} chunks for project {}", chunks.len(), project);

    for chunk in &chunks {
        println!("{}", chunk_json(chunk, pretty)?);
    }
    Ok(())
}

fn chunk_json(chunk: &Chunk, pretty: bool) -> Result<String> {
    let object: Map<String, Value> = chunk
        .entries
        .iter()
        .map(|entry| (entry.path.clone(), Value::String(entry.content.clone())))
        .collect();

    let json = if pretty {
        serde_json::to_string_pretty(&object)?
    } else {
        serde_json::to_string(&object)?
    };
    Ok(json)
}
