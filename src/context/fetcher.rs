//! Per-session file content cache in front of the repository.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::git::{GitRepoFiles, Result};

/// Serves file content with cache-first semantics for one locate session.
///
/// The cache lifetime equals the fetcher instance's lifetime; the only
/// eviction is the full replacement performed by [`preload_directory`].
///
/// [`preload_directory`]: CodeFileFetcher::preload_directory
#[derive(Debug)]
pub struct CodeFileFetcher<'a> {
    repo_files: &'a GitRepoFiles,
    project: String,
    base_path: String,
    preloaded: HashMap<String, String>,
}

impl<'a> CodeFileFetcher<'a> {
    /// `base_path` is the on-demand prefix stripped from lookups that miss
    /// the cache; empty disables stripping.
    pub fn new(
        repo_files: &'a GitRepoFiles,
        project: impl Into<String>,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            repo_files,
            project: project.into(),
            base_path: base_path.into(),
            preloaded: HashMap::new(),
        }
    }

    /// Replace the entire cache with one directory's `(path, content)` pairs
    /// and return the resulting path set. This is a full overwrite, not a
    /// merge.
    pub fn preload_directory(&mut self, directory: &str) -> Result<BTreeSet<String>> {
        debug!("Preloading files from directory `{}`", directory);
        let listing = self.repo_files.list_files(&self.project, Some(directory))?;

        self.preloaded = listing
            .into_iter()
            .filter(|(dir, _)| dir == directory)
            .flat_map(|(_, entries)| entries)
            .map(|entry| (entry.path, entry.content))
            .collect();

        Ok(self.preloaded.keys().cloned().collect())
    }

    /// Return a file's content, preferring the cache. Cache hits are served
    /// verbatim; misses strip one leading `<base_path>/` occurrence before
    /// delegating to the repository.
    pub fn file_content(&self, path: &str) -> Result<String> {
        if let Some(content) = self.preloaded.get(path) {
            debug!("Cache hit for file `{}`", path);
            return Ok(content.clone());
        }
        self.repo_files
            .read_file(&self.project, self.strip_base_path(path))
    }

    fn strip_base_path<'p>(&self, path: &'p str) -> &'p str {
        if self.base_path.is_empty() {
            return path;
        }
        path.strip_prefix(self.base_path.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    }
}
