//! Read-only access to bare repositories at the default branch tip.

use std::path::{Path, PathBuf};

use git2::{ErrorCode, ObjectType, Repository, Tree, TreeWalkMode, TreeWalkResult};
use serde::Serialize;
use tracing::debug;

use crate::config::GitConfig;

use super::chunks::{Chunk, FileChunkBuilder};
use super::error::{GitError, Result};

/// Immutable snapshot of one blob at the resolved tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
    pub size: u64,
}

/// Lists and reads files from a bare repository located by the
/// `<git_root>/<project>.git` convention. All reads resolve against the tip
/// of the repository's default branch; no other ref is consulted.
#[derive(Debug)]
pub struct GitRepoFiles {
    git_root: PathBuf,
    enabled_file_extensions: Vec<String>,
}

impl GitRepoFiles {
    pub fn new(config: &GitConfig) -> Self {
        Self {
            git_root: config.git_root.clone(),
            enabled_file_extensions: config.enabled_file_extensions.clone(),
        }
    }

    /// Conventional path of a project's bare repository
    pub fn repo_path(&self, project: &str) -> PathBuf {
        self.git_root.join(format!("{project}.git"))
    }

    /// Open a read-only handle to the project's repository.
    ///
    /// The handle is released when the returned value drops, on every exit
    /// path of the operation that opened it.
    pub fn open(&self, project: &str) -> Result<Repository> {
        let path = self.repo_path(project);
        debug!("Opening repository at path: {}", path.display());

        Repository::open_bare(&path).map_err(|e| {
            debug!("Failed to open repository: {}", e);
            GitError::RepositoryNotFound { path }
        })
    }

    /// List all files at the default branch tip, grouped by directory in
    /// first-encounter order. Entries failing the extension allowlist are
    /// skipped entirely. `path_filter` restricts the listing to the files
    /// directly or transitively under one directory.
    pub fn list_files(
        &self,
        project: &str,
        path_filter: Option<&str>,
    ) -> Result<Vec<(String, Vec<FileEntry>)>> {
        let repo = self.open(project)?;
        let tree = head_tree(&repo)?;

        let mut dirs: Vec<(String, Vec<FileEntry>)> = Vec::new();
        let mut walk_error: Option<GitError> = None;

        let walked = tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() != Some(ObjectType::Blob) {
                return TreeWalkResult::Ok;
            }
            let name = entry.name().unwrap_or_default();
            let path = format!("{root}{name}");

            if let Some(filter) = path_filter {
                if !in_directory(&path, filter) {
                    return TreeWalkResult::Ok;
                }
            }
            if !self.matches_extension(&path) {
                return TreeWalkResult::Ok;
            }

            let content = match read_blob(&repo, entry) {
                Ok(content) => content,
                Err(e) => {
                    walk_error = Some(e);
                    return TreeWalkResult::Abort;
                }
            };

            let size = content.len() as u64;
            let dir = parent_dir(&path).to_string();
            let file_entry = FileEntry { path, content, size };
            debug!("Repo file loaded: {}", file_entry.path);

            match dirs.iter_mut().find(|(d, _)| *d == dir) {
                Some((_, entries)) => entries.push(file_entry),
                None => dirs.push((dir, vec![file_entry])),
            }
            TreeWalkResult::Ok
        });

        if let Some(e) = walk_error {
            return Err(e);
        }
        walked?;

        debug!("Retrieved file directories: {:?}", dirs.iter().map(|(d, _)| d).collect::<Vec<_>>());
        Ok(dirs)
    }

    /// Full listing fed through the chunk builder, for bulk upload
    pub fn list_chunked(
        &self,
        project: &str,
        mut builder: FileChunkBuilder,
    ) -> Result<Vec<Chunk>> {
        debug!("Getting repository files as chunks");
        for (dir, entries) in self.list_files(project, None)? {
            builder.add_files(&dir, entries);
        }
        Ok(builder.into_chunks())
    }

    /// Read one blob at the default branch tip, decoded as text
    pub fn read_file(&self, project: &str, path: &str) -> Result<String> {
        let repo = self.open(project)?;
        let tree = head_tree(&repo)?;

        let entry = tree.get_path(Path::new(path)).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                GitError::FileNotFound {
                    path: path.to_string(),
                }
            } else {
                GitError::Git(e)
            }
        })?;

        let object = entry.to_object(&repo)?;
        let blob = object.as_blob().ok_or_else(|| GitError::FileNotFound {
            path: path.to_string(),
        })?;

        Ok(String::from_utf8_lossy(blob.content()).into_owned())
    }

    fn matches_extension(&self, path: &str) -> bool {
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.enabled_file_extensions
                    .iter()
                    .any(|enabled| enabled == ext)
            })
            .unwrap_or(false)
    }
}

/// Resolve the default branch's head commit and its tree
fn head_tree(repo: &Repository) -> Result<Tree<'_>> {
    let head = repo.head().map_err(|e| GitError::TreeResolution {
        message: e.message().to_string(),
    })?;
    let commit = head.peel_to_commit().map_err(|e| GitError::TreeResolution {
        message: e.message().to_string(),
    })?;
    Ok(commit.tree()?)
}

fn read_blob(repo: &Repository, entry: &git2::TreeEntry<'_>) -> Result<String> {
    let object = entry.to_object(repo)?;
    let blob = object.as_blob().ok_or_else(|| GitError::FileNotFound {
        path: entry.name().unwrap_or_default().to_string(),
    })?;
    Ok(String::from_utf8_lossy(blob.content()).into_owned())
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => "",
    }
}

fn in_directory(path: &str, directory: &str) -> bool {
    if directory.is_empty() {
        return true;
    }
    path.strip_prefix(directory)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("pkg/sub/a.py"), "pkg/sub");
        assert_eq!(parent_dir("a.py"), "");
    }

    #[test]
    fn test_in_directory() {
        assert!(in_directory("pkg/a.py", "pkg"));
        assert!(in_directory("pkg/sub/a.py", "pkg"));
        assert!(!in_directory("package/a.py", "pkg"));
        assert!(!in_directory("a.py", "pkg"));
        assert!(in_directory("a.py", ""));
    }

    #[test]
    fn test_matches_extension() {
        let repo_files = GitRepoFiles {
            git_root: PathBuf::from("git"),
            enabled_file_extensions: vec!["py".to_string(), "js".to_string()],
        };
        assert!(repo_files.matches_extension("pkg/a.py"));
        assert!(repo_files.matches_extension("b.js"));
        assert!(!repo_files.matches_extension("README.md"));
        assert!(!repo_files.matches_extension("Makefile"));
    }
}
