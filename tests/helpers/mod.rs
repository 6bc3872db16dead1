//! Shared fixtures: bare repositories built with git2 in temp directories.

use std::collections::BTreeMap;
use std::path::Path;

use git2::Repository;

use reviewctx::config::GitConfig;

/// Create a bare repository at `<git_root>/<project>.git` whose default
/// branch tip contains the given `(path, content)` files.
pub fn create_bare_repo(git_root: &Path, project: &str, files: &[(&str, &str)]) {
    let repo = Repository::init_bare(git_root.join(format!("{project}.git"))).unwrap();

    let owned: Vec<(String, String)> = files
        .iter()
        .map(|(path, content)| (path.to_string(), content.to_string()))
        .collect();
    let tree_oid = write_tree(&repo, &owned);
    let tree = repo.find_tree(tree_oid).unwrap();

    let signature = git2::Signature::now("test", "test@example.com").unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
        .unwrap();
}

/// Create an empty bare repository (no commits) for the project
pub fn create_empty_repo(git_root: &Path, project: &str) {
    Repository::init_bare(git_root.join(format!("{project}.git"))).unwrap();
}

pub fn git_config(git_root: &Path, extensions: &[&str]) -> GitConfig {
    GitConfig {
        git_root: git_root.to_path_buf(),
        enabled_file_extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
    }
}

fn write_tree(repo: &Repository, files: &[(String, String)]) -> git2::Oid {
    let mut builder = repo.treebuilder(None).unwrap();
    let mut subdirs: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();

    for (path, content) in files {
        match path.split_once('/') {
            None => {
                let oid = repo.blob(content.as_bytes()).unwrap();
                builder.insert(path, oid, 0o100_644).unwrap();
            }
            Some((dir, rest)) => subdirs
                .entry(dir.to_string())
                .or_default()
                .push((rest.to_string(), content.clone())),
        }
    }

    for (dir, entries) in subdirs {
        let oid = write_tree(repo, &entries);
        builder.insert(&dir, oid, 0o040_000).unwrap();
    }

    builder.write().unwrap()
}
