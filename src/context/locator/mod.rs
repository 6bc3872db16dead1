//! Cross-file symbol definition location.
//!
//! Given a symbol name and the file it is referenced from, the locator reads
//! the file and, failing a direct match, follows its imports depth-first
//! across the repository until a definition is found or the reachable import
//! graph is exhausted. Per-language behavior (definition pattern, import
//! parsing, module path conversion) is supplied by a [`LanguageRules`]
//! strategy.
//!
//! Matching is textual, not syntactic: a definition inside a comment or a
//! string can mislead it. Accepted trade-off for a review-context hint
//! system.

pub mod javascript;
pub mod python;

pub use javascript::JavaScriptRules;
pub use python::PythonRules;

use std::collections::HashSet;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::debug;

use crate::context::fetcher::CodeFileFetcher;
use crate::git::GitError;

const LOG_MAX_CONTENT_SIZE: usize = 256;

/// Result type for locator operations
pub type Result<T> = std::result::Result<T, LocatorError>;

#[derive(Debug, Error)]
pub enum LocatorError {
    /// The language strategy declares no candidate extensions
    #[error("No module extensions configured for the language strategy")]
    NoModuleExtensions,

    /// A definition or import pattern failed to compile
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// No language strategy is registered for the file's extension
    #[error("No locator available for file: {path}")]
    UnsupportedLanguage { path: String },

    /// Repository failure other than "file absent"
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Per-language capability set driving the locator engine.
///
/// One implementation exists per supported source language; the engine stays
/// language-agnostic.
pub trait LanguageRules: std::fmt::Debug {
    /// Regex source (compiled multi-line) whose first match within a file's
    /// content is the symbol's definition.
    fn definition_pattern(&self, symbol: &str) -> String;

    /// Module identifiers referenced by the file's import statements, in
    /// order of appearance.
    fn parse_imports(&self, content: &str) -> Vec<String>;

    /// Candidate file suffixes, tried in declared order when resolving a
    /// module identifier to a path.
    fn module_extensions(&self) -> &[String];

    /// Convert a module identifier to a candidate path. A leading `/` marks
    /// a result to be anchored at the search root directory.
    fn module_to_path(&self, module: &str, extension: &str) -> String {
        format!("{}{}", dot_notation_to_path(module), extension)
    }

    /// Subtype-specific setup run once per top-level search
    fn before_search(
        &mut self,
        _fetcher: &mut CodeFileFetcher<'_>,
        _root_dir: &str,
    ) -> crate::git::Result<()> {
        Ok(())
    }
}

/// Select a language strategy by the origin file's extension
pub fn rules_for_file(path: &str) -> Result<Box<dyn LanguageRules>> {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("py") => Ok(Box::new(PythonRules::new()?)),
        Some("js" | "jsx" | "ts" | "tsx") => Ok(Box::new(JavaScriptRules::new()?)),
        _ => Err(LocatorError::UnsupportedLanguage {
            path: path.to_string(),
        }),
    }
}

/// Per-search state threaded through the recursion. Created fresh for each
/// top-level `find_definition` call and discarded at its end, so the engine
/// is reentrant.
struct SearchSession {
    pattern: Regex,
    /// Files already opened during this call; bounds recursion on cycles
    visited: HashSet<String>,
    /// Import module sequence: insertion order preserved, duplicates suppressed
    modules: Vec<String>,
    seen_modules: HashSet<String>,
    /// Index of the first module not yet fully explored
    cursor: usize,
    /// Origin file's directory, anchors relative module paths
    root_dir: String,
}

/// Depth-first, cycle-safe definition search engine.
///
/// One instance serves exactly one caller at a time; construct one locator
/// (and one fetcher) per search session.
#[derive(Debug)]
pub struct CallableLocator<'a> {
    rules: Box<dyn LanguageRules>,
    fetcher: CodeFileFetcher<'a>,
}

impl<'a> CallableLocator<'a> {
    /// Fails on an empty candidate extension list; pattern defects inside the
    /// strategy surface from the strategy's own constructor.
    pub fn new(rules: Box<dyn LanguageRules>, fetcher: CodeFileFetcher<'a>) -> Result<Self> {
        if rules.module_extensions().is_empty() {
            return Err(LocatorError::NoModuleExtensions);
        }
        Ok(Self { rules, fetcher })
    }

    /// Find the definition of `symbol` starting from `origin_file`.
    ///
    /// Missing files and absent symbols are expected outcomes and produce
    /// `Ok(None)`; repository failures bubble as errors.
    pub fn find_definition(&mut self, symbol: &str, origin_file: &str) -> Result<Option<String>> {
        debug!("Finding definition of `{}` from file {}", symbol, origin_file);

        let name = simple_name(symbol);
        let pattern_source = self.rules.definition_pattern(name);
        let pattern = compile_multiline(&pattern_source)?;

        let root_dir = dir_name(origin_file).to_string();
        debug!("Root file dir: {}", root_dir);

        let mut session = SearchSession {
            pattern,
            visited: HashSet::new(),
            modules: Vec::new(),
            seen_modules: HashSet::new(),
            cursor: 0,
            root_dir,
        };

        self.rules.before_search(&mut self.fetcher, &session.root_dir)?;

        self.search(&mut session, origin_file)
    }

    fn search(&self, session: &mut SearchSession, file: &str) -> Result<Option<String>> {
        debug!("Searching in file {}", file);
        if !session.visited.insert(file.to_string()) {
            debug!("File {} already visited", file);
            return Ok(None);
        }

        let content = match self.fetcher.file_content(file) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                debug!("File `{}` not found in the git repository", file);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        debug!(
            "File content retrieved for `{}`:\n{}",
            file,
            cut(&content, LOG_MAX_CONTENT_SIZE)
        );

        // A match in the file itself always beats any import
        if let Some(found) = session.pattern.find(&content) {
            let definition = found.as_str().trim().to_string();
            debug!("Found definition: {}", definition);
            return Ok(Some(definition));
        }

        for module in self.rules.parse_imports(&content) {
            if session.seen_modules.insert(module.clone()) {
                session.modules.push(module);
            }
        }

        self.search_modules(session)
    }

    fn search_modules(&self, session: &mut SearchSession) -> Result<Option<String>> {
        let extensions = self.rules.module_extensions().to_vec();

        while session.cursor < session.modules.len() {
            let module = session.modules[session.cursor].clone();
            debug!("Searching module {} (cursor {})", module, session.cursor);

            for extension in &extensions {
                let mut path = self.rules.module_to_path(&module, extension);
                if path.starts_with('/') {
                    path = format!("{}{}", session.root_dir, path);
                }
                let path = normalize_path(&path);
                debug!("Module path: {}", path);

                if let Some(definition) = self.search(session, &path)? {
                    return Ok(Some(definition));
                }
            }
            // Module exhausted: never retried within this call
            session.cursor += 1;
        }
        Ok(None)
    }
}

/// Last segment of a dotted symbol reference
pub fn simple_name(symbol: &str) -> &str {
    symbol.rsplit('.').next().unwrap_or(symbol)
}

fn dir_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => "",
    }
}

/// Dotted module notation to a slash path (`a.b` -> `a/b`, `.b` -> `/b`)
fn dot_notation_to_path(module: &str) -> String {
    module.replace('.', "/")
}

/// Lexically resolve `.` and `..` segments and collapse empty ones
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn compile_multiline(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|source| LocatorError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn cut(content: &str, max_bytes: usize) -> &str {
    if content.len() <= max_bytes {
        return content;
    }
    let mut end = max_bytes;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}
