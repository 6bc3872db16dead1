//! Python language rules for the definition locator.

use regex::Regex;

use crate::context::fetcher::CodeFileFetcher;

use super::{compile_multiline, LanguageRules, Result};

/// Locates `def`/`class` definitions and follows `import`/`from ... import`
/// statements. Relative imports (`from .mod import x`) resolve against the
/// origin file's directory.
#[derive(Debug)]
pub struct PythonRules {
    import_pattern: Regex,
    from_pattern: Regex,
    extensions: Vec<String>,
}

impl PythonRules {
    pub fn new() -> Result<Self> {
        Ok(Self {
            import_pattern: compile_multiline(r"^[ \t]*import[ \t]+([\w. \t,]+)")?,
            from_pattern: compile_multiline(r"^[ \t]*from[ \t]+([.\w]+)[ \t]+import[ \t]+([\w* \t,]+)")?,
            extensions: vec![".py".to_string()],
        })
    }
}

impl LanguageRules for PythonRules {
    fn definition_pattern(&self, symbol: &str) -> String {
        let name = regex::escape(symbol);
        format!(
            r"^[ \t]*(?:async[ \t]+)?def[ \t]+{name}[ \t]*\([^)]*\)[^:]*:|^[ \t]*class[ \t]+{name}\b[^:\n]*:"
        )
    }

    fn parse_imports(&self, content: &str) -> Vec<String> {
        let mut modules = Vec::new();

        for captures in self.from_pattern.captures_iter(content) {
            let module = &captures[1];
            modules.push(module.to_string());
            // `from pkg import util` may refer to the submodule pkg/util
            for name in split_group(&captures[2]) {
                if name == "*" {
                    continue;
                }
                if module.ends_with('.') {
                    modules.push(format!("{module}{name}"));
                } else {
                    modules.push(format!("{module}.{name}"));
                }
            }
        }

        for captures in self.import_pattern.captures_iter(content) {
            for module in split_group(&captures[1]) {
                modules.push(module.to_string());
            }
        }

        modules
    }

    fn module_extensions(&self) -> &[String] {
        &self.extensions
    }

    fn before_search(
        &mut self,
        fetcher: &mut CodeFileFetcher<'_>,
        root_dir: &str,
    ) -> crate::git::Result<()> {
        // Sibling modules are the overwhelmingly common import target
        fetcher.preload_directory(root_dir)?;
        Ok(())
    }
}

fn split_group(group: &str) -> impl Iterator<Item = &str> {
    group
        .split(',')
        .map(str::trim)
        .filter(|entity| !entity.is_empty())
}
