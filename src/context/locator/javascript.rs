//! JavaScript/TypeScript language rules for the definition locator.

use regex::Regex;

use super::{compile_multiline, LanguageRules, Result};

/// Locates function, arrow-function and class definitions and follows ES
/// module and CommonJS imports. Relative specifiers (`./x`, `../x`) resolve
/// against the origin file's directory; bare package specifiers resolve
/// nowhere and are simply exhausted.
#[derive(Debug)]
pub struct JavaScriptRules {
    import_pattern: Regex,
    require_pattern: Regex,
    extensions: Vec<String>,
}

impl JavaScriptRules {
    pub fn new() -> Result<Self> {
        Ok(Self {
            import_pattern: compile_multiline(
                r#"^[ \t]*(?:import|export)[^'"\n]*?from[ \t]*['"]([^'"\n]+)['"]|^[ \t]*import[ \t]+['"]([^'"\n]+)['"]"#,
            )?,
            require_pattern: compile_multiline(r#"require\([ \t]*['"]([^'"\n]+)['"][ \t]*\)"#)?,
            extensions: vec![
                ".js".to_string(),
                ".jsx".to_string(),
                ".ts".to_string(),
                ".tsx".to_string(),
            ],
        })
    }
}

impl LanguageRules for JavaScriptRules {
    fn definition_pattern(&self, symbol: &str) -> String {
        let name = regex::escape(symbol);
        [
            format!(
                r"^[ \t]*(?:export[ \t]+)?(?:default[ \t]+)?(?:async[ \t]+)?function[ \t]+{name}[ \t]*\([^)]*\)"
            ),
            format!(
                r"^[ \t]*(?:export[ \t]+)?(?:const|let|var)[ \t]+{name}[ \t]*=[ \t]*(?:async[ \t]+)?(?:\([^)]*\)|[\w$]+)[ \t]*=>"
            ),
            format!(r"^[ \t]*(?:export[ \t]+)?(?:default[ \t]+)?class[ \t]+{name}\b"),
        ]
        .join("|")
    }

    fn parse_imports(&self, content: &str) -> Vec<String> {
        let mut modules = Vec::new();
        for captures in self.import_pattern.captures_iter(content) {
            if let Some(spec) = captures.get(1).or_else(|| captures.get(2)) {
                modules.push(spec.as_str().to_string());
            }
        }
        for captures in self.require_pattern.captures_iter(content) {
            modules.push(captures[1].to_string());
        }
        modules
    }

    fn module_extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Module specifiers are already slash paths; `./x` and `../x` become
    /// root-anchored, bare specifiers stay repository-relative.
    fn module_to_path(&self, module: &str, extension: &str) -> String {
        if let Some(rest) = module.strip_prefix("./") {
            format!("/{rest}{extension}")
        } else if module.starts_with("../") {
            format!("/{module}{extension}")
        } else {
            format!("{module}{extension}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> JavaScriptRules {
        JavaScriptRules::new().unwrap()
    }

    fn definition_regex(symbol: &str) -> Regex {
        compile_multiline(&rules().definition_pattern(symbol)).unwrap()
    }

    #[test]
    fn test_matches_function_declaration() {
        let content = "export async function render(props) {\n  return null;\n}\n";
        let found = definition_regex("render").find(content).unwrap();
        assert!(found.as_str().contains("function render"));
    }

    #[test]
    fn test_matches_arrow_function() {
        let content = "const handler = async (event) => {\n  respond(event);\n};\n";
        assert!(definition_regex("handler").is_match(content));
    }

    #[test]
    fn test_matches_class() {
        let content = "export default class Store {\n}\n";
        assert!(definition_regex("Store").is_match(content));
    }

    #[test]
    fn test_does_not_match_call_sites() {
        let content = "render(props);\nconst x = render;\n";
        assert!(!definition_regex("render").is_match(content));
    }

    #[test]
    fn test_parse_es_imports() {
        let content = "import { a } from './util';\nimport def from 'pkg';\nexport { b } from './other';\n";
        assert_eq!(rules().parse_imports(content), vec!["./util", "pkg", "./other"]);
    }

    #[test]
    fn test_parse_require() {
        let content = "const util = require('./util');\n";
        assert_eq!(rules().parse_imports(content), vec!["./util"]);
    }

    #[test]
    fn test_module_to_path_relative() {
        let rules = rules();
        assert_eq!(rules.module_to_path("./util", ".js"), "/util.js");
        assert_eq!(rules.module_to_path("../lib/x", ".ts"), "/../lib/x.ts");
        assert_eq!(rules.module_to_path("pkg", ".js"), "pkg.js");
    }
}
