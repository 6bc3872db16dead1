use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".reviewctx";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Root directory holding bare repositories (`<git_root>/<project>.git`)
    #[serde(default = "default_git_root")]
    pub git_root: PathBuf,

    /// File extensions eligible for listing and upload
    #[serde(default = "default_enabled_extensions")]
    pub enabled_file_extensions: Vec<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            git_root: default_git_root(),
            enabled_file_extensions: default_enabled_extensions(),
        }
    }
}

fn default_git_root() -> PathBuf {
    PathBuf::from("git")
}

fn default_enabled_extensions() -> Vec<String> {
    vec![
        "py".to_string(),
        "js".to_string(),
        "jsx".to_string(),
        "ts".to_string(),
        "tsx".to_string(),
        "go".to_string(),
        "java".to_string(),
        "rs".to_string(),
        "c".to_string(),
        "cc".to_string(),
        "cpp".to_string(),
        "h".to_string(),
        "hpp".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Prefix stripped from on-demand lookups before hitting the repository.
    /// Empty disables stripping.
    #[serde(default)]
    pub on_demand_base_path: String,

    /// Maximum aggregate content size of one upload chunk, in bytes
    #[serde(default = "default_max_chunk_bytes")]
    pub max_chunk_bytes: u64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            on_demand_base_path: String::new(),
            max_chunk_bytes: default_max_chunk_bytes(),
        }
    }
}

fn default_max_chunk_bytes() -> u64 {
    5 * 1024 * 1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable file logging
    #[serde(default)]
    pub enabled: bool,

    /// Log level for the file layer: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also log to stderr
    #[serde(default = "default_log_stderr")]
    pub stderr: bool,

    /// Log directory (relative paths resolve against the working root)
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Log file name prefix
    #[serde(default = "default_log_prefix")]
    pub file_prefix: String,

    /// Rotation strategy: hourly, daily, minutely, never
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: default_log_level(),
            stderr: default_log_stderr(),
            directory: default_log_directory(),
            file_prefix: default_log_prefix(),
            rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_stderr() -> bool {
    true
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(".reviewctx/logs")
}

fn default_log_prefix() -> String {
    "reviewctx.log".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

impl Config {
    /// Load configuration from the .reviewctx directory
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the .reviewctx directory
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = root.join(CONFIG_DIR);
        let config_path = config_dir.join(CONFIG_FILE);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.git.enabled_file_extensions.contains(&"py".to_string()));
        assert_eq!(config.git.git_root, PathBuf::from("git"));
        assert!(config.context.on_demand_base_path.is_empty());
        assert_eq!(config.context.max_chunk_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.context.on_demand_base_path = "src".to_string();
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.context.on_demand_base_path, "src");
        assert_eq!(
            loaded.git.enabled_file_extensions,
            config.git.enabled_file_extensions
        );
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.context.max_chunk_bytes, default_max_chunk_bytes());
    }
}
