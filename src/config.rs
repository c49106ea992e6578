use anyhow::{Context, Result};
use globset::Glob;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub sources: BTreeMap<String, FilesystemSourceConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    /// Upper bound on retrieval cycles in a single `nrt poll` run.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
        }
    }
}

fn default_max_files() -> usize {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryConfig {
    #[serde(default = "default_delivery_dir")]
    pub dir: PathBuf,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            dir: default_delivery_dir(),
        }
    }
}

fn default_delivery_dir() -> PathBuf {
    PathBuf::from("./data/outbox")
}

/// One polled directory. `source_id` namespaces its records in the store.
#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemSourceConfig {
    pub source_id: i64,
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*".to_string()]
}

impl Config {
    /// Look up a configured source by name.
    pub fn source(&self, name: &str) -> Result<&FilesystemSourceConfig> {
        self.sources.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.sources.keys().map(String::as_str).collect();
            anyhow::anyhow!(
                "Unknown source: '{}'. Configured: {}",
                name,
                if known.is_empty() {
                    "(none)".to_string()
                } else {
                    known.join(", ")
                }
            )
        })
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content)?;
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.poll.max_files == 0 {
        anyhow::bail!("poll.max_files must be > 0");
    }

    // Sources share the store, so their ids must not collide
    let mut seen: HashMap<i64, &str> = HashMap::new();
    for (name, source) in &config.sources {
        if let Some(other) = seen.insert(source.source_id, name) {
            anyhow::bail!(
                "sources.{} and sources.{} both use source_id {}",
                other,
                name,
                source.source_id
            );
        }
        for pattern in source.include_globs.iter().chain(&source.exclude_globs) {
            Glob::new(pattern)
                .with_context(|| format!("sources.{}: invalid glob '{}'", name, pattern))?;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
[db]
path = "./data/nrt.sqlite"
"#;

    #[test]
    fn test_defaults() {
        let config = parse_config(BASE).unwrap();
        assert_eq!(config.poll.max_files, 100);
        assert_eq!(config.delivery.dir, PathBuf::from("./data/outbox"));
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_source_parsing() {
        let text = format!(
            "{}\n[sources.sensor_a]\nsource_id = 27\nroot = \"/tmp/in\"\ninclude_globs = [\"**/*.csv\"]\n",
            BASE
        );
        let config = parse_config(&text).unwrap();
        let source = config.source("sensor_a").unwrap();
        assert_eq!(source.source_id, 27);
        assert_eq!(source.include_globs, vec!["**/*.csv".to_string()]);
        assert!(!source.follow_symlinks);
        assert!(config.source("missing").is_err());
    }

    #[test]
    fn test_duplicate_source_id_rejected() {
        let text = format!(
            "{}\n[sources.a]\nsource_id = 1\nroot = \"/a\"\n\n[sources.b]\nsource_id = 1\nroot = \"/b\"\n",
            BASE
        );
        let err = parse_config(&text).unwrap_err().to_string();
        assert!(err.contains("source_id 1"), "unexpected error: {}", err);
    }

    #[test]
    fn test_zero_max_files_rejected() {
        let text = format!("{}\n[poll]\nmax_files = 0\n", BASE);
        assert!(parse_config(&text).is_err());
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let text = format!(
            "{}\n[sources.a]\nsource_id = 1\nroot = \"/a\"\ninclude_globs = [\"[\"]\n",
            BASE
        );
        assert!(parse_config(&text).is_err());
    }
}
