use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::codec::ItemPool;

/// How encoded bytes and decoded items are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One 32-byte word per line
    #[default]
    Words,
    /// A single 0x-prefixed hex string
    Hex,
    /// JSON documents
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,

    #[serde(default)]
    pub output: OutputFormat,

    #[serde(default)]
    pub abi_paths: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool_capacity: default_pool_capacity(),
            output: OutputFormat::default(),
            abi_paths: Vec::new(),
        }
    }
}

fn default_pool_capacity() -> usize {
    ItemPool::DEFAULT_CAPACITY
}

impl Config {
    /// ABI search roots, with `~/` expanded; the current directory if none
    pub fn abi_roots(&self) -> Vec<PathBuf> {
        if self.abi_paths.is_empty() {
            return vec![PathBuf::from(".")];
        }
        self.abi_paths.iter().map(|path| expand_home(path)).collect()
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content)
}

/// Parse a config document, falling back to defaults when it is invalid
pub fn parse(content: &str) -> Config {
    match toml::from_str::<Config>(content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "ignoring invalid config");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("ABICODEC_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("abicodec").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("abicodec").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "abicodec", "abicodec")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let config = parse(
            r#"
            pool_capacity = 8
            output = "json"
            abi_paths = ["contracts", "/abs/out"]
            "#,
        );
        assert_eq!(config.pool_capacity, 8);
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(
            config.abi_roots(),
            vec![PathBuf::from("contracts"), PathBuf::from("/abs/out")]
        );
    }

    #[test]
    fn test_defaults() {
        let config = parse("");
        assert_eq!(config.pool_capacity, ItemPool::DEFAULT_CAPACITY);
        assert_eq!(config.output, OutputFormat::Words);
        assert_eq!(config.abi_roots(), vec![PathBuf::from(".")]);
    }

    #[test]
    fn test_invalid_falls_back() {
        let config = parse("output = \"yaml\"");
        assert_eq!(config.output, OutputFormat::Words);
    }
}
