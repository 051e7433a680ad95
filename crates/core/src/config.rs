//! YAML configuration loading.
//!
//! Loaded once at startup and read-only afterward. Missing or malformed
//! keys are fatal; there are no runtime reloads.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub midi: MidiConfig,
    pub vlc: VlcConfig,
    /// Controller value -> command to issue.
    pub commands: BTreeMap<u8, CommandSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MidiConfig {
    /// MIDI channel to listen on (1-16).
    pub channel: u8,
    /// Controller number to listen on (0-127).
    pub controller_number: u8,
    /// Port index or name substring. Prompts at startup when omitted.
    #[serde(default)]
    pub port: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VlcConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Password for VLC's HTTP interface (username is empty).
    pub password: String,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

/// One entry in the `commands` table: the VLC command to issue plus any
/// extra query parameters, passed through to the request untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSpec {
    pub command: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, serde_yaml::Value>,
}

impl CommandSpec {
    /// Extra parameters rendered as query-string pairs.
    pub fn query_params(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(key, value)| (key.clone(), scalar_to_string(value)))
            .collect()
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl Config {
    /// Load and parse a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
