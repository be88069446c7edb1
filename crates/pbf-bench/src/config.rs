//! Configuration for the benchmark run.
//!
//! Values are layered, later layers winning:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file,
//! 3. environment variables,
//! 4. command-line flags (applied by the binary).
//!
//! Environment variables:
//!
//! - `PBF_MESSAGES`        (default: "200000")
//! - `PBF_ITERATIONS`      (default: "10")
//! - `PBF_OUTPUT_CAPACITY` (default: "134217728", 128 MiB)
//! - `PBF_COMPACT`         (default: "false")

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pbf_writer::LengthMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {key}")]
    Env { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Benchmark configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Outer messages encoded per iteration.
    pub messages: usize,

    /// Number of timed encodes.
    pub iterations: usize,

    /// Size of the caller-supplied output buffer in bytes.
    pub output_capacity: usize,

    /// Use minimal length prefixes instead of padded ones.
    pub compact: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            messages: 200_000,
            iterations: 10,
            output_capacity: 128 * 1024 * 1024,
            compact: false,
        }
    }
}

impl BenchConfig {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Override fields from `PBF_*` environment variables.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| env::var(key).ok())
    }

    /// Override fields from any key/value lookup.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.messages = read_or_default(&lookup, "PBF_MESSAGES", self.messages)?;
        self.iterations = read_or_default(&lookup, "PBF_ITERATIONS", self.iterations)?;
        self.output_capacity = read_or_default(&lookup, "PBF_OUTPUT_CAPACITY", self.output_capacity)?;
        self.compact = read_or_default(&lookup, "PBF_COMPACT", self.compact)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::Invalid("iterations must be at least 1"));
        }
        if self.output_capacity == 0 {
            return Err(ConfigError::Invalid("output_capacity must be non-zero"));
        }
        Ok(())
    }

    pub fn length_mode(&self) -> LengthMode {
        if self.compact {
            LengthMode::Compact
        } else {
            LengthMode::Padded
        }
    }
}

fn read_or_default<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Env { key, value: val }),
        None => Ok(default),
    }
}
