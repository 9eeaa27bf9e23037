//! Run configuration.
//!
//! ## Layering
//!
//! Later sources override earlier ones:
//!
//! 1. Built-in defaults
//! 2. TOML file (default `deferred-match.toml`, skipped when missing)
//! 3. Environment variables prefixed with `DMATCH__`, with `__` between
//!    section and key: `DMATCH__MATCHING__ROUNDS=5` sets `matching.rounds`
//! 4. Command line flags, applied by the binary on top of the loaded
//!    [`Settings`]
//!
//! ## Example
//!
//! ```toml
//! [input]
//! candidates = "candidate_preferences.csv"
//!
//! [matching]
//! rounds = 5
//! verify = true
//!
//! [logging]
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, Map};
use serde::Deserialize;

use crate::error::Result;

/// Run configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: InputSettings,
    pub output: OutputSettings,
    pub matching: MatchingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub candidates: PathBuf,
    pub employers: PathBuf,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            candidates: PathBuf::from("candidate_preferences.csv"),
            employers: PathBuf::from("job_preferences.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Single-round employer -> candidate table
    pub round: PathBuf,
    pub candidate_pairs: PathBuf,
    pub employer_pairs: PathBuf,
    /// Displacement CSV; skipped when unset
    pub displacement: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            round: PathBuf::from("matching_results.csv"),
            candidate_pairs: PathBuf::from("candidate_pairs.csv"),
            employer_pairs: PathBuf::from("job_pairs.csv"),
            displacement: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    /// Target round count for multi-round runs
    pub rounds: usize,
    /// Check injectivity and stability of every round
    pub verify: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            rounds: 10,
            verify: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file and the process environment
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Same as [`load`](Self::load), reading variables from `env` instead of
    /// the process environment when given
    pub fn load_with_env(path: &Path, env: Option<Map<String, String>>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("DMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
