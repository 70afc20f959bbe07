//! CLI configuration, loaded from `rollkit.yaml`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "rollkit.yaml";

/// Settings shared by every subcommand. Command line flags win over these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Fixed seed; entropy when absent
    pub seed: Option<Seed>,

    /// Notation rolled when `rollkit roll` gets none
    #[serde(default = "default_notation")]
    pub notation: String,

    pub format: OutputFormat,

    /// Repetitions for `roll` and `pick`
    #[serde(default = "default_times")]
    pub times: usize,
}

/// A seed given either as an integer or as free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_notation() -> String {
    "1d20".to_string()
}
fn default_times() -> usize {
    1
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            seed: None,
            notation: default_notation(),
            format: OutputFormat::default(),
            times: default_times(),
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// An explicit path must exist. Otherwise the working directory is searched first, then the
    /// user config directory, and defaults apply when neither has a `rollkit.yaml`.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::search_paths(cwd).into_iter().find(|path| path.is_file()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    fn search_paths(cwd: &Path) -> Vec<PathBuf> {
        let mut paths = vec![cwd.join(CONFIG_FILE)];
        if let Some(dirs) = ProjectDirs::from("", "", "rollkit") {
            paths.push(dirs.config_dir().join(CONFIG_FILE));
        }
        paths
    }
}

impl FromStr for Seed {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.parse() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s.to_string()),
        })
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}
