//! Configuration file management for plangate.
//!
//! Provides a TOML-based config file at `~/.config/plangate/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use plangate_core::rules::{default_rules, load_rules};
use plangate_core::{DEFAULT_INDEX_NAME, RuleSet};

/// Env var naming a rule set TOML file.
pub const RULES_ENV: &str = "PLANGATE_RULES";
/// Env var naming the reference directory.
pub const REFERENCES_DIR_ENV: &str = "PLANGATE_REFERENCES_DIR";
/// Reference directory used when nothing else is configured.
pub const DEFAULT_REFERENCES_DIR: &str = "references";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub rules: RulesSection,
    #[serde(default)]
    pub references: ReferencesSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RulesSection {
    /// Rule set TOML replacing the embedded default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ReferencesSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

impl ConfigFile {
    /// The file written by `plangate config init`.
    pub fn starter() -> Self {
        Self {
            rules: RulesSection::default(),
            references: ReferencesSection {
                dir: Some(PathBuf::from(DEFAULT_REFERENCES_DIR)),
                index: Some(DEFAULT_INDEX_NAME.to_string()),
            },
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the plangate config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/plangate` or
/// `~/.config/plangate`, never the platform-specific `dirs::config_dir()`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("plangate");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("plangate")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlangateConfig {
    /// `None` means the embedded default rule set.
    pub rules_path: Option<PathBuf>,
    pub references_dir: PathBuf,
    pub index_name: String,
}

impl PlangateConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Rules: `cli_rules` > `PLANGATE_RULES` env > `rules.path` > embedded default
    /// - Reference dir: `cli_refs_dir` > `PLANGATE_REFERENCES_DIR` env > `references.dir` > `references`
    /// - Index name: `cli_index` > `references.index` > `api_reference.md`
    ///
    /// A config file that exists but cannot be parsed is an error; a missing
    /// one is not.
    pub fn resolve(
        cli_rules: Option<&Path>,
        cli_refs_dir: Option<&Path>,
        cli_index: Option<&str>,
    ) -> Result<Self> {
        let file_config = if config_path().exists() {
            Some(load_config()?)
        } else {
            None
        };

        let rules_path = if let Some(path) = cli_rules {
            Some(path.to_path_buf())
        } else if let Some(path) = env_path(RULES_ENV) {
            Some(path)
        } else {
            file_config.as_ref().and_then(|cfg| cfg.rules.path.clone())
        };

        let references_dir = if let Some(dir) = cli_refs_dir {
            dir.to_path_buf()
        } else if let Some(dir) = env_path(REFERENCES_DIR_ENV) {
            dir
        } else if let Some(dir) = file_config.as_ref().and_then(|cfg| cfg.references.dir.clone()) {
            dir
        } else {
            PathBuf::from(DEFAULT_REFERENCES_DIR)
        };

        let index_name = if let Some(name) = cli_index {
            name.to_string()
        } else if let Some(name) = file_config.as_ref().and_then(|cfg| cfg.references.index.clone())
        {
            name
        } else {
            DEFAULT_INDEX_NAME.to_string()
        };

        tracing::debug!(
            rules = ?rules_path,
            references_dir = %references_dir.display(),
            index = %index_name,
            "resolved configuration"
        );

        Ok(Self {
            rules_path,
            references_dir,
            index_name,
        })
    }

    /// Load the configured rule set, or the embedded default.
    pub fn rule_set(&self) -> Result<RuleSet> {
        match &self.rules_path {
            Some(path) => load_rules(path)
                .with_context(|| format!("failed to load rules from {}", path.display())),
            None => Ok(default_rules()),
        }
    }
}

/// Non-empty env var as a path.
fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
