use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Options for the markdown -> document direction, passed per call.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub headings: HeadingsConfig,
    pub links: LinksConfig,
    pub code: CodeConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HeadingsConfig {
    /// Accept `h1.` .. `h6.` headings.
    pub legacy_syntax: bool,
}

impl Default for HeadingsConfig {
    fn default() -> Self {
        Self {
            legacy_syntax: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LinksConfig {
    /// Accept `[text|url]` links.
    pub pipe_syntax: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self { pipe_syntax: true }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CodeConfig {
    pub languages: Vec<String>,
}

impl CodeConfig {
    /// Apply the language whitelist to a fence tag.
    /// Returns None if the tag is empty or not allowed.
    pub fn accept_language(&self, tag: &str) -> Option<String> {
        if tag.is_empty() {
            return None;
        }
        if self.languages.is_empty() || self.languages.iter().any(|l| l.eq_ignore_ascii_case(tag)) {
            Some(tag.to_string())
        } else {
            tracing::debug!(language = tag, "fence language not in whitelist, dropping");
            None
        }
    }
}

impl Config {
    /// The bundled `default_config.toml`.
    pub fn compiled_default() -> Self {
        Self::from_toml_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a TOML file, or return defaults if it is missing or invalid.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default conversion config");
                Self::compiled_default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
