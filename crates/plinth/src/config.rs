//! Configuration types for loading and saving diagrams.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a partial or empty configuration source is always accepted.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining load and save settings.
//! - [`LoadConfig`] - Controls migration and how semantic violations are treated.
//! - [`SaveConfig`] - Controls the output format.
//!
//! # Example
//!
//! ```
//! # use plinth::config::{AppConfig, SemanticPolicy};
//! let config = AppConfig::default();
//! assert_eq!(config.load().semantic_policy(), SemanticPolicy::Reject);
//! assert!(config.load().migrate());
//! assert!(config.save().pretty());
//! ```

use serde::Deserialize;

/// Top-level configuration combining load and save settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Load configuration section.
    #[serde(default)]
    load: LoadConfig,

    /// Save configuration section.
    #[serde(default)]
    save: SaveConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified load and save configurations.
    pub fn new(load: LoadConfig, save: SaveConfig) -> Self {
        Self { load, save }
    }

    /// Returns the load configuration.
    pub fn load(&self) -> &LoadConfig {
        &self.load
    }

    /// Returns the save configuration.
    pub fn save(&self) -> &SaveConfig {
        &self.save
    }
}

/// What to do with a document that decodes but breaks a semantic rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticPolicy {
    /// Fail the load.
    #[default]
    Reject,
    /// Accept the diagram and report the violation as a warning.
    Warn,
}

/// Settings applied when loading a document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    semantic_policy: SemanticPolicy,
    migrate: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            semantic_policy: SemanticPolicy::default(),
            migrate: true,
        }
    }
}

impl LoadConfig {
    /// Creates a new [`LoadConfig`].
    ///
    /// # Arguments
    ///
    /// * `semantic_policy` - How semantic violations are treated.
    /// * `migrate` - Whether obsolete document shapes are rewritten before decoding.
    pub fn new(semantic_policy: SemanticPolicy, migrate: bool) -> Self {
        Self {
            semantic_policy,
            migrate,
        }
    }

    /// Returns the [`SemanticPolicy`].
    pub fn semantic_policy(&self) -> SemanticPolicy {
        self.semantic_policy
    }

    /// Returns `true` if documents are migrated before decoding.
    pub fn migrate(&self) -> bool {
        self.migrate
    }
}

/// Settings applied when saving a diagram.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pretty: bool,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl SaveConfig {
    /// Creates a new [`SaveConfig`].
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Returns `true` if output is indented.
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}
