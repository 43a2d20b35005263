//! Graph configuration via TOML
//!
//! A `GraphConfig` is usually built with `Default`, or parsed from a TOML
//! document with [`GraphConfig::from_toml_str`]. Every section and key is
//! optional; missing keys take their defaults.

use photon_core::{Error, Limits, Result};
use serde::{Deserialize, Serialize};

/// Whether propagated writes grow the downstream node's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Mirror/Gate writes push the downstream prior value, like `commit`
    #[default]
    Propagated,
    /// Only the committed node records history; downstream writes overwrite
    OriginOnly,
}

/// Whether `revert` stays local or rolls back reachable peers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevertPolicy {
    /// Revert touches only the reverted node
    #[default]
    Local,
    /// Revert also reverts every node reachable over Mirror/Gate flow, once
    Propagate,
}

/// `[history]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum history depth per node; the oldest entry is dropped first.
    /// `0` means unbounded.
    pub limit: usize,
    /// Downstream history policy
    pub policy: HistoryPolicy,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: 256,
            policy: HistoryPolicy::default(),
        }
    }
}

/// `[propagation]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Revert policy
    pub revert: RevertPolicy,
}

/// Graph configuration
///
/// # Example
///
/// ```toml
/// [history]
/// limit = 256
/// policy = "propagated"
///
/// [propagation]
/// revert = "local"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// History settings
    pub history: HistoryConfig,
    /// Propagation settings
    pub propagation: PropagationConfig,
    /// Codec limits used by absorb/emit against this graph
    pub limits: Limits,
}

impl GraphConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on syntax errors or unknown policy names.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Serialize this configuration to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Set the history depth limit (`0` = unbounded)
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history.limit = limit;
        self
    }

    /// Set the downstream history policy
    pub fn with_history_policy(mut self, policy: HistoryPolicy) -> Self {
        self.history.policy = policy;
        self
    }

    /// Set the revert policy
    pub fn with_revert_policy(mut self, revert: RevertPolicy) -> Self {
        self.propagation.revert = revert;
        self
    }

    /// Set the codec limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Photon graph configuration

[history]
# Maximum history depth per node. The oldest entry is dropped first.
# 0 = unbounded.
limit = 256
# "propagated"  = Mirror/Gate writes push the downstream node's prior value
# "origin_only" = only the committed node records history
policy = "propagated"

[propagation]
# "local"     = revert() restores only the reverted node
# "propagate" = revert() also reverts peers reachable over Mirror/Gate flow
revert = "local"

[limits]
max_nesting_depth = 128
max_text_bytes = 16777216
max_count = 1000000
"#
    }
}
