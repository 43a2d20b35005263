//! Size limits for photon decoding and emission
//!
//! Decoding is recursive over nested lists, maps and containers, and counts
//! on the wire drive allocation. These limits bound both. Violations result in
//! `Error::LimitExceeded`.

use crate::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size limits for photon streams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum nesting depth of values and containers (default: 128)
    pub max_nesting_depth: usize,

    /// Maximum text payload length in bytes (default: 16MB)
    pub max_text_bytes: usize,

    /// Maximum element count of a list, map, container or edge table (default: 1M)
    pub max_count: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_nesting_depth: 128,
            max_text_bytes: 16 * 1024 * 1024, // 16MB
            max_count: 1_000_000,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_nesting_depth: 4,
            max_text_bytes: 64,
            max_count: 16,
        }
    }

    /// Validate a nesting depth
    pub fn check_depth(&self, depth: usize) -> Result<(), LimitError> {
        if depth > self.max_nesting_depth {
            return Err(LimitError::NestingTooDeep {
                actual: depth,
                max: self.max_nesting_depth,
            });
        }
        Ok(())
    }

    /// Validate a text payload length
    pub fn check_text(&self, len: usize) -> Result<(), LimitError> {
        if len > self.max_text_bytes {
            return Err(LimitError::TextTooLong {
                actual: len,
                max: self.max_text_bytes,
            });
        }
        Ok(())
    }

    /// Validate an element count
    pub fn check_count(&self, count: usize) -> Result<(), LimitError> {
        if count > self.max_count {
            return Err(LimitError::CountTooLarge {
                actual: count,
                max: self.max_count,
            });
        }
        Ok(())
    }

    /// Validate a value against size limits, starting at `depth`
    pub fn validate_value(&self, value: &Value, depth: usize) -> Result<(), LimitError> {
        self.check_depth(depth)?;
        match value {
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) => Ok(()),
            Value::Text(s) => self.check_text(s.len()),
            Value::List(items) => {
                self.check_count(items.len())?;
                for item in items {
                    self.validate_value(item, depth + 1)?;
                }
                Ok(())
            }
            Value::Map(m) => {
                self.check_count(m.len())?;
                for (k, v) in m {
                    self.check_text(k.len())?;
                    self.validate_value(v, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Limit validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    /// Nesting exceeds maximum depth
    #[error("Nesting too deep: {actual} levels exceeds maximum {max}")]
    NestingTooDeep {
        /// Actual nesting depth
        actual: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// Text payload exceeds maximum length
    #[error("Text too long: {actual} bytes exceeds maximum {max}")]
    TextTooLong {
        /// Actual length in bytes
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Element count exceeds maximum
    #[error("Count too large: {actual} exceeds maximum {max}")]
    CountTooLarge {
        /// Actual count
        actual: usize,
        /// Maximum allowed count
        max: usize,
    },
}
