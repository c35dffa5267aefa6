//! Configuration for boolean query execution.

use serde::{Deserialize, Serialize};

use crate::error::{QuorumError, Result};

/// Configuration shared by [`BooleanScorer`](crate::search::boolean::BooleanScorer)
/// and [`BooleanWeight`](crate::search::weight::BooleanWeight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooleanConfig {
    /// Maximum number of clauses to allow in a boolean query.
    pub max_clause_count: usize,

    /// Minimum number of SHOULD clauses that must match a document.
    pub minimum_should_match: usize,
}

impl Default for BooleanConfig {
    fn default() -> Self {
        BooleanConfig {
            max_clause_count: 1024,
            minimum_should_match: 0,
        }
    }
}

impl BooleanConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BooleanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the minimum number of SHOULD clauses that must match.
    pub fn with_minimum_should_match(mut self, minimum: usize) -> Self {
        self.minimum_should_match = minimum;
        self
    }

    /// Set the maximum clause count.
    pub fn with_max_clause_count(mut self, max: usize) -> Self {
        self.max_clause_count = max;
        self
    }

    /// Check that the configuration can be used to build a query.
    pub fn validate(&self) -> Result<()> {
        if self.max_clause_count == 0 {
            return Err(QuorumError::invalid_argument(
                "max_clause_count must be at least 1",
            ));
        }
        Ok(())
    }
}
