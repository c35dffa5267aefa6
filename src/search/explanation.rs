//! Score explanations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A tree describing how a document's score was derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// The value this node contributes.
    pub value: f32,
    /// What the value is.
    pub description: String,
    /// Whether the document matched at this node.
    pub is_match: bool,
    /// Sub-explanations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Explanation>,
}

impl Explanation {
    /// Create an explanation that matches when `value > 0`.
    pub fn new<S: Into<String>>(value: f32, description: S) -> Self {
        Explanation {
            value,
            description: description.into(),
            is_match: value > 0.0,
            details: Vec::new(),
        }
    }

    /// Create an explanation with an explicit match flag.
    pub fn with_match<S: Into<String>>(is_match: bool, value: f32, description: S) -> Self {
        Explanation {
            value,
            description: description.into(),
            is_match,
            details: Vec::new(),
        }
    }

    /// Create a non-matching explanation.
    pub fn no_match<S: Into<String>>(description: S) -> Self {
        Explanation::with_match(false, 0.0, description)
    }

    /// Append a sub-explanation.
    pub fn add_detail(&mut self, detail: Explanation) {
        self.details.push(detail);
    }

    /// Builder form of [`Self::add_detail`].
    pub fn detail(mut self, detail: Explanation) -> Self {
        self.add_detail(detail);
        self
    }

    /// Serialize the tree as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(
            f,
            "{:indent$}{} = {}",
            "",
            self.value,
            self.description,
            indent = depth * 2
        )?;
        for detail in &self.details {
            detail.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
