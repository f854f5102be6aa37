//! JSON envelope rendering

use crate::error::PipelineError;
use crate::result::ResultTree;
use serde::{Deserialize, Serialize};

/// Wire form of a result: `{"output": <tree>}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Wrapped result
    pub output: T,
}

impl<T> Envelope<T> {
    /// Wrap a value
    #[inline]
    #[must_use]
    pub fn new(output: T) -> Self {
        Self { output }
    }
}

/// Renders result trees as pretty-printed envelopes
///
/// Non-ASCII and HTML-significant characters are written as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer;

impl Serializer {
    /// Create new serializer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render `tree` inside an [`Envelope`]
    ///
    /// # Errors
    /// - `PipelineError::Traversal` if a probability is NaN or infinite
    /// - `PipelineError::Serialization` if rendering fails
    pub fn serialize(&self, tree: &ResultTree) -> Result<String, PipelineError> {
        if let Some(index) = tree
            .sentences
            .iter()
            .position(|s| s.sentiment_probs.iter().any(|p| !p.is_finite()))
        {
            return Err(PipelineError::Traversal {
                sentence: index,
                reason: "non-finite sentiment probability".to_string(),
            });
        }
        Ok(serde_json::to_string_pretty(&Envelope::new(tree))?)
    }
}
