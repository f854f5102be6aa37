//! Input text resolution
//!
//! The `sentence` attribute wins; otherwise the configured property is
//! expanded against the unit's attributes.

use crate::error::ResolveError;
use crate::types::{WorkUnit, SENTENCE_ATTRIBUTE};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ATTRIBUTE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{\s*([^}\s]+)\s*\}").expect("attribute reference pattern is valid")
});

/// Determines the text to analyze for one unit
#[derive(Debug, Clone, Default)]
pub struct AttributeResolver {
    property: Option<String>,
}

impl AttributeResolver {
    /// Create a resolver for the configured property value
    #[inline]
    #[must_use]
    pub fn new(property: Option<String>) -> Self {
        Self { property }
    }

    /// Resolve the input text for `unit`
    ///
    /// A present attribute wins even when empty; the property counts only
    /// when it expands to non-empty text.
    ///
    /// # Errors
    /// - `ResolveError::MissingInput` if neither source yields text
    pub fn resolve(&self, unit: &WorkUnit) -> Result<String, ResolveError> {
        if let Some(text) = unit.attribute(SENTENCE_ATTRIBUTE) {
            return Ok(text.to_string());
        }

        self.property
            .as_deref()
            .map(|template| expand(template, unit))
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ResolveError::MissingInput {
                attribute: SENTENCE_ATTRIBUTE.to_string(),
            })
    }
}

/// Replace `${name}` references with attribute values; unknown names expand
/// to the empty string.
#[must_use]
pub fn expand(template: &str, unit: &WorkUnit) -> String {
    ATTRIBUTE_REFERENCE
        .replace_all(template, |caps: &Captures<'_>| {
            unit.attribute(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}
