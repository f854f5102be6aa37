//! Core types for the sentiment processor
//!
//! Defines:
//! - Work units and their identifiers
//! - Outcome relationships
//! - Processor configuration and property metadata

use crate::error::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Attribute holding the text to analyze
pub const SENTENCE_ATTRIBUTE: &str = "sentence";
/// Attribute receiving the JSON result
pub const SENTIMENT_ATTRIBUTE: &str = "sentiment";
/// Content-type attribute
pub const MIME_TYPE_ATTRIBUTE: &str = "mime.type";
/// Content type of the result
pub const JSON_MIME_TYPE: &str = "application/json";

/// Unique work unit identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Ulid);

impl UnitId {
    /// Generate new unit ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Item of data flowing through the host: attributes plus content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkUnit {
    /// Identifier
    #[serde(default)]
    pub id: UnitId,
    /// Key-value metadata, insertion ordered
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    /// Opaque payload
    #[serde(default)]
    pub content: String,
}

impl WorkUnit {
    /// Create an empty unit
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: UnitId::new(),
            attributes: IndexMap::new(),
            content: String::new(),
        }
    }

    /// With attribute
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// With content
    #[inline]
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Attribute value
    #[inline]
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl Default for WorkUnit {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome a unit is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    /// Sentiment determined
    Success,
    /// Sentiment could not be determined
    Failure,
}

impl Relationship {
    /// All relationships the processor routes to
    pub const ALL: [Relationship; 2] = [Relationship::Success, Relationship::Failure];

    /// Route name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Relationship::Success => "success",
            Relationship::Failure => "failure",
        }
    }

    /// Human-readable description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Relationship::Success => "Successfully determine sentiment.",
            Relationship::Failure => "Failed to determine sentiment.",
        }
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Describes a configurable property to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    /// Property name
    pub name: &'static str,
    /// Description shown to operators
    pub description: &'static str,
    /// Whether the host must supply a value
    pub required: bool,
    /// Whether `${attribute}` references are expanded
    pub supports_templating: bool,
}

/// The `sentence` property
pub const SENTENCE_PROPERTY: PropertyDescriptor = PropertyDescriptor {
    name: SENTENCE_ATTRIBUTE,
    description: "A sentence to parse, such as a Tweet.",
    required: false,
    supports_templating: true,
};

/// Processor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Text to analyze when the unit has no `sentence` attribute; may
    /// reference unit attributes as `${name}`
    #[serde(default)]
    pub sentence: Option<String>,
}

impl ProcessorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With sentence property
    #[inline]
    #[must_use]
    pub fn with_sentence(mut self, sentence: impl Into<String>) -> Self {
        self.sentence = Some(sentence.into());
        self
    }

    /// Check property values
    ///
    /// # Errors
    /// - `ConfigError::EmptyProperty` if `sentence` is set to an empty value
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.sentence {
            Some(value) if value.trim().is_empty() => {
                Err(ConfigError::EmptyProperty(SENTENCE_PROPERTY.name.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_names() {
        assert_eq!(Relationship::Success.name(), "success");
        assert_eq!(Relationship::Failure.to_string(), "failure");
        assert_eq!(
            serde_json::to_string(&Relationship::Failure).unwrap(),
            "\"failure\""
        );
    }

    #[test]
    fn work_unit_attributes() {
        let unit = WorkUnit::new()
            .with_attribute(SENTENCE_ATTRIBUTE, "Hello")
            .with_content("payload");
        assert_eq!(unit.attribute(SENTENCE_ATTRIBUTE), Some("Hello"));
        assert_eq!(unit.attribute(SENTIMENT_ATTRIBUTE), None);
        assert_eq!(unit.content, "payload");
    }

    #[test]
    fn work_unit_deserializes_without_id() {
        let unit: WorkUnit =
            serde_json::from_str(r#"{"attributes": {"sentence": "Hi"}}"#).unwrap();
        assert_eq!(unit.attribute("sentence"), Some("Hi"));
        assert!(unit.content.is_empty());
    }

    #[test]
    fn config_validation() {
        assert!(ProcessorConfig::new().validate().is_ok());
        assert!(ProcessorConfig::new().with_sentence("${tweet}").validate().is_ok());
        assert_eq!(
            ProcessorConfig::new().with_sentence("  ").validate(),
            Err(ConfigError::EmptyProperty("sentence".into()))
        );
    }
}
