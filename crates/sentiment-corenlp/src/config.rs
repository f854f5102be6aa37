//! CoreNLP server connection settings

use crate::error::CoreNlpError;
use serde::{Deserialize, Serialize};

/// Annotators required for sentiment, mentions and coreference
pub const DEFAULT_ANNOTATORS: &str =
    "tokenize, ssplit, parse, lemma, ner, mention, relation, coref, sentiment";

/// Where the server lives and how it should annotate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreNlpConfig {
    /// Server endpoint
    pub url: String,
    /// Comma-separated annotator list
    pub annotators: String,
    /// Server-side annotation threads
    pub threads: u32,
    /// Whole-request timeout
    pub timeout_secs: u64,
}

impl Default for CoreNlpConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9000".to_string(),
            annotators: DEFAULT_ANNOTATORS.to_string(),
            threads: 8,
            timeout_secs: 60,
        }
    }
}

impl CoreNlpConfig {
    /// Create default config
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set server endpoint
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set annotator list
    #[must_use]
    pub fn with_annotators(mut self, annotators: impl Into<String>) -> Self {
        self.annotators = annotators.into();
        self
    }

    /// Set request timeout
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Validate configuration
    ///
    /// # Errors
    /// - `CoreNlpError::Config` naming the offending field
    pub fn validate(&self) -> Result<(), CoreNlpError> {
        if self.url.trim().is_empty() {
            return Err(CoreNlpError::Config("url must not be empty".into()));
        }
        if self.annotators.trim().is_empty() {
            return Err(CoreNlpError::Config("annotators must not be empty".into()));
        }
        if self.threads == 0 {
            return Err(CoreNlpError::Config("threads must be positive".into()));
        }
        if self.timeout_secs == 0 {
            return Err(CoreNlpError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// The `properties` query value sent with every request
    #[must_use]
    pub fn properties(&self) -> String {
        serde_json::json!({
            "annotators": self.annotators,
            "outputFormat": "json",
            "threads": self.threads.to_string(),
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: CoreNlpConfig =
            serde_json::from_str(r#"{"url": "http://nlp:9000"}"#).unwrap();
        assert_eq!(config.url, "http://nlp:9000");
        assert_eq!(config.annotators, DEFAULT_ANNOTATORS);
        assert_eq!(config.threads, 8);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn properties_request_json_output() {
        let props: serde_json::Value =
            serde_json::from_str(&CoreNlpConfig::new().properties()).unwrap();
        assert_eq!(props["outputFormat"], "json");
        assert_eq!(props["threads"], "8");
        assert!(props["annotators"].as_str().unwrap().ends_with("sentiment"));
    }

    #[test]
    fn validation() {
        assert!(CoreNlpConfig::new().validate().is_ok());
        assert!(CoreNlpConfig::new().with_url(" ").validate().is_err());
        assert!(CoreNlpConfig::new().with_annotators("").validate().is_err());
        assert!(CoreNlpConfig::new().with_timeout_secs(0).validate().is_err());
    }
}
