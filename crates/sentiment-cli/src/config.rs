//! Host configuration loaded from TOML
//!
//! ```toml
//! workers = 4
//!
//! [processor]
//! sentence = "${tweet}"
//!
//! [corenlp]
//! url = "http://localhost:9000"
//! timeout_secs = 30
//! ```

use anyhow::{bail, Context};
use sentiment_core::ProcessorConfig;
use sentiment_corenlp::CoreNlpConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the `sentiment-flow` host needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Units processed concurrently
    pub workers: usize,
    pub processor: ProcessorConfig,
    pub corenlp: CoreNlpConfig,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().map_or(4, usize::from),
            processor: ProcessorConfig::default(),
            corenlp: CoreNlpConfig::default(),
        }
    }
}

impl FlowConfig {
    /// Parse from TOML text
    ///
    /// # Errors
    /// - TOML syntax or type errors
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text).context("invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// - The file cannot be read or does not parse
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("loading config {}", path.display()))
    }

    /// Validate all sections
    ///
    /// # Errors
    /// - The first invalid setting found
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workers == 0 {
            bail!("workers must be positive");
        }
        self.processor.validate()?;
        self.corenlp.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn full_file_parses() {
        let config = FlowConfig::from_toml_str(
            r#"
            workers = 2

            [processor]
            sentence = "${tweet}"

            [corenlp]
            url = "http://nlp.internal:9000"
            timeout_secs = 15
            "#,
        )
        .unwrap();

        assert_eq!(config.workers, 2);
        assert_eq!(config.processor.sentence.as_deref(), Some("${tweet}"));
        assert_eq!(config.corenlp.url, "http://nlp.internal:9000");
        assert_eq!(config.corenlp.timeout_secs, 15);
        assert_eq!(config.corenlp.threads, 8);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = FlowConfig::from_toml_str("").unwrap();
        assert!(config.workers > 0);
        assert_eq!(config.processor, ProcessorConfig::default());
        assert_eq!(config.corenlp, CoreNlpConfig::default());
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(FlowConfig::from_toml_str("workers = 0").is_err());
        assert!(FlowConfig::from_toml_str("[processor]\nsentence = \"\"").is_err());
        assert!(FlowConfig::from_toml_str("[corenlp]\nurl = \"\"").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers = 3").unwrap();

        let config = FlowConfig::load(file.path()).unwrap();
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FlowConfig::load(&dir.path().join("absent.toml")).is_err());
    }
}
