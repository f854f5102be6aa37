//! Blocking client for a running CoreNLP server

use crate::config::CoreNlpConfig;
use crate::error::CoreNlpError;
use crate::wire;
use sentiment_core::{AnnotationGraph, AnnotationPipeline, PipelineError};
use std::time::Duration;

/// Annotation pipeline backed by the CoreNLP HTTP server
#[derive(Debug, Clone)]
pub struct CoreNlpServerPipeline {
    client: reqwest::blocking::Client,
    config: CoreNlpConfig,
    properties: String,
}

impl CoreNlpServerPipeline {
    /// Build the backend; the HTTP client is created once and reused
    ///
    /// # Errors
    /// - `CoreNlpError::Config` for invalid settings
    /// - `CoreNlpError::Client` if the HTTP client cannot be built
    pub fn new(config: CoreNlpConfig) -> Result<Self, CoreNlpError> {
        config.validate()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            properties: config.properties(),
            config,
        })
    }
}

impl AnnotationPipeline for CoreNlpServerPipeline {
    fn annotate(&self, text: &str) -> Result<Option<AnnotationGraph>, PipelineError> {
        tracing::debug!(url = %self.config.url, chars = text.len(), "requesting annotation");

        let response = self
            .client
            .post(&self.config.url)
            .query(&[("properties", self.properties.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(text.to_string())
            .send()
            .map_err(|e| PipelineError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| PipelineError::Transport(e.to_string()))?;

        if status.is_server_error() {
            return Err(PipelineError::Transport(format!(
                "CoreNLP server returned {status}: {}",
                body.trim()
            )));
        }
        if !status.is_success() {
            return Err(PipelineError::Annotation(format!(
                "CoreNLP server rejected request with {status}: {}",
                body.trim()
            )));
        }

        match wire::parse_body(&body)? {
            Some(document) => document.into_graph().map(Some),
            None => {
                tracing::warn!(url = %self.config.url, "CoreNLP returned an empty document");
                Ok(None)
            }
        }
    }
}
