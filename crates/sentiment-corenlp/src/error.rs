//! Backend construction errors

/// Errors raised while building a CoreNLP backend
#[derive(Debug, thiserror::Error)]
pub enum CoreNlpError {
    /// Invalid configuration
    #[error("Invalid CoreNLP configuration: {0}")]
    Config(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
