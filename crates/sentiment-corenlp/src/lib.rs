//! CoreNLP server backend
//!
//! Implements [`sentiment_core::AnnotationPipeline`] by posting text to a
//! Stanford CoreNLP server and converting its JSON document into an
//! [`sentiment_core::AnnotationGraph`].

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::CoreNlpServerPipeline;
pub use config::{CoreNlpConfig, DEFAULT_ANNOTATORS};
pub use error::CoreNlpError;
