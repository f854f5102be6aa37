//! Sentiment Core - annotation flattening and outcome routing
//!
//! Takes a unit of text through an external NLP capability and routes it:
//! - Resolves the input text from the unit or a templated property
//! - Flattens the annotation graph into a serializable result tree
//! - Renders the tree as a `{"output": ...}` JSON envelope
//! - Writes result attributes and routes to `success` or `failure`
//!
//! # Example
//!
//! ```rust,ignore
//! use sentiment_core::{InMemorySession, ProcessorConfig, SentimentProcessor, SentimentService};
//! use std::sync::Arc;
//!
//! let service = SentimentService::new(Arc::new(my_pipeline));
//! let processor = SentimentProcessor::new(ProcessorConfig::new(), service)?;
//!
//! let mut session = InMemorySession::with_units(units);
//! let outcome = processor.on_trigger(&mut session)?;
//! session.commit();
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod annotation;
pub mod assembler;
pub mod error;
pub mod processor;
pub mod resolver;
pub mod result;
pub mod serializer;
pub mod service;
pub mod session;
pub mod state_machine;
pub mod types;

// Re-exports for convenience
pub use annotation::{
    AnnotationGraph, AnnotationPipeline, ChainMention, CorefChain, Mention, SentenceAnnotation,
    SentimentTree, Token,
};
pub use assembler::ResultAssembler;
pub use error::{
    ConfigError, PipelineError, ProcessError, ResolveError, SessionError, StateMachineError,
};
pub use processor::{Outcome, SentimentProcessor};
pub use resolver::AttributeResolver;
pub use result::{ResultTree, Sentence, Word};
pub use serializer::{Envelope, Serializer};
pub use service::{Analysis, SentimentService};
pub use session::{InMemorySession, ProcessSession, Transfer};
pub use state_machine::{Invocation, InvocationState};
pub use types::{
    ProcessorConfig, PropertyDescriptor, Relationship, UnitId, WorkUnit, JSON_MIME_TYPE,
    MIME_TYPE_ATTRIBUTE, SENTENCE_ATTRIBUTE, SENTIMENT_ATTRIBUTE,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Sentiment Core
    pub use crate::{
        AnnotationGraph, AnnotationPipeline, InMemorySession, ProcessSession, ProcessorConfig,
        Relationship, SentimentProcessor, SentimentService, WorkUnit,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
