//! Sentiment processor
//!
//! Drives one invocation per trigger:
//! 1. Take a unit from the session
//! 2. Resolve the input text
//! 3. Annotate, assemble and serialize through the service
//! 4. Write result attributes and route to success, or route to failure
//!
//! Failures that belong to the unit are routed; anything else is returned
//! to the host, which rolls the session back.

use crate::error::{ConfigError, ProcessError, ResolveError};
use crate::resolver::AttributeResolver;
use crate::service::{Analysis, SentimentService};
use crate::session::ProcessSession;
use crate::state_machine::{Invocation, InvocationState};
use crate::types::{
    ProcessorConfig, PropertyDescriptor, Relationship, WorkUnit, JSON_MIME_TYPE,
    MIME_TYPE_ATTRIBUTE, SENTENCE_PROPERTY, SENTIMENT_ATTRIBUTE,
};

/// Tags advertised to the host
pub const TAGS: &[&str] = &["corenlp", "sentiment", "nlp"];

/// Capability description advertised to the host
pub const CAPABILITY_DESCRIPTION: &str = "Run Stanford CoreNLP Sentiment Analysis";

/// Result of one trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Route taken
    pub relationship: Relationship,
    /// States visited
    pub states: Vec<InvocationState>,
}

/// The invocation controller
#[derive(Debug, Clone)]
pub struct SentimentProcessor {
    resolver: AttributeResolver,
    service: SentimentService,
}

impl SentimentProcessor {
    /// Create a processor from validated configuration
    ///
    /// # Errors
    /// - `ConfigError` if the configuration is invalid
    pub fn new(config: ProcessorConfig, service: SentimentService) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            resolver: AttributeResolver::new(config.sentence),
            service,
        })
    }

    /// Properties the processor supports
    #[must_use]
    pub fn properties(&self) -> Vec<PropertyDescriptor> {
        vec![SENTENCE_PROPERTY]
    }

    /// Relationships the processor routes to
    #[must_use]
    pub fn relationships(&self) -> &'static [Relationship] {
        &Relationship::ALL
    }

    /// Process one unit from `session`
    ///
    /// Exactly one transfer happens when this returns `Ok`.
    ///
    /// # Errors
    /// - `ProcessError` if the session or state machine fails; the host
    ///   must roll back
    pub fn on_trigger<S: ProcessSession>(&self, session: &mut S) -> Result<Outcome, ProcessError> {
        let unit = session.get().unwrap_or_else(|| {
            tracing::error!("Got empty work unit");
            session.create()
        });
        let unit_id = unit.id;

        let mut invocation = Invocation::new();
        match self.run(session, unit, &mut invocation) {
            Ok(relationship) => {
                tracing::info!(unit = %unit_id, route = %relationship, "work unit routed");
                Ok(Outcome {
                    relationship,
                    states: invocation.history().to_vec(),
                })
            }
            Err(e) => {
                tracing::error!(
                    unit = %unit_id,
                    state = ?invocation.state(),
                    "Unable to process work unit, rolling back: {}",
                    e
                );
                Err(e)
            }
        }
    }

    fn run<S: ProcessSession>(
        &self,
        session: &mut S,
        unit: WorkUnit,
        invocation: &mut Invocation,
    ) -> Result<Relationship, ProcessError> {
        let text = match self.resolver.resolve(&unit) {
            Ok(text) => text,
            Err(ResolveError::MissingInput { .. }) => {
                tracing::error!(unit = %unit.id, "Unable to process empty sentence");
                return self.fail(session, unit, invocation);
            }
        };
        invocation.advance(InvocationState::InputResolved)?;

        let analysis = match self.service.analyze(&text) {
            Ok(analysis) => {
                invocation.advance(InvocationState::Annotated)?;
                analysis
            }
            Err(e) => {
                invocation.advance(InvocationState::ErrorResult)?;
                tracing::error!(
                    unit = %unit.id,
                    retryable = e.is_retryable(),
                    "Unable to process sentence due to pipeline error: {}",
                    e
                );
                return self.fail(session, unit, invocation);
            }
        };

        let Some(payload) = analysis.payload() else {
            tracing::error!(unit = %unit.id, "Pipeline produced no annotation");
            return self.fail(session, unit, invocation);
        };
        if matches!(analysis, Analysis::Empty) {
            tracing::debug!(unit = %unit.id, "empty input, nothing to annotate");
        }

        let unit = session.put_attribute(unit, MIME_TYPE_ATTRIBUTE, JSON_MIME_TYPE)?;
        let unit = session.put_attribute(unit, SENTIMENT_ATTRIBUTE, payload)?;
        invocation.advance(InvocationState::Success)?;
        session.transfer(unit, Relationship::Success)?;
        Ok(Relationship::Success)
    }

    fn fail<S: ProcessSession>(
        &self,
        session: &mut S,
        unit: WorkUnit,
        invocation: &mut Invocation,
    ) -> Result<Relationship, ProcessError> {
        invocation.advance(InvocationState::Failure)?;
        session.transfer(unit, Relationship::Failure)?;
        Ok(Relationship::Failure)
    }
}
