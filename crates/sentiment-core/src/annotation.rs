//! Annotation graph consumed from the NLP capability
//!
//! The capability itself is external. Adapters translate whatever the
//! capability returns into these types, which the assembler then walks.

use crate::error::PipelineError;
use std::collections::HashMap;
use std::fmt;

/// Black-box annotation capability
///
/// Constructed once at startup and shared across invocation threads.
/// Implementations may fan out internally; callers see one blocking call.
#[cfg_attr(test, mockall::automock)]
pub trait AnnotationPipeline: Send + Sync {
    /// Annotate `text`
    ///
    /// `Ok(None)` means the capability completed without producing an
    /// annotation for the text.
    fn annotate(&self, text: &str) -> Result<Option<AnnotationGraph>, PipelineError>;
}

/// Full annotation of one text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationGraph {
    /// Coreference chains keyed by chain id; iteration order is unspecified
    pub coref_chains: HashMap<u32, CorefChain>,
    /// Sentences in document order
    pub sentences: Vec<SentenceAnnotation>,
}

impl AnnotationGraph {
    /// Create an empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chain, replacing any chain with the same id
    #[must_use]
    pub fn with_chain(mut self, chain: CorefChain) -> Self {
        self.coref_chains.insert(chain.id, chain);
        self
    }

    /// Append a sentence
    #[must_use]
    pub fn with_sentence(mut self, sentence: SentenceAnnotation) -> Self {
        self.sentences.push(sentence);
        self
    }
}

/// One sentence of the annotation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentenceAnnotation {
    /// Tokens in document order
    pub tokens: Vec<Token>,
    /// Coreference mentions anchored to this sentence
    pub mentions: Vec<Mention>,
    /// Sentiment tree; absent when the sentiment annotator did not run
    pub sentiment: Option<SentimentTree>,
}

impl SentenceAnnotation {
    /// Create a sentence from its tokens
    #[inline]
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            mentions: Vec::new(),
            sentiment: None,
        }
    }

    /// With anchored mentions
    #[inline]
    #[must_use]
    pub fn with_mentions(mut self, mentions: Vec<Mention>) -> Self {
        self.mentions = mentions;
        self
    }

    /// With sentiment predictions
    #[inline]
    #[must_use]
    pub fn with_sentiment(mut self, sentiment: SentimentTree) -> Self {
        self.sentiment = Some(sentiment);
        self
    }
}

/// A token and its tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface text
    pub text: String,
    /// Part-of-speech tag
    pub pos: String,
    /// Named-entity tag
    pub ner: String,
    /// Semantic role label
    pub role: Option<String>,
}

impl Token {
    /// Create a token without a role label
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, pos: impl Into<String>, ner: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: pos.into(),
            ner: ner.into(),
            role: None,
        }
    }

    /// With role label
    #[inline]
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Root of a sentence's sentiment parse
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentTree {
    /// Class probabilities, very negative first
    pub predictions: Vec<f64>,
}

impl SentimentTree {
    /// Create from per-class probabilities
    #[inline]
    #[must_use]
    pub fn new(predictions: Vec<f64>) -> Self {
        Self { predictions }
    }

    /// Number of sentiment classes
    #[inline]
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.predictions.len()
    }
}

/// A mention anchored in a sentence; renders as its span text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    /// Span words
    pub words: Vec<String>,
}

impl Mention {
    /// Create from the span's words
    #[must_use]
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Mention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words.join(" "))
    }
}

/// A mention as it appears inside a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainMention {
    /// Span text
    pub text: String,
    /// One-based sentence number
    pub sentence: usize,
}

impl ChainMention {
    /// Create a chain mention
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, sentence: usize) -> Self {
        Self {
            text: text.into(),
            sentence,
        }
    }
}

impl fmt::Display for ChainMention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" in sentence {}", self.text, self.sentence)
    }
}

/// Mentions judged to refer to the same entity
///
/// Renders as `CHAIN<id>-["<text>" in sentence <n>, ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorefChain {
    /// Chain id assigned by the capability
    pub id: u32,
    /// Mentions in textual order
    pub mentions: Vec<ChainMention>,
}

impl CorefChain {
    /// Create a chain
    #[inline]
    #[must_use]
    pub fn new(id: u32, mentions: Vec<ChainMention>) -> Self {
        Self { id, mentions }
    }
}

impl fmt::Display for CorefChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CHAIN{}-[", self.id)?;
        for (i, mention) in self.mentions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{mention}")?;
        }
        f.write_str("]")
    }
}
