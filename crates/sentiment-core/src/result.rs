//! Result tree produced for one invocation
//!
//! Field names follow the published JSON shape (`sentimentProbs`,
//! `corefChains`, `ne`).

use serde::{Deserialize, Serialize};

/// One token in the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Surface text
    pub text: String,
    /// Part-of-speech tag
    pub pos: String,
    /// Named-entity tag
    pub ne: String,
    /// Semantic role; always serialized, `null` when absent
    pub role: Option<String>,
}

/// One sentence in the output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    /// Tokens in document order
    pub words: Vec<Word>,
    /// Class probabilities, very negative first
    pub sentiment_probs: Vec<f64>,
    /// Coreference mentions anchored to the sentence
    pub mentions: Vec<String>,
}

impl Sentence {
    /// Create an empty sentence
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the class probabilities
    #[must_use]
    pub fn probability_mass(&self) -> f64 {
        self.sentiment_probs.iter().sum()
    }
}

/// Flattened annotation of one text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultTree {
    /// Sentences in document order
    pub sentences: Vec<Sentence>,
    /// Canonical chain strings; order is unspecified
    pub coref_chains: Vec<String>,
}

impl ResultTree {
    /// Create an empty tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of words across sentences
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.sentences.iter().map(|s| s.words.len()).sum()
    }
}
