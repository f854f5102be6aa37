//! Flattens an annotation graph into a result tree

use crate::annotation::{AnnotationGraph, SentenceAnnotation};
use crate::error::PipelineError;
use crate::result::{ResultTree, Sentence, Word};

/// Allowed deviation of a sentiment distribution from 1.0 before warning
const MASS_TOLERANCE: f64 = 1e-3;

/// Walks an [`AnnotationGraph`] and builds a [`ResultTree`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAssembler;

impl ResultAssembler {
    /// Create new assembler
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the tree for `graph`
    ///
    /// Chains come out in the graph's iteration order. Sentences, words,
    /// mentions and class probabilities keep document order.
    ///
    /// # Errors
    /// - `PipelineError::Traversal` if a sentence carries no sentiment tree
    pub fn assemble(&self, graph: &AnnotationGraph) -> Result<ResultTree, PipelineError> {
        let mut tree = ResultTree::new();

        for chain in graph.coref_chains.values() {
            tree.coref_chains.push(chain.to_string());
        }

        for (index, annotation) in graph.sentences.iter().enumerate() {
            tree.sentences.push(self.assemble_sentence(index, annotation)?);
        }

        tracing::debug!(
            sentences = tree.sentences.len(),
            chains = tree.coref_chains.len(),
            words = tree.word_count(),
            "assembled result tree"
        );
        Ok(tree)
    }

    fn assemble_sentence(
        &self,
        index: usize,
        annotation: &SentenceAnnotation,
    ) -> Result<Sentence, PipelineError> {
        let mut sentence = Sentence::new();

        sentence.mentions = annotation.mentions.iter().map(ToString::to_string).collect();

        sentence.words = annotation
            .tokens
            .iter()
            .map(|token| Word {
                text: token.text.clone(),
                pos: token.pos.clone(),
                ne: token.ner.clone(),
                role: token.role.clone(),
            })
            .collect();

        let tree = annotation
            .sentiment
            .as_ref()
            .ok_or_else(|| PipelineError::Traversal {
                sentence: index,
                reason: "no sentiment tree".to_string(),
            })?;
        sentence.sentiment_probs.extend_from_slice(&tree.predictions);

        let mass = sentence.probability_mass();
        if (mass - 1.0).abs() > MASS_TOLERANCE {
            tracing::warn!(sentence = index, mass, "sentiment distribution does not sum to 1");
        }

        Ok(sentence)
    }
}
