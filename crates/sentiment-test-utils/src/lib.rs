//! Testing utilities for the sentiment workspace
//!
//! Shared pipelines, recorded annotations and unit builders.

#![allow(missing_docs)]

use parking_lot::Mutex;
use sentiment_core::{
    AnnotationGraph, AnnotationPipeline, ChainMention, CorefChain, Mention, PipelineError,
    ProcessorConfig, SentenceAnnotation, SentimentProcessor, SentimentService, SentimentTree,
    Token, WorkUnit, SENTENCE_ATTRIBUTE,
};
use std::sync::Arc;

pub const OBAMA_TEXT: &str = "Obama was elected in 2008.";

/// Annotation CoreNLP produces for [`OBAMA_TEXT`]
pub fn obama_graph() -> AnnotationGraph {
    AnnotationGraph::new()
        .with_chain(CorefChain::new(1, vec![ChainMention::new("Obama", 1)]))
        .with_chain(CorefChain::new(3, vec![ChainMention::new("2008", 1)]))
        .with_sentence(
            SentenceAnnotation::new(vec![
                Token::new("Obama", "NNP", "PERSON"),
                Token::new("was", "VBD", "O"),
                Token::new("elected", "VBN", "O"),
                Token::new("in", "IN", "O"),
                Token::new("2008", "CD", "DATE"),
                Token::new(".", ".", "O"),
            ])
            .with_mentions(vec![Mention::new(["Obama"]), Mention::new(["2008"])])
            .with_sentiment(SentimentTree::new(vec![0.06, 0.25, 0.55, 0.12, 0.02])),
        )
}

/// Splits on periods and whitespace; neutral sentiment, no coreference
pub fn whitespace_graph(text: &str) -> AnnotationGraph {
    text.split_terminator('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .fold(AnnotationGraph::new(), |graph, sentence| {
            let tokens = sentence
                .split_whitespace()
                .map(|w| Token::new(w, "NN", "O"))
                .collect();
            graph.with_sentence(
                SentenceAnnotation::new(tokens)
                    .with_sentiment(SentimentTree::new(vec![0.0, 0.0, 1.0, 0.0, 0.0])),
            )
        })
}

type Script = dyn Fn(&str) -> Result<Option<AnnotationGraph>, PipelineError> + Send + Sync;

/// Pipeline driven by a closure; records every text it receives
pub struct ScriptedPipeline {
    script: Box<Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedPipeline {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&str) -> Result<Option<AnnotationGraph>, PipelineError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `graph`
    pub fn returning(graph: AnnotationGraph) -> Self {
        Self::new(move |_| Ok(Some(graph.clone())))
    }

    /// Annotates with [`whitespace_graph`]
    pub fn whitespace() -> Self {
        Self::new(|text| Ok(Some(whitespace_graph(text))))
    }

    /// Always fails with an annotation error
    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_| Err(PipelineError::Annotation(message.clone())))
    }

    /// Texts received so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl AnnotationPipeline for ScriptedPipeline {
    fn annotate(&self, text: &str) -> Result<Option<AnnotationGraph>, PipelineError> {
        self.calls.lock().push(text.to_string());
        (self.script)(text)
    }
}

pub fn unit_with_sentence(text: &str) -> WorkUnit {
    WorkUnit::new().with_attribute(SENTENCE_ATTRIBUTE, text)
}

/// Processor over a shared pipeline, so tests can inspect the pipeline later
pub fn setup_processor(
    config: ProcessorConfig,
    pipeline: Arc<ScriptedPipeline>,
) -> SentimentProcessor {
    SentimentProcessor::new(config, SentimentService::new(pipeline)).unwrap()
}
