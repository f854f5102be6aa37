//! Sentiment service: annotate, assemble and serialize as one unit

use crate::annotation::AnnotationPipeline;
use crate::assembler::ResultAssembler;
use crate::error::PipelineError;
use crate::serializer::Serializer;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Value produced for one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    /// Input was empty; the pipeline was not consulted
    Empty,
    /// Pretty-printed `{"output": ...}` document
    Json(String),
    /// The pipeline finished without producing an annotation
    Unavailable,
}

impl Analysis {
    /// Attribute payload, if any
    ///
    /// `Empty` yields the empty string; `Unavailable` yields nothing.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Empty => Some(""),
            Self::Json(json) => Some(json),
            Self::Unavailable => None,
        }
    }
}

/// Runs text through the annotation pipeline and renders the result
///
/// Every failure inside the unit, panics from the pipeline included, comes
/// back as `Err`; callers decide on the variant.
#[derive(Clone)]
pub struct SentimentService {
    pipeline: Arc<dyn AnnotationPipeline>,
    assembler: ResultAssembler,
    serializer: Serializer,
}

impl SentimentService {
    /// Create a service around a shared pipeline
    #[must_use]
    pub fn new(pipeline: Arc<dyn AnnotationPipeline>) -> Self {
        Self {
            pipeline,
            assembler: ResultAssembler::new(),
            serializer: Serializer::new(),
        }
    }

    /// Analyze `text`
    ///
    /// # Errors
    /// - Any `PipelineError` raised while annotating, assembling or serializing
    pub fn analyze(&self, text: &str) -> Result<Analysis, PipelineError> {
        if text.is_empty() {
            return Ok(Analysis::Empty);
        }

        let annotated = panic::catch_unwind(AssertUnwindSafe(|| self.pipeline.annotate(text)))
            .map_err(|payload| PipelineError::Panicked(panic_message(payload.as_ref())))?;

        let Some(graph) = annotated? else {
            return Ok(Analysis::Unavailable);
        };

        let tree = self.assembler.assemble(&graph)?;
        let json = self.serializer.serialize(&tree)?;
        Ok(Analysis::Json(json))
    }
}

impl std::fmt::Debug for SentimentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentService").finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{
        AnnotationGraph, ChainMention, CorefChain, MockAnnotationPipeline, SentenceAnnotation,
        SentimentTree, Token,
    };
    use serde_json::Value;

    fn service(mock: MockAnnotationPipeline) -> SentimentService {
        SentimentService::new(Arc::new(mock))
    }

    fn one_sentence_graph() -> AnnotationGraph {
        AnnotationGraph::new()
            .with_chain(CorefChain::new(1, vec![ChainMention::new("it", 1)]))
            .with_sentence(
                SentenceAnnotation::new(vec![Token::new("it", "PRP", "O")])
                    .with_sentiment(SentimentTree::new(vec![0.1, 0.1, 0.6, 0.1, 0.1])),
            )
    }

    #[test]
    fn empty_text_skips_pipeline() {
        let mut mock = MockAnnotationPipeline::new();
        mock.expect_annotate().never();

        let analysis = service(mock).analyze("").unwrap();
        assert_eq!(analysis, Analysis::Empty);
        assert_eq!(analysis.payload(), Some(""));
    }

    #[test]
    fn text_yields_envelope() {
        let mut mock = MockAnnotationPipeline::new();
        mock.expect_annotate()
            .times(1)
            .returning(|_| Ok(Some(one_sentence_graph())));

        let analysis = service(mock).analyze("it").unwrap();
        let Analysis::Json(json) = &analysis else {
            panic!("expected Json, got {analysis:?}");
        };
        let value: Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["output"]["sentences"].as_array().unwrap().len(), 1);
        assert_eq!(value["output"]["corefChains"][0], "CHAIN1-[\"it\" in sentence 1]");
    }

    #[test]
    fn pipeline_error_is_returned() {
        let mut mock = MockAnnotationPipeline::new();
        mock.expect_annotate()
            .returning(|_| Err(PipelineError::Annotation("parser crashed".into())));

        let err = service(mock).analyze("text").unwrap_err();
        assert!(matches!(err, PipelineError::Annotation(_)));
    }

    struct PanickingPipeline;

    impl AnnotationPipeline for PanickingPipeline {
        fn annotate(&self, _text: &str) -> Result<Option<AnnotationGraph>, PipelineError> {
            panic!("model not loaded")
        }
    }

    #[test]
    fn pipeline_panic_is_captured() {
        let service = SentimentService::new(Arc::new(PanickingPipeline));

        let err = service.analyze("text").unwrap_err();
        match err {
            PipelineError::Panicked(message) => assert!(message.contains("model not loaded")),
            other => panic!("expected Panicked, got {other:?}"),
        }
    }

    #[test]
    fn missing_annotation_is_unavailable() {
        let mut mock = MockAnnotationPipeline::new();
        mock.expect_annotate().returning(|_| Ok(None));

        let analysis = service(mock).analyze("text").unwrap();
        assert_eq!(analysis, Analysis::Unavailable);
        assert_eq!(analysis.payload(), None);
    }

    #[test]
    fn traversal_error_is_returned() {
        let mut mock = MockAnnotationPipeline::new();
        mock.expect_annotate().returning(|_| {
            Ok(Some(AnnotationGraph::new().with_sentence(SentenceAnnotation::new(vec![]))))
        });

        let err = service(mock).analyze("text").unwrap_err();
        assert!(matches!(err, PipelineError::Traversal { sentence: 0, .. }));
    }
}
