//! CoreNLP server JSON output
//!
//! Only the fields the sentiment result needs are read; everything else in
//! the server document is ignored.

use sentiment_core::{
    AnnotationGraph, ChainMention, CorefChain, Mention, PipelineError, SentenceAnnotation,
    SentimentTree, Token,
};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Top-level server document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub sentences: Vec<WireSentence>,
    /// Chain id (as a string key) to mentions
    #[serde(default)]
    pub corefs: BTreeMap<String, Vec<WireMention>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSentence {
    #[serde(default)]
    pub tokens: Vec<WireToken>,
    /// Class probabilities, very negative to very positive
    #[serde(default)]
    pub sentiment_distribution: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireToken {
    pub word: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub ner: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMention {
    pub text: String,
    /// 1-based sentence number
    pub sent_num: usize,
    /// 1-based token index within the sentence
    pub start_index: usize,
}

/// Parse a response body
///
/// An empty or `null` body means the server produced no annotation.
///
/// # Errors
/// - `PipelineError::Annotation` if the body is not a CoreNLP document
pub fn parse_body(body: &str) -> Result<Option<Document>, PipelineError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| PipelineError::Annotation(format!("malformed CoreNLP response: {e}")))
}

impl Document {
    /// Convert into the graph the assembler walks
    ///
    /// # Errors
    /// - `PipelineError::Annotation` on a non-numeric chain id
    pub fn into_graph(self) -> Result<AnnotationGraph, PipelineError> {
        let mut graph = AnnotationGraph::new();
        let mut by_sentence: BTreeMap<usize, Vec<&WireMention>> = BTreeMap::new();

        for (key, mentions) in &self.corefs {
            let id: u32 = key
                .parse()
                .map_err(|_| PipelineError::Annotation(format!("bad coref chain id `{key}`")))?;

            let mut ordered: Vec<&WireMention> = mentions.iter().collect();
            ordered.sort_by_key(|m| (m.sent_num, m.start_index));
            for &mention in &ordered {
                by_sentence.entry(mention.sent_num).or_default().push(mention);
            }

            graph = graph.with_chain(CorefChain::new(
                id,
                ordered
                    .iter()
                    .map(|m| ChainMention::new(m.text.clone(), m.sent_num))
                    .collect(),
            ));
        }

        for (index, sentence) in self.sentences.iter().enumerate() {
            let mut mentions = by_sentence.remove(&(index + 1)).unwrap_or_default();
            mentions.sort_by_key(|m| m.start_index);

            let tokens = sentence
                .tokens
                .iter()
                .map(|t| Token::new(t.word.clone(), t.pos.clone(), t.ner.clone()))
                .collect();
            let mut annotation = SentenceAnnotation::new(tokens).with_mentions(
                mentions
                    .into_iter()
                    .map(|m| Mention::new(m.text.split_whitespace()))
                    .collect(),
            );
            if let Some(probs) = &sentence.sentiment_distribution {
                annotation = annotation.with_sentiment(SentimentTree::new(probs.clone()));
            }
            graph = graph.with_sentence(annotation);
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_SENTENCES: &str = r#"{
      "sentences": [
        {"index": 0, "sentimentDistribution": [0.1, 0.2, 0.4, 0.2, 0.1],
         "tokens": [{"word": "Barack", "pos": "NNP", "ner": "PERSON"},
                    {"word": "Obama", "pos": "NNP", "ner": "PERSON"},
                    {"word": "won", "pos": "VBD", "ner": "O"}]},
        {"index": 1, "sentimentDistribution": [0.0, 0.1, 0.8, 0.1, 0.0],
         "tokens": [{"word": "He", "pos": "PRP", "ner": "O"},
                    {"word": "smiled", "pos": "VBD", "ner": "O"}]}
      ],
      "corefs": {
        "4": [{"id": 4, "text": "He", "sentNum": 2, "startIndex": 1, "endIndex": 2},
              {"id": 1, "text": "Barack Obama", "sentNum": 1, "startIndex": 1, "endIndex": 3}]
      }
    }"#;

    #[test]
    fn empty_and_null_bodies_mean_no_annotation() {
        assert!(parse_body("").unwrap().is_none());
        assert!(parse_body("  null\n").unwrap().is_none());
    }

    #[test]
    fn garbage_is_annotation_error() {
        let err = parse_body("<html>").unwrap_err();
        assert!(matches!(err, PipelineError::Annotation(_)));
    }

    #[test]
    fn chain_mentions_in_textual_order() {
        let graph = parse_body(TWO_SENTENCES).unwrap().unwrap().into_graph().unwrap();

        assert_eq!(
            graph.coref_chains[&4].to_string(),
            "CHAIN4-[\"Barack Obama\" in sentence 1, \"He\" in sentence 2]"
        );
    }

    #[test]
    fn sentence_mentions_follow_their_sentence() {
        let graph = parse_body(TWO_SENTENCES).unwrap().unwrap().into_graph().unwrap();

        let rendered: Vec<Vec<String>> = graph
            .sentences
            .iter()
            .map(|s| s.mentions.iter().map(ToString::to_string).collect())
            .collect();
        assert_eq!(rendered, vec![vec!["Barack Obama"], vec!["He"]]);
    }

    #[test]
    fn tokens_and_distribution_copied() {
        let graph = parse_body(TWO_SENTENCES).unwrap().unwrap().into_graph().unwrap();

        let sentence = &graph.sentences[1];
        assert_eq!(sentence.tokens[0], Token::new("He", "PRP", "O"));
        assert_eq!(sentence.tokens[0].role, None);
        assert_eq!(
            sentence.sentiment.as_ref().unwrap().predictions,
            vec![0.0, 0.1, 0.8, 0.1, 0.0]
        );
    }

    #[test]
    fn missing_distribution_leaves_no_tree() {
        let doc = parse_body(r#"{"sentences": [{"tokens": [{"word": "hi"}]}]}"#)
            .unwrap()
            .unwrap();
        let graph = doc.into_graph().unwrap();
        assert!(graph.sentences[0].sentiment.is_none());
        assert!(graph.coref_chains.is_empty());
    }

    #[test]
    fn non_numeric_chain_id_rejected() {
        let doc = parse_body(r#"{"corefs": {"x": []}}"#).unwrap().unwrap();
        assert!(doc.into_graph().is_err());
    }
}
