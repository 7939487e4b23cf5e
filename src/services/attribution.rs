//! Attribution Aggregator
//!
//! The explainer scores tokenizer pieces, not words. This module glues
//! sub-word pieces back into words (summing their weights), ranks the words
//! by absolute importance and renders the user-facing explanation sentence.

use crate::models::{AttributionToken, Emotion, TokenKind, WordImportance};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_TOP_K: usize = 2;

const CONTINUATION_PREFIX: &str = "##";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributionSummary {
    pub explanation: String,
    /// First `top_k` words by absolute importance
    pub top_words: Vec<WordImportance>,
    /// Every merged word, in text order
    pub words: Vec<WordImportance>,
    pub word_importance: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct AttributionAggregator {
    top_k: usize,
}

impl Default for AttributionAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl AttributionAggregator {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// `confidence_pct` is the primary confidence already rounded for display.
    pub fn aggregate(
        &self,
        tokens: &[AttributionToken],
        primary: Emotion,
        confidence_pct: u32,
    ) -> AttributionSummary {
        let words = merge_tokens(tokens);
        let ranked = rank_words(&words);
        let top_words: Vec<WordImportance> = ranked.into_iter().take(self.top_k).collect();

        AttributionSummary {
            explanation: explanation_text(primary, confidence_pct, &top_words),
            word_importance: importance_map(&words),
            top_words,
            words,
        }
    }
}

/// Round a [0, 1] confidence to a whole percentage for display
pub fn confidence_percent(confidence: f64) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Merge tokenizer pieces into words. Boundary markers are dropped, ordinary
/// tokens open a new word and continuation pieces extend the current one.
pub fn merge_tokens(tokens: &[AttributionToken]) -> Vec<WordImportance> {
    let mut words: Vec<WordImportance> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Boundary => continue,
            TokenKind::Ordinary => words.push(WordImportance {
                word: token.token.clone(),
                importance: token.weight,
            }),
            TokenKind::Continuation => {
                let piece = token
                    .token
                    .strip_prefix(CONTINUATION_PREFIX)
                    .unwrap_or(&token.token);

                match words.last_mut() {
                    Some(current) => {
                        current.word.push_str(piece);
                        current.importance += token.weight;
                    }
                    // Orphan piece at the start of the sequence becomes its own word
                    None => words.push(WordImportance {
                        word: piece.to_string(),
                        importance: token.weight,
                    }),
                }
            }
        }
    }

    words
}

/// Sort by absolute importance, strongest first. Stable, so equal magnitudes
/// keep their left-to-right order.
pub fn rank_words(words: &[WordImportance]) -> Vec<WordImportance> {
    let mut ranked = words.to_vec();
    ranked.sort_by(|a, b| b.importance.abs().total_cmp(&a.importance.abs()));
    ranked
}

// A repeated word keeps its strongest occurrence (earliest on ties).
fn importance_map(words: &[WordImportance]) -> BTreeMap<String, f64> {
    let mut map: BTreeMap<String, f64> = BTreeMap::new();
    for w in words {
        map.entry(w.word.clone())
            .and_modify(|existing| {
                if w.importance.abs() > existing.abs() {
                    *existing = w.importance;
                }
            })
            .or_insert(w.importance);
    }
    map
}

fn explanation_text(primary: Emotion, confidence_pct: u32, top_words: &[WordImportance]) -> String {
    let mut explanation = format!(
        "Your text expresses {} ({}% confidence).",
        primary, confidence_pct
    );

    if !top_words.is_empty() {
        let quoted: Vec<String> = top_words.iter().map(|w| format!("'{}'", w.word)).collect();
        explanation.push_str(&format!(
            " Key contributing words include {}.",
            join_with_and(&quoted)
        ));
    }

    explanation
}

fn join_with_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ord(token: &str, weight: f64) -> AttributionToken {
        AttributionToken::new(token, weight, TokenKind::Ordinary)
    }

    fn cont(token: &str, weight: f64) -> AttributionToken {
        AttributionToken::new(token, weight, TokenKind::Continuation)
    }

    fn boundary(token: &str) -> AttributionToken {
        AttributionToken::new(token, 0.0, TokenKind::Boundary)
    }

    #[test]
    fn test_merges_subword_pieces() {
        let tokens = vec![
            boundary("[CLS]"),
            ord("i", 0.02),
            ord("got", 0.05),
            ord("pro", 0.10),
            cont("##moted", 0.134),
            ord("today", 0.08),
            boundary("[SEP]"),
        ];

        let words = merge_tokens(&tokens);
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, vec!["i", "got", "promoted", "today"]);
        assert!((words[2].importance - 0.234).abs() < 1e-9);

        let summary = AttributionAggregator::default().aggregate(&tokens, Emotion::Happiness, 92);
        assert_eq!(summary.top_words[0].word, "promoted");
        assert_eq!(summary.top_words[1].word, "today");
        assert_eq!(
            summary.explanation,
            "Your text expresses Happiness (92% confidence). Key contributing words include 'promoted' and 'today'."
        );
    }

    #[test]
    fn test_ranks_by_absolute_value_with_stable_ties() {
        let tokens = vec![ord("not", -0.4), ord("happy", 0.3), ord("at", 0.3), ord("all", -0.3)];

        let ranked = rank_words(&merge_tokens(&tokens));
        let names: Vec<&str> = ranked.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, vec!["not", "happy", "at", "all"]);
        // Signed weights are reported as received
        assert_eq!(ranked[0].importance, -0.4);
    }

    #[test]
    fn test_empty_attribution_degrades_to_base_sentence() {
        let summary = AttributionAggregator::default().aggregate(&[], Emotion::Sadness, 67);
        assert_eq!(summary.explanation, "Your text expresses Sadness (67% confidence).");
        assert!(summary.top_words.is_empty());
        assert!(summary.word_importance.is_empty());

        // Only boundary markers is the same as nothing
        let summary = AttributionAggregator::default().aggregate(
            &[boundary("[CLS]"), boundary("[SEP]")],
            Emotion::Sadness,
            67,
        );
        assert!(summary.words.is_empty());
        assert_eq!(summary.explanation, "Your text expresses Sadness (67% confidence).");
    }

    #[test]
    fn test_word_clause_grammar() {
        let tokens = vec![ord("calm", 0.5), ord("quiet", 0.4), ord("evening", 0.3)];

        let one = AttributionAggregator::new(1).aggregate(&tokens, Emotion::Contentment, 71);
        assert!(one.explanation.ends_with(" Key contributing words include 'calm'."));

        let three = AttributionAggregator::new(3).aggregate(&tokens, Emotion::Contentment, 71);
        assert!(three
            .explanation
            .ends_with(" Key contributing words include 'calm', 'quiet' and 'evening'."));
    }

    #[test]
    fn test_orphan_continuation_starts_a_word() {
        let words = merge_tokens(&[boundary("[CLS]"), cont("##ing", 0.2), ord("fine", 0.1)]);
        assert_eq!(words[0].word, "ing");
        assert_eq!(words[1].word, "fine");
    }

    #[test]
    fn test_boundary_between_pieces_is_transparent() {
        let words = merge_tokens(&[ord("sun", 0.1), boundary("[SEP]"), cont("##shine", 0.2)]);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "sunshine");
    }

    #[test]
    fn test_repeated_word_keeps_strongest_occurrence() {
        let summary = AttributionAggregator::default().aggregate(
            &[ord("so", 0.1), ord("tired", 0.5), ord("so", -0.3)],
            Emotion::Sadness,
            55,
        );
        assert_eq!(summary.word_importance.len(), 2);
        assert_eq!(summary.word_importance["so"], -0.3);
        assert_eq!(summary.words.len(), 3);
    }

    #[test]
    fn test_confidence_percent_rounds() {
        assert_eq!(confidence_percent(0.92), 92);
        assert_eq!(confidence_percent(0.675), 68);
        assert_eq!(confidence_percent(0.004), 0);
        assert_eq!(confidence_percent(1.0), 100);
    }
}
