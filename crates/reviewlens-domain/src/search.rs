//! Semantic search hits and near-duplicate removal

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One retrieval result from the semantic index.
///
/// `score` is retrieval relevance in [0, 1], not sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Upstream document identifier, when the index provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Review text
    pub text: String,
    /// Relevance score in [0, 1]
    pub score: f64,
    /// Source domain metadata, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Product metadata, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// Review date metadata, surfaced as the upstream string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Collapse runs of whitespace and trim, preserving case.
///
/// This is the dedup key: hits whose text differs only in surrounding or
/// internal whitespace are duplicates; hits differing in case are not.
fn normalized_key(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove duplicate hits by normalized text, keeping the first occurrence.
///
/// Stable: survivors keep their relative input order, never re-sorted by
/// score. Two hits with identical text but different scores are duplicates
/// and the first-encountered wins. Pure and total; idempotent.
pub fn dedupe(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(normalized_key(&hit.text)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(text: &str, score: f64) -> SearchHit {
        SearchHit {
            id: None,
            text: text.to_string(),
            score,
            domain: None,
            product: None,
            date: None,
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let hits = vec![hit("A", 0.9), hit("A", 0.5), hit("B", 0.7)];
        let out = dedupe(hits);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "A");
        assert_eq!(out[0].score, 0.9);
        assert_eq!(out[1].text, "B");
        assert_eq!(out[1].score, 0.7);
    }

    #[test]
    fn test_whitespace_normalized_key() {
        let hits = vec![
            hit("  camera   is sharp ", 0.8),
            hit("camera is sharp", 0.6),
        ];
        let out = dedupe(hits);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].score, 0.8);
    }

    #[test]
    fn test_case_sensitive() {
        let hits = vec![hit("Battery", 0.8), hit("battery", 0.6)];
        assert_eq!(dedupe(hits).len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let hits = vec![hit("A", 0.9), hit("A", 0.5), hit("B", 0.7), hit("A", 0.1)];
        let once = dedupe(hits);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_never_increases_length_or_reorders() {
        let hits = vec![hit("c", 0.1), hit("a", 0.9), hit("b", 0.5), hit("a", 0.8)];
        let out = dedupe(hits.clone());
        assert!(out.len() <= hits.len());
        let texts: Vec<_> = out.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedupe(Vec::new()).is_empty());
    }
}
