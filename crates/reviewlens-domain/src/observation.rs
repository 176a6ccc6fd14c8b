//! Aspect-level sentiment observations and polarity banding

use serde::{Deserialize, Serialize};

/// Categorical sentiment direction derived from a continuous score.
///
/// The numeric banding is fixed and shared by every view of the data:
/// the single-prediction view names the middle band "neutral" while the
/// trend/EDA view names it "mixed", but both are the same band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Average sentiment above the positive threshold
    Positive,
    /// Average sentiment below the negative threshold
    Negative,
    /// Everything in between, boundaries included
    Neutral,
}

impl Polarity {
    /// Scores strictly above this are positive
    pub const POSITIVE_THRESHOLD: f64 = 0.2;

    /// Scores strictly below this are negative
    pub const NEGATIVE_THRESHOLD: f64 = -0.2;

    /// Band a sentiment score. Both boundaries are exclusive, so a score
    /// of exactly 0.2 or -0.2 is `Neutral`.
    pub fn from_score(score: f64) -> Self {
        if score > Self::POSITIVE_THRESHOLD {
            Polarity::Positive
        } else if score < Self::NEGATIVE_THRESHOLD {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }

    /// Parse an upstream label. Upstream models emit variants like
    /// "POSITIVE", "neg", "Neutral" or "mixed"; substring matching on the
    /// lowercased label covers all observed spellings.
    pub fn parse(label: &str) -> Option<Self> {
        let lower = label.to_ascii_lowercase();
        if lower.contains("pos") {
            Some(Polarity::Positive)
        } else if lower.contains("neg") {
            Some(Polarity::Negative)
        } else if lower.contains("neu") || lower.contains("mix") {
            Some(Polarity::Neutral)
        } else {
            None
        }
    }

    /// Label used in the single-prediction view
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
            Polarity::Neutral => "neutral",
        }
    }

    /// Label used in the trend/EDA view. Same banding, different display
    /// name for the middle band.
    pub fn trend_label(&self) -> &'static str {
        match self {
            Polarity::Neutral => "mixed",
            other => other.as_str(),
        }
    }
}

/// One aspect/sentiment data point extracted from a single review.
///
/// `aspect` is a free-text noun phrase with casing preserved: upstream
/// never canonicalizes casing, so distinct casings are distinct aspects
/// here too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectObservation {
    /// Free-text aspect name, case-preserved
    pub aspect: String,
    /// Banded direction of this observation
    pub polarity: Polarity,
    /// Signed sentiment score in [-1, 1]
    #[serde(rename = "sentiment")]
    pub sentiment_score: f64,
    /// Model confidence in [0, 1]
    pub confidence: f64,
}

impl AspectObservation {
    /// Create an observation, deriving the polarity band from the score
    pub fn from_score(
        aspect: impl Into<String>,
        sentiment_score: f64,
        confidence: f64,
    ) -> Self {
        Self {
            aspect: aspect.into(),
            polarity: Polarity::from_score(sentiment_score),
            sentiment_score,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banding_thresholds() {
        assert_eq!(Polarity::from_score(0.5), Polarity::Positive);
        assert_eq!(Polarity::from_score(-0.5), Polarity::Negative);
        assert_eq!(Polarity::from_score(0.0), Polarity::Neutral);
    }

    #[test]
    fn test_boundary_is_exclusive() {
        assert_eq!(Polarity::from_score(0.2), Polarity::Neutral);
        assert_eq!(Polarity::from_score(-0.2), Polarity::Neutral);
        assert_eq!(Polarity::from_score(0.2000001), Polarity::Positive);
        assert_eq!(Polarity::from_score(-0.2000001), Polarity::Negative);
    }

    #[test]
    fn test_parse_upstream_labels() {
        assert_eq!(Polarity::parse("POSITIVE"), Some(Polarity::Positive));
        assert_eq!(Polarity::parse("neg"), Some(Polarity::Negative));
        assert_eq!(Polarity::parse("Neutral"), Some(Polarity::Neutral));
        assert_eq!(Polarity::parse("mixed"), Some(Polarity::Neutral));
        assert_eq!(Polarity::parse("5 stars"), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Polarity::Neutral.as_str(), "neutral");
        assert_eq!(Polarity::Neutral.trend_label(), "mixed");
        assert_eq!(Polarity::Negative.as_str(), "negative");
        assert_eq!(Polarity::Negative.trend_label(), "negative");
    }

    #[test]
    fn test_observation_from_score() {
        let obs = AspectObservation::from_score("battery life", -0.8, 0.9);
        assert_eq!(obs.polarity, Polarity::Negative);
        assert_eq!(obs.aspect, "battery life");
    }

    #[test]
    fn test_observation_wire_shape() {
        let obs = AspectObservation::from_score("camera", 0.9, 0.85);
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["aspect"], "camera");
        assert_eq!(json["polarity"], "positive");
        assert_eq!(json["sentiment"], 0.9);
        assert_eq!(json["confidence"], 0.85);
    }
}
