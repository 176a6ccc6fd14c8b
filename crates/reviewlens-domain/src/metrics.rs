//! Dashboard overview composition

use crate::aggregate::AspectAggregator;
use crate::observation::Polarity;
use chrono::NaiveDate;
use serde::Serialize;

/// Mean sentiment for one calendar day with at least one observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Calendar day (serialized as an ISO date)
    pub day: NaiveDate,
    /// Mean of that day's observation scores
    pub avg_sentiment: f64,
}

/// Aggregate dashboard snapshot.
///
/// Rebuilt on every request from the current observation window; holds no
/// persisted identity of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsOverview {
    /// Number of reviews in the window
    pub total_reviews: u64,
    /// Corpus-level mean over every individual observation score
    pub avg_sentiment: f64,
    /// Share of negative observations, percent in [0, 100]
    pub pct_negative: f64,
    /// Top aspect names by mention count
    pub top_aspects: Vec<String>,
    /// Per-day mean sentiment, ascending by day
    pub trend: Vec<TrendPoint>,
}

/// Compose the dashboard overview from aggregator output plus corpus-wide
/// counts.
///
/// `avg_sentiment` is the mean of all individual scores, computed here
/// rather than by averaging the per-aspect averages, so a heavily-mentioned
/// aspect cannot distort the corpus statistic. `pct_negative` counts scores
/// below the negative threshold against `total_reviews`; an empty window
/// yields 0 rather than a division by zero. Pure composition, no I/O.
pub fn build_overview(
    aggregator: &AspectAggregator,
    total_reviews: u64,
    all_scores: &[f64],
    top_n: usize,
) -> MetricsOverview {
    let avg_sentiment = if all_scores.is_empty() {
        0.0
    } else {
        all_scores.iter().sum::<f64>() / all_scores.len() as f64
    };

    let pct_negative = if total_reviews == 0 {
        0.0
    } else {
        let negative = all_scores
            .iter()
            .filter(|s| **s < Polarity::NEGATIVE_THRESHOLD)
            .count();
        (negative as f64 / total_reviews as f64 * 100.0).clamp(0.0, 100.0)
    };

    MetricsOverview {
        total_reviews,
        avg_sentiment,
        pct_negative,
        top_aspects: aggregator.top_aspects(top_n),
        trend: aggregator.trend(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::AspectObservation;

    const TOL: f64 = 1e-9;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_window_yields_zeroes() {
        let agg = AspectAggregator::new();
        let overview = build_overview(&agg, 0, &[], 3);
        assert_eq!(overview.total_reviews, 0);
        assert_eq!(overview.avg_sentiment, 0.0);
        assert_eq!(overview.pct_negative, 0.0);
        assert!(overview.top_aspects.is_empty());
        assert!(overview.trend.is_empty());
    }

    #[test]
    fn test_corpus_mean_independent_of_aspect_means() {
        // battery has many mentions; the corpus mean still weighs each
        // observation equally
        let observations = vec![
            (day("2025-10-25"), AspectObservation::from_score("battery", -0.8, 0.9)),
            (day("2025-10-25"), AspectObservation::from_score("battery", -0.6, 0.9)),
            (day("2025-10-25"), AspectObservation::from_score("camera", 0.9, 0.9)),
        ];
        let scores: Vec<f64> = observations
            .iter()
            .map(|(_, o)| o.sentiment_score)
            .collect();
        let agg = AspectAggregator::fold(observations);
        let overview = build_overview(&agg, 3, &scores, 2);

        assert!((overview.avg_sentiment - (-0.5 / 3.0)).abs() < TOL);
        assert_eq!(overview.top_aspects, vec!["battery", "camera"]);
    }

    #[test]
    fn test_pct_negative_counts_below_threshold() {
        let scores = [-0.8, -0.6, 0.9, -0.2];
        let agg = AspectAggregator::new();
        // -0.2 sits on the boundary and is not negative
        let overview = build_overview(&agg, 4, &scores, 3);
        assert!((overview.pct_negative - 50.0).abs() < TOL);
    }

    #[test]
    fn test_pct_negative_clamped() {
        // more negative observations than reviews (several aspects per
        // review) must not exceed 100
        let scores = [-0.8, -0.9, -0.7];
        let agg = AspectAggregator::new();
        let overview = build_overview(&agg, 2, &scores, 3);
        assert_eq!(overview.pct_negative, 100.0);
    }

    #[test]
    fn test_trend_day_serializes_as_iso_date() {
        let point = TrendPoint {
            day: day("2025-10-25"),
            avg_sentiment: -0.25,
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["day"], "2025-10-25");
    }
}
