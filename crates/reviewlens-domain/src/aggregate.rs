//! Rolling per-aspect aggregation and per-day trend bucketing

use crate::observation::{AspectObservation, Polarity};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Derived per-aspect statistics.
///
/// The polarity label is always recomputed from `avg_sentiment` via
/// [`Polarity::from_score`], never stored, so it cannot drift from the
/// score that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectAggregate {
    /// Aspect name, case-preserved
    pub aspect: String,
    /// Number of observations contributed under this key, >= 1
    pub mentions: u64,
    /// Arithmetic mean of contributed sentiment scores
    pub avg_sentiment: f64,
}

impl AspectAggregate {
    /// Band the running average through the fixed thresholds
    pub fn polarity(&self) -> Polarity {
        Polarity::from_score(self.avg_sentiment)
    }
}

/// Per-key running sum and count. Tracking the sum rather than a rolling
/// average keeps the fold associative and commutative per key and avoids
/// compounding rounding error from re-averaging averages.
#[derive(Debug, Clone, Default)]
struct Running {
    sum: f64,
    count: u64,
}

impl Running {
    fn add(&mut self, score: f64) {
        self.sum += score;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Folds dated aspect observations into per-aspect statistics and a
/// per-day sentiment trend.
///
/// Observations are processed in arrival order; first-seen order of
/// aspect keys is remembered for stable tie-breaking. Days with zero
/// observations are simply absent from the trend, never emitted as zero.
#[derive(Debug, Clone, Default)]
pub struct AspectAggregator {
    // first-seen order of aspect keys
    order: Vec<String>,
    by_aspect: HashMap<String, Running>,
    by_day: BTreeMap<NaiveDate, Running>,
}

impl AspectAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a sequence of dated observations
    pub fn fold<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, AspectObservation)>,
    {
        let mut agg = Self::new();
        for (day, obs) in observations {
            agg.record(day, &obs);
        }
        agg
    }

    /// Add one observation to the running statistics
    pub fn record(&mut self, day: NaiveDate, obs: &AspectObservation) {
        match self.by_aspect.get_mut(&obs.aspect) {
            Some(running) => running.add(obs.sentiment_score),
            None => {
                self.order.push(obs.aspect.clone());
                let mut running = Running::default();
                running.add(obs.sentiment_score);
                self.by_aspect.insert(obs.aspect.clone(), running);
            }
        }
        self.by_day.entry(day).or_default().add(obs.sentiment_score);
    }

    /// Combine with another aggregator, keeping this one's first-seen
    /// order for keys both have observed
    pub fn merge(&mut self, other: AspectAggregator) {
        for aspect in other.order {
            // other.by_aspect always holds every key in other.order
            if let Some(running) = other.by_aspect.get(&aspect) {
                match self.by_aspect.get_mut(&aspect) {
                    Some(mine) => {
                        mine.sum += running.sum;
                        mine.count += running.count;
                    }
                    None => {
                        self.order.push(aspect.clone());
                        self.by_aspect.insert(aspect, running.clone());
                    }
                }
            }
        }
        for (day, running) in other.by_day {
            let mine = self.by_day.entry(day).or_default();
            mine.sum += running.sum;
            mine.count += running.count;
        }
    }

    /// True if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Per-aspect aggregates in first-seen order
    pub fn aggregates(&self) -> Vec<AspectAggregate> {
        self.order
            .iter()
            .filter_map(|aspect| {
                self.by_aspect.get(aspect).map(|running| AspectAggregate {
                    aspect: aspect.clone(),
                    mentions: running.count,
                    avg_sentiment: running.mean(),
                })
            })
            .collect()
    }

    /// Top-N aspect names ranked by mentions descending; ties broken by
    /// more-negative average first (pain points surface preferentially),
    /// then by first-seen order.
    pub fn top_aspects(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<(usize, AspectAggregate)> =
            self.aggregates().into_iter().enumerate().collect();
        ranked.sort_by(|(ia, a), (ib, b)| {
            b.mentions
                .cmp(&a.mentions)
                .then_with(|| a.avg_sentiment.total_cmp(&b.avg_sentiment))
                .then_with(|| ia.cmp(ib))
        });
        ranked
            .into_iter()
            .take(n)
            .map(|(_, agg)| agg.aspect)
            .collect()
    }

    /// Per-day mean sentiment, sorted by day ascending
    pub fn trend(&self) -> Vec<crate::metrics::TrendPoint> {
        self.by_day
            .iter()
            .map(|(day, running)| crate::metrics::TrendPoint {
                day: *day,
                avg_sentiment: running.mean(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn obs(aspect: &str, score: f64) -> AspectObservation {
        AspectObservation::from_score(aspect, score, 0.9)
    }

    #[test]
    fn test_fold_counts_and_means_exactly() {
        let agg = AspectAggregator::fold(vec![
            (day("2025-10-25"), obs("battery", -0.8)),
            (day("2025-10-25"), obs("battery", -0.6)),
            (day("2025-10-26"), obs("camera", 0.9)),
        ]);

        let rows = agg.aggregates();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].aspect, "battery");
        assert_eq!(rows[0].mentions, 2);
        assert!((rows[0].avg_sentiment - (-0.7)).abs() < TOL);
        assert_eq!(rows[0].polarity(), Polarity::Negative);
        assert_eq!(rows[1].aspect, "camera");
        assert_eq!(rows[1].mentions, 1);
        assert!((rows[1].avg_sentiment - 0.9).abs() < TOL);
        assert_eq!(rows[1].polarity(), Polarity::Positive);
    }

    #[test]
    fn test_top_aspects_ranked_by_mentions() {
        let agg = AspectAggregator::fold(vec![
            (day("2025-10-25"), obs("battery", -0.8)),
            (day("2025-10-25"), obs("battery", -0.6)),
            (day("2025-10-25"), obs("camera", 0.9)),
        ]);
        assert_eq!(agg.top_aspects(2), vec!["battery", "camera"]);
    }

    #[test]
    fn test_top_aspects_tie_breaks_more_negative_first() {
        let agg = AspectAggregator::fold(vec![
            (day("2025-10-25"), obs("camera", 0.9)),
            (day("2025-10-25"), obs("battery", -0.8)),
        ]);
        // equal mention counts: battery's average is more negative
        assert_eq!(agg.top_aspects(2), vec!["battery", "camera"]);
    }

    #[test]
    fn test_top_aspects_final_tie_break_is_first_seen() {
        let agg = AspectAggregator::fold(vec![
            (day("2025-10-25"), obs("screen", 0.5)),
            (day("2025-10-25"), obs("camera", 0.5)),
        ]);
        assert_eq!(agg.top_aspects(2), vec!["screen", "camera"]);
    }

    #[test]
    fn test_distinct_casings_are_distinct_aspects() {
        let agg = AspectAggregator::fold(vec![
            (day("2025-10-25"), obs("Battery", -0.5)),
            (day("2025-10-25"), obs("battery", -0.5)),
        ]);
        assert_eq!(agg.aggregates().len(), 2);
    }

    #[test]
    fn test_trend_sorted_ascending_and_omits_empty_days() {
        let agg = AspectAggregator::fold(vec![
            (day("2025-10-27"), obs("battery", -0.4)),
            (day("2025-10-25"), obs("battery", 0.8)),
            (day("2025-10-25"), obs("camera", 0.4)),
        ]);
        let trend = agg.trend();
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].day, day("2025-10-25"));
        assert!((trend[0].avg_sentiment - 0.6).abs() < TOL);
        assert_eq!(trend[1].day, day("2025-10-27"));
        assert!((trend[1].avg_sentiment - (-0.4)).abs() < TOL);
    }

    #[test]
    fn test_merge_matches_single_fold() {
        let all = vec![
            (day("2025-10-25"), obs("battery", -0.8)),
            (day("2025-10-25"), obs("camera", 0.9)),
            (day("2025-10-26"), obs("battery", -0.6)),
            (day("2025-10-26"), obs("screen", 0.1)),
        ];
        let folded = AspectAggregator::fold(all.clone());

        let mut left = AspectAggregator::fold(all[..2].to_vec());
        let right = AspectAggregator::fold(all[2..].to_vec());
        left.merge(right);

        let a = folded.aggregates();
        let b = left.aggregates();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.aspect, y.aspect);
            assert_eq!(x.mentions, y.mentions);
            assert!((x.avg_sentiment - y.avg_sentiment).abs() < TOL);
        }
        assert_eq!(folded.trend(), left.trend());
    }

    #[test]
    fn test_empty_aggregator() {
        let agg = AspectAggregator::new();
        assert!(agg.is_empty());
        assert!(agg.aggregates().is_empty());
        assert!(agg.top_aspects(3).is_empty());
        assert!(agg.trend().is_empty());
    }
}
