//! Rolling window of accepted aspect observations
//!
//! Each successful explain operation appends one review entry; reads fold
//! the whole window fresh through the pure aggregator, so aggregation is
//! idempotent and two concurrent reads always agree. The window is
//! bounded: once full, the oldest review is evicted first.

use chrono::NaiveDate;
use reviewlens_domain::{AspectAggregator, AspectObservation};
use std::collections::VecDeque;

/// Observations contributed by a single analyzed review
#[derive(Debug, Clone)]
pub struct ReviewEntry {
    /// Ingestion day used for trend bucketing
    pub day: NaiveDate,
    /// Aspect observations extracted from the review; may be empty
    pub observations: Vec<AspectObservation>,
}

/// Bounded, append-only window of per-review observations
#[derive(Debug)]
pub struct ObservationLog {
    capacity: usize,
    entries: VecDeque<ReviewEntry>,
}

impl ObservationLog {
    /// Create an empty log holding at most `capacity` reviews.
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Append one review's observations, evicting the oldest review when
    /// the window is full. A review with no observations still counts
    /// toward `total_reviews`.
    pub fn record(&mut self, day: NaiveDate, observations: Vec<AspectObservation>) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ReviewEntry { day, observations });
    }

    /// Number of reviews currently in the window
    pub fn total_reviews(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Fold the window into per-aspect statistics and a trend
    pub fn fold(&self) -> AspectAggregator {
        let mut aggregator = AspectAggregator::new();
        for entry in &self.entries {
            for obs in &entry.observations {
                aggregator.record(entry.day, obs);
            }
        }
        aggregator
    }

    /// Every individual observation score in the window, arrival order
    pub fn scores(&self) -> Vec<f64> {
        self.entries
            .iter()
            .flat_map(|e| e.observations.iter().map(|o| o.sentiment_score))
            .collect()
    }
}
