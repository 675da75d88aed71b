//! Interval and stability rules for collocation review
//!
//! Each credited review doubles the base interval, scaled by the phrase's
//! stability:
//!
//! ```text
//! base     = max(1, floor(stability * 2^(review_count - 1)))
//! interval = max(1, floor(base * interval_multiplier))
//! ```
//!
//! Stability then grows by the strategy's growth rate. A phrase that was
//! requested but repeatedly left out of the generated content loses some
//! stability and comes back after a short deferral.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::models::{Day, PhraseRecord};
use crate::strategy::{StrategyParameters, DEFAULT_GROWTH_RATE, DEFAULT_INTERVAL_MULTIPLIER};

/// Stability of a freshly added phrase
pub const INITIAL_STABILITY: f64 = 1.0;

/// Stability never drops below this
pub const MIN_STABILITY: f64 = 0.1;

/// A phrase whose next review is further away than this is mastered
pub const MASTERY_HORIZON_DAYS: Day = 7;

/// Result of crediting a review
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewResult {
    pub interval: Day,
    pub next_review_day: Day,
    pub stability: f64,
}

/// Compute the schedule after a credited review.
///
/// `review_count` is the count including the review being credited, so it is
/// at least 1.
pub fn calculate_next_review(
    stability: f64,
    review_count: u32,
    day: Day,
    params: Option<&StrategyParameters>,
) -> ReviewResult {
    let multiplier = params.map_or(DEFAULT_INTERVAL_MULTIPLIER, |p| p.interval_multiplier);
    let growth = params.map_or(DEFAULT_GROWTH_RATE, |p| p.stability_growth_rate);

    let exponent = review_count.saturating_sub(1).min(i32::MAX as u32) as i32;
    let base = (stability * 2f64.powi(exponent)).floor().max(1.0);
    // float-to-int casts saturate, so runaway intervals clamp at Day::MAX
    let interval = ((base * multiplier).floor() as Day).max(1);

    ReviewResult {
        interval,
        next_review_day: day.saturating_add(interval),
        stability: (stability * growth).max(MIN_STABILITY),
    }
}

/// Order due phrases: most overdue first, then least stable first.
///
/// Ties beyond that fall back to the phrase text so selection is stable.
pub fn compare_due(a: &PhraseRecord, b: &PhraseRecord, day: Day) -> Ordering {
    b.days_overdue(day)
        .cmp(&a.days_overdue(day))
        .then_with(|| a.stability.total_cmp(&b.stability))
        .then_with(|| a.text.cmp(&b.text))
}

/// How many of `candidates` due phrases to hand out
pub fn selection_size(candidates: usize, min_items: usize, max_items: usize) -> usize {
    candidates.max(min_items).min(max_items).min(candidates)
}

/// Policy for phrases that were requested but not used in the content.
///
/// The defaults reproduce the historical heuristic; they are tunable
/// constants, not derived values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeniencyPolicy {
    /// Appearances this many days back or fewer count as recent
    pub window_days: Day,
    /// Up to this many recent appearances a miss is forgiven
    pub max_recent_misses: usize,
    /// A miss at most this many days after the due date is forgiven
    pub due_grace_days: i64,
    /// Stability multiplier applied on penalty
    pub penalty_factor: f64,
    /// Days until a penalised phrase is due again
    pub deferral_days: Day,
}

impl Default for LeniencyPolicy {
    fn default() -> Self {
        Self {
            window_days: 3,
            max_recent_misses: 2,
            due_grace_days: 1,
            penalty_factor: 0.9,
            deferral_days: 2,
        }
    }
}

impl LeniencyPolicy {
    pub fn recent_misses(&self, record: &PhraseRecord, day: Day) -> usize {
        record
            .appearances
            .iter()
            .filter(|&&seen| i64::from(day) - i64::from(seen) <= i64::from(self.window_days))
            .count()
    }

    /// Whether an unused phrase is left alone for another try
    pub fn should_retry(&self, record: &PhraseRecord, day: Day) -> bool {
        self.recent_misses(record, day) <= self.max_recent_misses
            || record.days_overdue(day) <= self.due_grace_days
    }

    /// Reduce stability and defer the phrase by a short, bounded amount
    pub fn apply_penalty(&self, record: &mut PhraseRecord, day: Day) {
        record.stability = (record.stability * self.penalty_factor).max(MIN_STABILITY);
        record.next_review_day = day
            .saturating_add(self.deferral_days)
            .max(record.last_seen_day);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ContentStrategy;

    fn record(text: &str, next_review_day: Day, stability: f64) -> PhraseRecord {
        let mut record = PhraseRecord::new(text.into(), 1);
        record.next_review_day = next_review_day;
        record.stability = stability;
        record
    }

    #[test]
    fn test_first_review_default() {
        let result = calculate_next_review(1.0, 1, 10, None);

        assert_eq!(result.interval, 1);
        assert_eq!(result.next_review_day, 11);
        assert!((result.stability - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_interval_doubles() {
        // 1.2 * 2 = 2.4 -> 2
        assert_eq!(calculate_next_review(1.2, 2, 10, None).interval, 2);
        // 1.44 * 4 = 5.76 -> 5
        assert_eq!(calculate_next_review(1.44, 3, 10, None).interval, 5);
    }

    #[test]
    fn test_strategy_scaling() {
        let wider = ContentStrategy::Wider.parameters();
        let result = calculate_next_review(1.44, 3, 10, Some(&wider));
        // base 5 * 1.5 = 7.5 -> 7
        assert_eq!(result.interval, 7);
        assert!((result.stability - 1.44 * 1.3).abs() < 1e-9);

        let deeper = ContentStrategy::Deeper.parameters();
        let result = calculate_next_review(1.0, 1, 10, Some(&deeper));
        // base 1 * 0.8 = 0.8 -> floor 0 -> at least 1
        assert_eq!(result.interval, 1);
        assert!((result.stability - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_huge_review_count_saturates() {
        let result = calculate_next_review(1.0, 10_000, 10, None);
        assert_eq!(result.next_review_day, Day::MAX);
    }

    #[test]
    fn test_compare_due_ordering() {
        let day = 10;
        let overdue = record("more overdue", 5, 3.0);
        let fragile = record("fragile", 8, 0.5);
        let sturdy = record("sturdy", 8, 2.0);

        let mut all = vec![sturdy.clone(), fragile.clone(), overdue.clone()];
        all.sort_by(|a, b| compare_due(a, b, day));

        let order: Vec<&str> = all.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(order, vec!["more overdue", "fragile", "sturdy"]);
    }

    #[test]
    fn test_selection_size() {
        assert_eq!(selection_size(0, 3, 5), 0);
        assert_eq!(selection_size(2, 3, 5), 2);
        assert_eq!(selection_size(4, 3, 5), 4);
        assert_eq!(selection_size(9, 3, 5), 5);
        // inverted bounds never panic
        assert_eq!(selection_size(9, 6, 2), 2);
    }

    #[test]
    fn test_leniency_first_miss() {
        let policy = LeniencyPolicy::default();
        let record = record("salamat po", 10, 1.0);
        assert_eq!(policy.recent_misses(&record, 10), 0);
        assert!(policy.should_retry(&record, 10));
    }

    #[test]
    fn test_leniency_repeated_miss() {
        let policy = LeniencyPolicy::default();
        let mut record = record("salamat po", 7, 1.0);
        record.appearances = vec![8, 9, 10];
        record.last_seen_day = 10;

        assert_eq!(policy.recent_misses(&record, 10), 3);
        assert!(!policy.should_retry(&record, 10));

        policy.apply_penalty(&mut record, 10);
        assert!((record.stability - 0.9).abs() < 1e-9);
        assert_eq!(record.next_review_day, 12);
    }

    #[test]
    fn test_leniency_recently_due_is_forgiven() {
        let policy = LeniencyPolicy::default();
        let mut record = record("salamat po", 9, 1.0);
        record.appearances = vec![8, 9, 10];

        // three recent appearances, but only one day past due
        assert!(policy.should_retry(&record, 10));
    }

    #[test]
    fn test_penalty_respects_floor() {
        let policy = LeniencyPolicy::default();
        let mut record = record("salamat po", 1, MIN_STABILITY);
        policy.apply_penalty(&mut record, 10);
        assert_eq!(record.stability, MIN_STABILITY);
    }
}
