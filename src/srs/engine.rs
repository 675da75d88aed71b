//! Scheduling engine: registers phrases, credits reviews and picks the
//! phrases due on a given day.
//!
//! The engine holds no schedule state of its own. Every operation takes the
//! [`ScheduleStore`] it works on, and every mutating operation persists the
//! store before returning.

use super::algorithm::{calculate_next_review, compare_due, selection_size, ReviewResult};
use super::models::{Day, PhraseRecord, PhraseState, ScheduleStats};
use super::storage::ScheduleStore;
use crate::error::{Result, SrsError};
use crate::quality::{normalize_phrase, QualityGate, Rejection};
use crate::strategy::StrategyParameters;

/// What an update did to the schedule
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Turned away by the quality gate; the schedule is untouched
    Rejected(Rejection),
    /// First sighting, due immediately
    Added,
    /// Known phrase presented again
    Reviewed(ReviewResult),
}

#[derive(Debug, Default)]
pub struct SchedulingEngine {
    gate: QualityGate,
}

impl SchedulingEngine {
    pub fn new(gate: QualityGate) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> &QualityGate {
        &self.gate
    }

    /// Add or update a single phrase presented on `day`, then persist
    pub fn update(
        &self,
        store: &mut ScheduleStore,
        phrase: &str,
        day: Day,
        params: Option<&StrategyParameters>,
    ) -> Result<UpdateOutcome> {
        let outcome = self.apply_update(store, phrase, day, params);
        store.advance_to(day);
        store.save()?;
        Ok(outcome)
    }

    /// Add or update a batch of phrases presented on the same day.
    ///
    /// `day` defaults to the day after the store's current day. Blank entries
    /// are skipped. The store is persisted once for the whole batch.
    pub fn add_collocations<S: AsRef<str>>(
        &self,
        store: &mut ScheduleStore,
        phrases: &[S],
        day: Option<Day>,
        params: Option<&StrategyParameters>,
    ) -> Result<Vec<(String, UpdateOutcome)>> {
        let day = day.unwrap_or_else(|| store.current_day().saturating_add(1));

        let mut outcomes = Vec::with_capacity(phrases.len());
        for phrase in phrases {
            let phrase = phrase.as_ref();
            if phrase.trim().is_empty() {
                continue;
            }
            let outcome = self.apply_update(store, phrase, day, params);
            outcomes.push((phrase.to_string(), outcome));
        }

        store.advance_to(day);
        store.save()?;
        Ok(outcomes)
    }

    fn apply_update(
        &self,
        store: &mut ScheduleStore,
        phrase: &str,
        day: Day,
        params: Option<&StrategyParameters>,
    ) -> UpdateOutcome {
        let key = match self.gate.evaluate(phrase) {
            Ok(key) if !key.is_empty() => key,
            Ok(_) => return UpdateOutcome::Rejected(Rejection::TooShort),
            Err(reason) => {
                log::debug!("Dropping phrase '{}': {}", phrase.trim(), reason);
                return UpdateOutcome::Rejected(reason);
            }
        };

        match self.record_review(store, &key, day, params) {
            Some(result) => UpdateOutcome::Reviewed(result),
            None => {
                store.insert(PhraseRecord::new(key, day));
                UpdateOutcome::Added
            }
        }
    }

    /// Credit a presentation of an already scheduled phrase.
    ///
    /// Does not consult the quality gate and does not persist. Returns `None`
    /// when the phrase is not in the schedule.
    pub fn record_review(
        &self,
        store: &mut ScheduleStore,
        phrase: &str,
        day: Day,
        params: Option<&StrategyParameters>,
    ) -> Option<ReviewResult> {
        let record = store.get_mut(&normalize_phrase(phrase))?;

        let pos = record.appearances.partition_point(|&seen| seen <= day);
        record.appearances.insert(pos, day);
        record.last_seen_day = record.last_seen_day.max(day);
        record.review_count += 1;

        let result = calculate_next_review(record.stability, record.review_count, day, params);
        record.next_review_day = result.next_review_day.max(record.last_seen_day);
        record.stability = result.stability;

        log::debug!(
            "Reviewed '{}': next review day {}, stability {:.2}",
            record.text,
            record.next_review_day,
            record.stability
        );

        Some(result)
    }

    /// Phrases due on `day`, most urgent first.
    ///
    /// With a strategy, its `min_review_items` and
    /// `min_review_items + max_new_items` replace the caller's bounds. Never
    /// pads the result with phrases that are not due.
    pub fn due_collocations(
        &self,
        store: &ScheduleStore,
        day: Day,
        min_items: usize,
        max_items: usize,
        params: Option<&StrategyParameters>,
    ) -> Vec<String> {
        let (min_items, max_items) = match params {
            Some(p) => (p.min_review_items, p.max_items()),
            None => (min_items, max_items),
        };

        let mut candidates: Vec<&PhraseRecord> =
            store.records().filter(|r| r.is_due(day)).collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        candidates.sort_by(|a, b| compare_due(a, b, day));
        let count = selection_size(candidates.len(), min_items, max_items);

        candidates
            .into_iter()
            .take(count)
            .map(|r| r.text.clone())
            .collect()
    }

    /// Learning state of a scheduled phrase
    pub fn state_of(&self, store: &ScheduleStore, phrase: &str, day: Day) -> Result<PhraseState> {
        store
            .get(&normalize_phrase(phrase))
            .map(|r| r.state(day))
            .ok_or_else(|| SrsError::NotFound(format!("collocation '{}'", phrase.trim())))
    }

    pub fn all_collocations(&self, store: &ScheduleStore) -> Vec<String> {
        store.records().map(|r| r.text.clone()).collect()
    }

    pub fn stats(&self, store: &ScheduleStore, day: Day) -> ScheduleStats {
        let mut stats = ScheduleStats {
            current_day: store.current_day(),
            total: store.len(),
            ..ScheduleStats::default()
        };

        for record in store.records() {
            match record.state(day) {
                PhraseState::New => stats.new += 1,
                PhraseState::Learning => stats.learning += 1,
                PhraseState::Reviewing => stats.reviewing += 1,
                PhraseState::Mastered => stats.mastered += 1,
            }
            if record.is_due(day) {
                stats.due += 1;
            }
        }

        stats
    }
}
