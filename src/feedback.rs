//! Usage-credited feedback
//!
//! A phrase handed to the generator only counts as reviewed when it shows up
//! in the content that was produced. Missed phrases are retried, and only
//! repeatedly missed, overdue ones lose stability.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::quality::normalize_phrase;
use crate::srs::{Day, LeniencyPolicy, ScheduleStore, SchedulingEngine};
use crate::strategy::StrategyParameters;
use crate::usage::{
    provided_for_day, usage_report, UsageComparison, UsageReport, UsageValidator,
};

/// Overall usage below this rate means the loop needs attention
pub const EFFECTIVENESS_THRESHOLD: f64 = 0.3;

/// What feedback did for one day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResult {
    pub day: Day,
    pub artifact: Option<PathBuf>,
    pub provided: Vec<String>,
    pub used: Vec<String>,
    pub unused: Vec<String>,
    /// Found in the artifact but never requested; reported only
    pub unexpected: Vec<String>,
    /// Credited as genuine reviews
    pub marked_as_reviewed: Vec<String>,
    /// Left due for another try (includes penalised phrases)
    pub kept_for_retry: Vec<String>,
    pub penalty_applied: Vec<String>,
    /// Not in the schedule
    pub ignored: Vec<String>,
    pub usage_rate: f64,
    /// Whether any schedule record changed
    pub feedback_applied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effectiveness {
    Good,
    NeedsImprovement,
}

impl std::fmt::Display for Effectiveness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effectiveness::Good => write!(f, "good"),
            Effectiveness::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}

/// One day's line in a feedback report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub day: Day,
    pub provided_count: usize,
    pub used_count: usize,
    pub found_count: usize,
    pub usage_rate: f64,
    pub match_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub period_days: u32,
    pub daily: Vec<DailyUsage>,
    pub summary: UsageReport,
    /// None when no day could be analyzed
    pub effectiveness: Option<Effectiveness>,
}

pub struct FeedbackApplier {
    validator: UsageValidator,
    leniency: LeniencyPolicy,
}

impl FeedbackApplier {
    pub fn new(validator: UsageValidator, leniency: LeniencyPolicy) -> Self {
        Self {
            validator,
            leniency,
        }
    }

    pub fn validator(&self) -> &UsageValidator {
        &self.validator
    }

    pub fn leniency(&self) -> &LeniencyPolicy {
        &self.leniency
    }

    /// Locate and read the artifact for `day`, compare it with what was
    /// provided, then apply feedback.
    ///
    /// `provided` defaults to the day's due list. A missing artifact fails
    /// with `NotFound` before anything in the schedule changes.
    pub fn apply_for_day(
        &self,
        engine: &SchedulingEngine,
        store: &mut ScheduleStore,
        day: Day,
        artifact: Option<&Path>,
        provided: Option<&[String]>,
        params: Option<&StrategyParameters>,
    ) -> Result<FeedbackResult> {
        let provided = match provided {
            Some(list) => list.to_vec(),
            None => provided_for_day(engine, store, day),
        };

        let analysis = self.validator.validate_day(day, artifact, &provided)?;
        self.apply(
            engine,
            store,
            &analysis.comparison,
            day,
            params,
            Some(analysis.artifact),
        )
    }

    /// Apply a finished comparison to the schedule and persist once
    pub fn apply(
        &self,
        engine: &SchedulingEngine,
        store: &mut ScheduleStore,
        comparison: &UsageComparison,
        day: Day,
        params: Option<&StrategyParameters>,
        artifact: Option<PathBuf>,
    ) -> Result<FeedbackResult> {
        let mut result = FeedbackResult {
            day,
            artifact,
            provided: comparison.provided.clone(),
            used: comparison.used.clone(),
            unused: comparison.unused.clone(),
            unexpected: comparison.unexpected.clone(),
            usage_rate: comparison.usage_rate,
            ..FeedbackResult::default()
        };

        for phrase in &comparison.used {
            let Some(key) = resolve_key(store, phrase) else {
                log::warn!("Collocation '{}' is not scheduled, ignoring", phrase);
                result.ignored.push(phrase.clone());
                continue;
            };
            if engine.record_review(store, &key, day, params).is_some() {
                result.marked_as_reviewed.push(key);
            }
        }

        for phrase in &comparison.unused {
            let Some(key) = resolve_key(store, phrase) else {
                log::warn!("Collocation '{}' is not scheduled, ignoring", phrase);
                result.ignored.push(phrase.clone());
                continue;
            };
            let Some(record) = store.get_mut(&key) else {
                continue;
            };

            if !self.leniency.should_retry(record, day) {
                self.leniency.apply_penalty(record, day);
                log::debug!(
                    "Penalised '{}': stability {:.2}, next review day {}",
                    key,
                    record.stability,
                    record.next_review_day
                );
                result.penalty_applied.push(key.clone());
            }
            result.kept_for_retry.push(key);
        }

        result.feedback_applied =
            !result.marked_as_reviewed.is_empty() || !result.penalty_applied.is_empty();

        store.advance_to(day);
        store.save()?;

        log::info!(
            "Day {} feedback: {} reviewed, {} kept for retry, {} penalised ({:.1}% usage)",
            day,
            result.marked_as_reviewed.len(),
            result.kept_for_retry.len(),
            result.penalty_applied.len(),
            result.usage_rate * 100.0
        );

        Ok(result)
    }

    /// Usage over the last `days` days and whether the loop is working
    pub fn feedback_report(
        &self,
        engine: &SchedulingEngine,
        store: &ScheduleStore,
        days: u32,
    ) -> FeedbackReport {
        let analyses = self.validator.validate_recent_days(engine, store, days);

        let daily = analyses
            .iter()
            .map(|a| {
                let c = &a.comparison;
                DailyUsage {
                    day: a.day,
                    provided_count: c.used.len() + c.unused.len(),
                    used_count: c.used.len(),
                    found_count: c.used.len() + c.unexpected.len(),
                    usage_rate: c.usage_rate,
                    match_rate: c.match_rate,
                }
            })
            .collect();

        let summary = usage_report(&analyses);
        let effectiveness = (summary.days_analyzed > 0).then(|| {
            if summary.overall_usage_rate < EFFECTIVENESS_THRESHOLD {
                Effectiveness::NeedsImprovement
            } else {
                Effectiveness::Good
            }
        });

        FeedbackReport {
            period_days: days,
            daily,
            summary,
            effectiveness,
        }
    }
}

/// Schedule key for a phrase as spelled by the generator or the caller
fn resolve_key(store: &ScheduleStore, phrase: &str) -> Option<String> {
    let key = normalize_phrase(phrase);
    store.contains(&key).then_some(key)
}
