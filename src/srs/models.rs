//! Data models for the collocation schedule
//!
//! Field names follow the persisted document format, so these types are
//! serialized as-is (snake_case).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::algorithm::{INITIAL_STABILITY, MASTERY_HORIZON_DAYS, MIN_STABILITY};

/// Curriculum day counter
pub type Day = u32;

/// Day a fresh store starts on
pub const FIRST_DAY: Day = 1;

fn default_stability() -> f64 {
    INITIAL_STABILITY
}

/// Review history and schedule of one normalized phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseRecord {
    pub text: String,
    pub first_seen_day: Day,
    pub last_seen_day: Day,
    /// Days the phrase was presented, ascending
    #[serde(default)]
    pub appearances: Vec<Day>,
    /// Presentations after the first one
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub next_review_day: Day,
    #[serde(default = "default_stability")]
    pub stability: f64,
}

impl PhraseRecord {
    /// A phrase seen for the first time, due immediately
    pub fn new(text: String, day: Day) -> Self {
        Self {
            text,
            first_seen_day: day,
            last_seen_day: day,
            appearances: vec![day],
            review_count: 0,
            next_review_day: day,
            stability: INITIAL_STABILITY,
        }
    }

    pub fn is_due(&self, day: Day) -> bool {
        self.next_review_day <= day
    }

    /// Days past the scheduled review (negative when not yet due)
    pub fn days_overdue(&self, day: Day) -> i64 {
        i64::from(day) - i64::from(self.next_review_day)
    }

    /// Derived learning state; never stored
    pub fn state(&self, current_day: Day) -> PhraseState {
        if self.review_count == 0 {
            PhraseState::New
        } else if self.next_review_day > current_day.saturating_add(MASTERY_HORIZON_DAYS) {
            PhraseState::Mastered
        } else if self.review_count >= 3 {
            PhraseState::Reviewing
        } else {
            PhraseState::Learning
        }
    }

    /// Fold another record for the same phrase into this one.
    ///
    /// Call [`PhraseRecord::repair`] afterwards to recompute the counters.
    pub(crate) fn absorb(&mut self, other: PhraseRecord) {
        self.appearances.extend(other.appearances);
        self.next_review_day = self.next_review_day.max(other.next_review_day);
        if other.stability > self.stability {
            self.stability = other.stability;
        }
    }

    /// Restore the record invariants after loading a hand-edited document.
    ///
    /// Returns true when anything had to change.
    pub fn repair(&mut self) -> bool {
        let before = self.clone();

        if self.appearances.is_empty() {
            self.appearances.push(self.first_seen_day);
        }
        self.appearances.sort_unstable();
        if let (Some(&first), Some(&last)) = (self.appearances.first(), self.appearances.last()) {
            self.first_seen_day = first;
            self.last_seen_day = last;
        }
        self.review_count = (self.appearances.len() - 1) as u32;
        self.next_review_day = self.next_review_day.max(self.last_seen_day);
        if !self.stability.is_finite() {
            self.stability = INITIAL_STABILITY;
        }
        self.stability = self.stability.max(MIN_STABILITY);

        *self != before
    }
}

/// Where a phrase is in its learning trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhraseState {
    /// Presented once, never reviewed
    New,
    /// Reviewed, fewer than three times
    Learning,
    /// Reviewed three or more times
    Reviewing,
    /// Next review more than a week away
    Mastered,
}

impl fmt::Display for PhraseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Reviewing => "reviewing",
            Self::Mastered => "mastered",
        };
        f.write_str(name)
    }
}

fn default_current_day() -> Day {
    FIRST_DAY
}

/// The persisted schedule document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    #[serde(default = "default_current_day")]
    pub current_day: Day,
    #[serde(default)]
    pub collocations: BTreeMap<String, PhraseRecord>,
}

impl Default for ScheduleDocument {
    fn default() -> Self {
        Self {
            current_day: FIRST_DAY,
            collocations: BTreeMap::new(),
        }
    }
}

/// Counts over the whole schedule for one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStats {
    pub current_day: Day,
    pub total: usize,
    pub new: usize,
    pub learning: usize,
    pub reviewing: usize,
    pub mastered: usize,
    pub due: usize,
}
