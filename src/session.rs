//! End-to-end review session
//!
//! One day of the loop: pick the due phrases, hand them to the content
//! generator, store what it wrote, find out which phrases it really used and
//! credit only those.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{DueDefaults, SrsConfig};
use crate::error::Result;
use crate::feedback::{FeedbackApplier, FeedbackResult};
use crate::quality::QualityGate;
use crate::srs::{Day, ScheduleStore, SchedulingEngine, UpdateOutcome};
use crate::strategy::{StrategyCatalog, StrategyParameters};
use crate::usage::{save_analysis, UsageExtractor, UsageValidator};

/// What the generator is asked to produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub day: Day,
    /// Scheduled phrases the content should reuse
    pub review_phrases: Vec<String>,
    pub strategy: Option<StrategyParameters>,
}

/// Boundary to whatever writes the day's content
pub trait ContentGenerator {
    fn generate(&mut self, request: &GenerationRequest) -> Result<String>;
}

/// Result of one completed day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub day: Day,
    pub review_phrases: Vec<String>,
    pub artifact: PathBuf,
    pub analysis_path: Option<PathBuf>,
    pub feedback: FeedbackResult,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub completed: Vec<SessionOutcome>,
    /// Days that failed and why
    pub failed: Vec<(Day, String)>,
}

pub struct ReviewSession {
    engine: SchedulingEngine,
    store: ScheduleStore,
    generator: Box<dyn ContentGenerator>,
    applier: FeedbackApplier,
    catalog: StrategyCatalog,
    due: DueDefaults,
    analysis_dir: Option<PathBuf>,
}

impl ReviewSession {
    pub fn new(
        engine: SchedulingEngine,
        store: ScheduleStore,
        generator: Box<dyn ContentGenerator>,
        applier: FeedbackApplier,
    ) -> Self {
        Self {
            engine,
            store,
            generator,
            applier,
            catalog: StrategyCatalog::new(),
            due: DueDefaults::default(),
            analysis_dir: None,
        }
    }

    /// Build a session from configuration, opening (or creating) the store
    pub fn from_config(config: &SrsConfig, generator: Box<dyn ContentGenerator>) -> Result<Self> {
        let gate = QualityGate::new(config.gate_mode).with_denylist(&config.denylist);
        let store = ScheduleStore::open(config.store_path()?)?;
        let validator = UsageValidator::new(UsageExtractor::for_stories(config.stories_dir()?));

        Ok(Self {
            engine: SchedulingEngine::new(gate),
            store,
            generator,
            applier: FeedbackApplier::new(validator, config.leniency),
            catalog: config.strategies(),
            due: config.due,
            analysis_dir: Some(config.analysis_dir()?),
        })
    }

    pub fn engine(&self) -> &SchedulingEngine {
        &self.engine
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    pub fn applier(&self) -> &FeedbackApplier {
        &self.applier
    }

    /// Register newly taught phrases through the quality gate
    pub fn introduce<S: AsRef<str>>(
        &mut self,
        phrases: &[S],
        day: Option<Day>,
    ) -> Result<Vec<(String, UpdateOutcome)>> {
        self.engine
            .add_collocations(&mut self.store, phrases, day, None)
    }

    /// Run the loop for one day
    pub fn run_day(&mut self, day: Day, strategy: Option<&str>) -> Result<SessionOutcome> {
        let params = self.catalog.resolve(strategy);
        let review_phrases = self.engine.due_collocations(
            &self.store,
            day,
            self.due.min_items,
            self.due.max_items,
            params.as_ref(),
        );
        log::info!("Day {}: {} phrases due for review", day, review_phrases.len());

        let request = GenerationRequest {
            day,
            review_phrases: review_phrases.clone(),
            strategy: params,
        };
        let content = self.generator.generate(&request)?;

        let validator = self.applier.validator();
        let artifact = validator.extractor().archive().store_generated(day, &content)?;
        let analysis = validator.validate_day(day, Some(&artifact), &review_phrases)?;

        let analysis_path = match &self.analysis_dir {
            Some(dir) => match save_analysis(&analysis, dir) {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("Could not save usage analysis for day {}: {}", day, e);
                    None
                }
            },
            None => None,
        };

        let feedback = self.applier.apply(
            &self.engine,
            &mut self.store,
            &analysis.comparison,
            day,
            params.as_ref(),
            Some(artifact.clone()),
        )?;

        Ok(SessionOutcome {
            day,
            review_phrases,
            artifact,
            analysis_path,
            feedback,
        })
    }

    /// Run several days. A failing day is logged and recorded; the rest still run.
    pub fn run_days(&mut self, days: RangeInclusive<Day>, strategy: Option<&str>) -> BatchReport {
        let mut report = BatchReport::default();
        for day in days {
            match self.run_day(day, strategy) {
                Ok(outcome) => report.completed.push(outcome),
                Err(e) => {
                    log::error!("Day {} failed: {}", day, e);
                    report.failed.push((day, e.to_string()));
                }
            }
        }
        report
    }
}
