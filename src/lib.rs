//! Spaced-repetition scheduling for collocations, with review credit granted
//! only for phrases verifiably used in the generated content.

pub mod config;
pub mod error;
pub mod feedback;
pub mod quality;
pub mod session;
pub mod srs;
pub mod strategy;
pub mod usage;

pub use config::SrsConfig;
pub use error::{ErrorKind, Result, SrsError};
pub use feedback::{Effectiveness, FeedbackApplier, FeedbackReport, FeedbackResult};
pub use quality::{GateMode, QualityGate, Rejection};
pub use session::{BatchReport, ContentGenerator, GenerationRequest, ReviewSession, SessionOutcome};
pub use srs::{
    Day, LeniencyPolicy, PhraseRecord, PhraseState, ScheduleStats, ScheduleStore,
    SchedulingEngine, UpdateOutcome,
};
pub use strategy::{ContentStrategy, StrategyCatalog, StrategyParameters};
pub use usage::{UsageAnalysis, UsageComparison, UsageExtractor, UsageValidator};
