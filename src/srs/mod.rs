//! Spaced repetition schedule for collocations
//!
//! This module provides:
//! - Phrase records and their derived learning states
//! - Interval, ranking and leniency rules
//! - The persisted schedule store
//! - The scheduling engine (add/update, due selection, stats)

pub mod algorithm;
pub mod engine;
pub mod models;
pub mod storage;

pub use algorithm::{LeniencyPolicy, ReviewResult};
pub use engine::{SchedulingEngine, UpdateOutcome};
pub use models::*;
pub use storage::ScheduleStore;
