//! Usage verification for generated content
//!
//! - `extractor`: locating a day's artifact and pulling phrases out of it
//! - `validator`: comparing what was provided with what was actually used

pub mod extractor;
pub mod validator;

pub use extractor::{
    infer_day_number, ArtifactPhrases, ManualLogExtractor, PhraseExtractor, StoryArchive,
    StoryCollocations, TaggedLineExtractor, UsageExtractor,
};
pub use validator::{
    normalize_for_comparison, provided_for_day, save_analysis, usage_report, UsageAnalysis,
    UsageComparison, UsageReport, UsageValidator,
};
