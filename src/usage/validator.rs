//! Usage validation: which of the requested phrases actually made it into
//! the generated content.
//!
//! Comparison is plain set arithmetic over normalized phrases and never
//! touches the schedule.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::extractor::UsageExtractor;
use crate::error::Result;
use crate::quality::normalize_phrase;
use crate::srs::{Day, ScheduleStore, SchedulingEngine};

/// Upper bound on the due list assumed to have been provided for a day when
/// the caller does not say
pub const DEFAULT_PROVIDED_LIMIT: usize = 20;

/// Case-fold, trim, strip punctuation and collapse whitespace.
///
/// Same key the schedule stores phrases under, so a comparison result can be
/// looked up in the store directly.
pub fn normalize_for_comparison(phrase: &str) -> String {
    normalize_phrase(phrase)
}

/// Normalized phrases in first-seen order, each paired with its original form
fn normalized_unique(phrases: &[String]) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    phrases
        .iter()
        .filter_map(|original| {
            let key = normalize_for_comparison(original);
            if key.is_empty() || !seen.insert(key.clone()) {
                return None;
            }
            Some((key, original.clone()))
        })
        .collect()
}

/// Provided-versus-found comparison for one artifact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageComparison {
    /// Phrases the scheduler handed to the generator
    pub provided: Vec<String>,
    /// Phrases found in the generated artifact
    pub actual: Vec<String>,
    /// Provided and found
    pub used: Vec<String>,
    /// Provided but not found
    pub unused: Vec<String>,
    /// Found but never provided
    pub unexpected: Vec<String>,
    /// |used| / |provided|, 0 when nothing was provided
    pub usage_rate: f64,
    /// |used| / |actual|, 0 when nothing was found
    pub match_rate: f64,
}

impl UsageComparison {
    /// Whether a provided phrase was found in the artifact
    pub fn was_used(&self, phrase: &str) -> bool {
        let key = normalize_for_comparison(phrase);
        self.used.iter().any(|u| normalize_for_comparison(u) == key)
    }
}

/// One day's usage comparison with its provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageAnalysis {
    pub day: Day,
    pub artifact: PathBuf,
    pub analysis_date: DateTime<Utc>,
    #[serde(flatten)]
    pub comparison: UsageComparison,
}

/// Totals across several days of analyses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub days_analyzed: usize,
    pub provided: usize,
    pub used: usize,
    pub found: usize,
    pub overall_usage_rate: f64,
    pub overall_match_rate: f64,
    pub average_usage_rate: f64,
    pub average_match_rate: f64,
}

pub struct UsageValidator {
    extractor: UsageExtractor,
}

impl UsageValidator {
    pub fn new(extractor: UsageExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &UsageExtractor {
        &self.extractor
    }

    /// Compare provided phrases against those found in an artifact.
    ///
    /// Both lists are normalized and treated as sets. Result lists keep the
    /// caller's spelling and first-seen order.
    pub fn compare(provided: &[String], actual: &[String]) -> UsageComparison {
        let provided_set = normalized_unique(provided);
        let actual_set = normalized_unique(actual);

        let provided_keys: HashSet<&str> = provided_set.iter().map(|(k, _)| k.as_str()).collect();
        let actual_keys: HashSet<&str> = actual_set.iter().map(|(k, _)| k.as_str()).collect();

        let (used, unused): (Vec<_>, Vec<_>) = provided_set
            .iter()
            .partition(|(key, _)| actual_keys.contains(key.as_str()));
        let used: Vec<String> = used.into_iter().map(|(_, orig)| orig.clone()).collect();
        let unused: Vec<String> = unused.into_iter().map(|(_, orig)| orig.clone()).collect();
        let unexpected: Vec<String> = actual_set
            .iter()
            .filter(|(key, _)| !provided_keys.contains(key.as_str()))
            .map(|(_, orig)| orig.clone())
            .collect();

        let rate = |n: usize, d: usize| if d == 0 { 0.0 } else { n as f64 / d as f64 };

        UsageComparison {
            usage_rate: rate(used.len(), provided_set.len()),
            match_rate: rate(used.len(), actual_set.len()),
            provided: provided.to_vec(),
            actual: actual.to_vec(),
            used,
            unused,
            unexpected,
        }
    }

    /// Validate the artifact for `day` against the phrases provided for it.
    ///
    /// Fails with `NotFound` when the artifact cannot be located.
    pub fn validate_day(
        &self,
        day: Day,
        artifact: Option<&Path>,
        provided: &[String],
    ) -> Result<UsageAnalysis> {
        let found = self.extractor.extract_for_day(day, artifact)?;

        Ok(UsageAnalysis {
            day,
            artifact: found.artifact,
            analysis_date: Utc::now(),
            comparison: Self::compare(provided, &found.phrases),
        })
    }

    /// Validate the last `days` days up to the store's current day, using each
    /// day's due list as the provided phrases. Days without an artifact are
    /// skipped.
    pub fn validate_recent_days(
        &self,
        engine: &SchedulingEngine,
        store: &ScheduleStore,
        days: u32,
    ) -> Vec<UsageAnalysis> {
        if days == 0 {
            return Vec::new();
        }
        let current = store.current_day();
        let first = current.saturating_sub(days.saturating_sub(1)).max(1);

        let mut analyses = Vec::new();
        for day in first..=current {
            let provided = provided_for_day(engine, store, day);
            match self.validate_day(day, None, &provided) {
                Ok(analysis) => {
                    log::info!(
                        "Validated day {}: {:.1}% usage rate",
                        day,
                        analysis.comparison.usage_rate * 100.0
                    );
                    analyses.push(analysis);
                }
                Err(e) => log::warn!("Could not validate day {}: {}", day, e),
            }
        }
        analyses
    }
}

/// Phrases assumed to have been provided for `day` when the caller did not
/// record them
pub fn provided_for_day(engine: &SchedulingEngine, store: &ScheduleStore, day: Day) -> Vec<String> {
    engine.due_collocations(store, day, 0, DEFAULT_PROVIDED_LIMIT, None)
}

/// Aggregate statistics over several analyses
pub fn usage_report(analyses: &[UsageAnalysis]) -> UsageReport {
    if analyses.is_empty() {
        return UsageReport::default();
    }

    let mut report = UsageReport {
        days_analyzed: analyses.len(),
        ..UsageReport::default()
    };

    for analysis in analyses {
        let c = &analysis.comparison;
        report.provided += c.used.len() + c.unused.len();
        report.used += c.used.len();
        report.found += c.used.len() + c.unexpected.len();
        report.average_usage_rate += c.usage_rate;
        report.average_match_rate += c.match_rate;
    }

    let n = analyses.len() as f64;
    report.average_usage_rate /= n;
    report.average_match_rate /= n;
    if report.provided > 0 {
        report.overall_usage_rate = report.used as f64 / report.provided as f64;
    }
    if report.found > 0 {
        report.overall_match_rate = report.used as f64 / report.found as f64;
    }

    report
}

/// Write an analysis to `{dir}/day_{N}_srs_usage.json` (atomic)
pub fn save_analysis(analysis: &UsageAnalysis, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("day_{}_srs_usage.json", analysis.day));
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, serde_json::to_string_pretty(analysis)?)?;
    fs::rename(&tmp_path, &path)?;
    log::info!("Saved usage analysis to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityGate;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compare_basic_sets() {
        let c = UsageValidator::compare(&strings(&["a", "b"]), &strings(&["a", "c"]));

        assert_eq!(c.used, strings(&["a"]));
        assert_eq!(c.unused, strings(&["b"]));
        assert_eq!(c.unexpected, strings(&["c"]));
        assert_eq!(c.usage_rate, 0.5);
        assert_eq!(c.match_rate, 0.5);
    }

    #[test]
    fn test_compare_normalizes() {
        let c = UsageValidator::compare(
            &strings(&["Salamat po", "pwede po ba", "pwede  po ba"]),
            &strings(&["salamat po!", "  Magandang umaga po. "]),
        );

        assert_eq!(c.used, strings(&["Salamat po"]));
        assert_eq!(c.unused, strings(&["pwede po ba"]));
        assert_eq!(c.unexpected, strings(&["  Magandang umaga po. "]));
        assert_eq!(c.usage_rate, 0.5);
        assert!(c.was_used("salamat po"));
        assert!(!c.was_used("pwede po ba"));
    }

    #[test]
    fn test_compare_empty_inputs() {
        let c = UsageValidator::compare(&[], &[]);
        assert_eq!(c.usage_rate, 0.0);
        assert_eq!(c.match_rate, 0.0);

        let c = UsageValidator::compare(&strings(&["salamat po"]), &[]);
        assert_eq!(c.unused, strings(&["salamat po"]));
        assert_eq!(c.match_rate, 0.0);
    }

    #[test]
    fn test_normalize_keeps_filipino_letters() {
        assert_eq!(normalize_for_comparison(" Señor, (po)! "), "señor po");
    }

    #[test]
    fn test_validate_day_and_save() {
        let temp = TempDir::new().unwrap();
        let stories = temp.path().join("stories");
        fs::create_dir_all(&stories).unwrap();
        fs::write(
            stories.join("story_day2_market.txt"),
            "[TAGALOG-FEMALE-1]: salamat po\n[TAGALOG-MALE-1]: magkano po ito\n",
        )
        .unwrap();

        let validator = UsageValidator::new(UsageExtractor::for_stories(stories));
        let analysis = validator
            .validate_day(2, None, &strings(&["salamat po", "pwede po ba"]))
            .unwrap();

        assert_eq!(analysis.comparison.used, strings(&["salamat po"]));
        assert_eq!(analysis.comparison.unexpected, strings(&["magkano po ito"]));

        let path = save_analysis(&analysis, &temp.path().join("analysis")).unwrap();
        assert!(path.ends_with("day_2_srs_usage.json"));
        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["day"], 2);
        assert_eq!(saved["usage_rate"], 0.5);

        assert!(validator.validate_day(3, None, &[]).unwrap_err().is_not_found());
    }

    #[test]
    fn test_validate_recent_days_skips_missing() {
        let temp = TempDir::new().unwrap();
        let stories = temp.path().join("stories");
        fs::create_dir_all(&stories).unwrap();
        fs::write(stories.join("story_day3_x.txt"), "[TAGALOG-MALE-1]: pwede po ba\n").unwrap();

        let engine = SchedulingEngine::new(QualityGate::strict());
        let mut store = ScheduleStore::open(temp.path().join("srs_status.json")).unwrap();
        engine.update(&mut store, "pwede po ba", 3, None).unwrap();

        let validator = UsageValidator::new(UsageExtractor::for_stories(stories));
        let analyses = validator.validate_recent_days(&engine, &store, 5);

        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].day, 3);
        assert_eq!(analyses[0].comparison.usage_rate, 1.0);
    }

    #[test]
    fn test_validate_zero_recent_days() {
        let temp = TempDir::new().unwrap();
        let stories = temp.path().join("stories");
        fs::create_dir_all(&stories).unwrap();
        fs::write(stories.join("story_day3_x.txt"), "[TAGALOG-MALE-1]: pwede po ba\n").unwrap();

        let engine = SchedulingEngine::new(QualityGate::strict());
        let mut store = ScheduleStore::open(temp.path().join("srs_status.json")).unwrap();
        engine.update(&mut store, "pwede po ba", 3, None).unwrap();
        assert_eq!(store.current_day(), 3);

        let validator = UsageValidator::new(UsageExtractor::for_stories(stories));
        assert!(validator.validate_recent_days(&engine, &store, 0).is_empty());
        assert_eq!(validator.validate_recent_days(&engine, &store, 1).len(), 1);
    }

    #[test]
    fn test_usage_report() {
        let make = |day, provided: &[&str], actual: &[&str]| UsageAnalysis {
            day,
            artifact: PathBuf::from("story.txt"),
            analysis_date: Utc::now(),
            comparison: UsageValidator::compare(&strings(provided), &strings(actual)),
        };

        let report = usage_report(&[
            make(1, &["a", "b"], &["a", "c"]),
            make(2, &["d", "e"], &["d", "e"]),
        ]);

        assert_eq!(report.days_analyzed, 2);
        assert_eq!(report.provided, 4);
        assert_eq!(report.used, 3);
        assert_eq!(report.found, 4);
        assert_eq!(report.overall_usage_rate, 0.75);
        assert_eq!(report.average_usage_rate, 0.75);
        assert_eq!(report.average_match_rate, 0.75);

        assert_eq!(usage_report(&[]), UsageReport::default());
    }
}
