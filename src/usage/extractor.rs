//! Phrase extraction from generated artifacts
//!
//! Real phrase extraction (noun phrases, entities, dependency parsing) is an
//! external concern behind [`PhraseExtractor`]. The extractors bundled here
//! only read the speaker-tagged story format or a manual phrase log.
//!
//! Stories are plain text files in the stories directory, named after the
//! day they were generated for:
//! ```text
//! stories/
//! ├── story_day12_market.txt
//! ├── demo-0.0.3-day-4.txt
//! └── story_day13_generated.txt
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SrsError};
use crate::srs::Day;

const KEY_PHRASES_HEADER: &str = "Key Phrases:";
const NATURAL_SPEED_MARKER: &str = "[NARRATOR]: Natural Speed";
const SLOW_SPEED_MARKER: &str = "[NARRATOR]: Slow Speed";

/// Boundary to whatever turns an artifact into candidate phrases
pub trait PhraseExtractor: Send + Sync {
    fn extract(&self, artifact: &str) -> Vec<String>;
}

fn tagged_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[TAGALOG-[^\]]+\]:\s*(.+)$").expect("tagged line pattern is valid"))
}

/// Phrase spoken on a `[TAGALOG-…]: phrase` line, if the line is one
fn tagged_phrase(line: &str) -> Option<String> {
    tagged_line_regex()
        .captures(line.trim())
        .map(|caps| caps[1].trim().to_string())
        .filter(|phrase| !phrase.is_empty())
}

fn push_unique(phrases: &mut Vec<String>, phrase: String) {
    if !phrases.contains(&phrase) {
        phrases.push(phrase);
    }
}

/// Every target-language line of a speaker-tagged story, in order
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggedLineExtractor;

impl PhraseExtractor for TaggedLineExtractor {
    fn extract(&self, artifact: &str) -> Vec<String> {
        let mut phrases = Vec::new();
        for line in artifact.lines() {
            if let Some(phrase) = tagged_phrase(line) {
                push_unique(&mut phrases, phrase);
            }
        }
        phrases
    }
}

/// One phrase per line; blank lines and `#` comments are skipped
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualLogExtractor;

impl PhraseExtractor for ManualLogExtractor {
    fn extract(&self, artifact: &str) -> Vec<String> {
        let mut phrases = Vec::new();
        for line in artifact.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            push_unique(&mut phrases, line.to_string());
        }
        phrases
    }
}

/// Tagged phrases between two section markers
fn section_phrases(content: &str, start: impl Fn(&str) -> bool, end: &str) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut inside = false;

    for line in content.lines().map(str::trim) {
        if !inside {
            inside = start(line);
            continue;
        }
        if line.contains(end) {
            break;
        }
        if let Some(phrase) = tagged_phrase(line) {
            push_unique(&mut phrases, phrase);
        }
    }

    phrases
}

/// Phrases extracted from one story file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryCollocations {
    pub day: Day,
    pub story_file: PathBuf,
    pub extraction_date: DateTime<Utc>,
    /// From the "Key Phrases:" section
    pub key_phrases: Vec<String>,
    /// From the natural-speed dialogue
    pub dialogue_phrases: Vec<String>,
    /// Every tagged phrase in the story
    pub all_phrases: Vec<String>,
    pub total_unique_phrases: usize,
}

impl StoryCollocations {
    pub fn from_content(story_file: PathBuf, content: &str) -> Self {
        let day = infer_day_number(&story_file, content).unwrap_or_else(|| {
            log::warn!(
                "Could not infer day number from {}, using 0",
                story_file.display()
            );
            0
        });

        let key_phrases = section_phrases(
            content,
            |line| line == KEY_PHRASES_HEADER,
            NATURAL_SPEED_MARKER,
        );
        let dialogue_phrases = section_phrases(
            content,
            |line| line.contains(NATURAL_SPEED_MARKER),
            SLOW_SPEED_MARKER,
        );
        let all_phrases = TaggedLineExtractor.extract(content);

        Self {
            day,
            story_file,
            extraction_date: Utc::now(),
            key_phrases,
            dialogue_phrases,
            total_unique_phrases: all_phrases.len(),
            all_phrases,
        }
    }

    /// Read and extract a story file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SrsError::NotFound(format!(
                "story file {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Ok(Self::from_content(path.to_path_buf(), &content))
    }
}

/// Day number from a story file name, falling back to its narrator header
pub fn infer_day_number(path: &Path, content: &str) -> Option<Day> {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    let [story_day, dashed_day, narrator_day, any_number] = PATTERNS.get_or_init(|| {
        [
            Regex::new(r"story_day(\d+)").expect("valid pattern"),
            Regex::new(r"day-(\d+)").expect("valid pattern"),
            Regex::new(r"\[NARRATOR\]:\s*Day\s*(\d+)").expect("valid pattern"),
            Regex::new(r"(\d+)").expect("valid pattern"),
        ]
    });

    fn number(re: &Regex, haystack: &str) -> Option<Day> {
        re.captures(haystack).and_then(|caps| caps[1].parse().ok())
    }

    let file_name = path.file_name()?.to_string_lossy();

    number(story_day, &file_name)
        .or_else(|| number(dashed_day, &file_name))
        .or_else(|| number(narrator_day, content))
        .or_else(|| number(any_number, &file_name))
}

/// Locates the generated story for a day
#[derive(Debug, Clone)]
pub struct StoryArchive {
    stories_dir: PathBuf,
}

impl StoryArchive {
    pub fn new(stories_dir: PathBuf) -> Self {
        Self { stories_dir }
    }

    pub fn stories_dir(&self) -> &Path {
        &self.stories_dir
    }

    /// Path a story generated for `day` is written to
    pub fn generated_path(&self, day: Day) -> PathBuf {
        self.stories_dir.join(format!("story_day{}_generated.txt", day))
    }

    /// Find the story file for a day
    pub fn locate(&self, day: Day) -> Result<PathBuf> {
        if !self.stories_dir.exists() {
            return Err(SrsError::NotFound(format!(
                "stories directory {}",
                self.stories_dir.display()
            )));
        }

        let dir = self.stories_dir.to_str().ok_or_else(|| {
            SrsError::Invalid(format!(
                "stories directory is not valid UTF-8: {}",
                self.stories_dir.display()
            ))
        })?;
        let dir = glob::Pattern::escape(dir);

        let patterns = [
            format!("story_day{}_*.txt", day),
            format!("*day-{}.txt", day),
            format!("*day{}_*.txt", day),
        ];

        for pattern in &patterns {
            let full = format!("{}/{}", dir, pattern);
            let entries = glob::glob(&full)
                .map_err(|e| SrsError::Invalid(format!("bad story pattern {}: {}", full, e)))?;

            let mut matches: Vec<PathBuf> = entries.filter_map(|entry| entry.ok()).collect();
            matches.sort();
            if let Some(path) = matches.into_iter().next() {
                log::info!("Found story file for day {}: {}", day, path.display());
                return Ok(path);
            }
        }

        Err(SrsError::NotFound(format!("No story file found for day {}", day)))
    }

    /// Write a generated story for `day` atomically (write to .tmp then rename)
    pub fn store_generated(&self, day: Day, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.stories_dir)?;
        let path = self.generated_path(day);
        let tmp_path = path.with_extension("txt.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &path)?;
        Ok(path)
    }
}

/// Phrases found in one artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPhrases {
    pub artifact: PathBuf,
    pub phrases: Vec<String>,
}

/// Adapter from a day's generated artifact to the phrases it contains
pub struct UsageExtractor {
    archive: StoryArchive,
    extractor: Box<dyn PhraseExtractor>,
}

impl UsageExtractor {
    pub fn new(archive: StoryArchive, extractor: Box<dyn PhraseExtractor>) -> Self {
        Self { archive, extractor }
    }

    /// Extractor for speaker-tagged stories in `stories_dir`
    pub fn for_stories(stories_dir: PathBuf) -> Self {
        Self::new(StoryArchive::new(stories_dir), Box::new(TaggedLineExtractor))
    }

    pub fn archive(&self) -> &StoryArchive {
        &self.archive
    }

    pub fn extract_text(&self, artifact: &str) -> Vec<String> {
        self.extractor.extract(artifact)
    }

    /// Phrases in the artifact for `day`, or in `artifact` when given.
    ///
    /// Fails with `NotFound` when the artifact cannot be located.
    pub fn extract_for_day(&self, day: Day, artifact: Option<&Path>) -> Result<ArtifactPhrases> {
        let path = match artifact {
            Some(path) if path.exists() => path.to_path_buf(),
            Some(path) => {
                return Err(SrsError::NotFound(format!(
                    "story file {}",
                    path.display()
                )))
            }
            None => self.archive.locate(day)?,
        };

        let content = fs::read_to_string(&path)?;
        Ok(ArtifactPhrases {
            phrases: self.extractor.extract(&content),
            artifact: path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const STORY: &str = "\
[NARRATOR]: Day 4: At the market

Key Phrases:
[TAGALOG-FEMALE-1]: magkano po ito
[TAGALOG-MALE-1]: salamat po
[TAGALOG-FEMALE-1]: magkano po ito

[NARRATOR]: Natural Speed
[TAGALOG-FEMALE-1]: Magandang umaga po!
[ENGLISH-NARRATOR]: Good morning!
[TAGALOG-MALE-1]: magkano po ito

[NARRATOR]: Slow Speed
[TAGALOG-FEMALE-1]: pwede po ba
";

    #[test]
    fn test_tagged_line_extractor() {
        let phrases = TaggedLineExtractor.extract(STORY);
        assert_eq!(
            phrases,
            vec!["magkano po ito", "salamat po", "Magandang umaga po!", "pwede po ba"]
        );
    }

    #[test]
    fn test_manual_log_extractor() {
        let log = "# day 4\nsalamat po\n\n  pwede po ba \nsalamat po\n";
        assert_eq!(
            ManualLogExtractor.extract(log),
            vec!["salamat po", "pwede po ba"]
        );
    }

    #[test]
    fn test_story_sections() {
        let story = StoryCollocations::from_content(PathBuf::from("market.txt"), STORY);

        assert_eq!(story.day, 4);
        assert_eq!(story.key_phrases, vec!["magkano po ito", "salamat po"]);
        assert_eq!(story.dialogue_phrases, vec!["Magandang umaga po!", "magkano po ito"]);
        assert_eq!(story.total_unique_phrases, 4);
    }

    #[test]
    fn test_infer_day_number() {
        assert_eq!(infer_day_number(Path::new("story_day12_market.txt"), ""), Some(12));
        assert_eq!(infer_day_number(Path::new("demo-0.0.3-day-4.txt"), ""), Some(4));
        assert_eq!(
            infer_day_number(Path::new("market.txt"), "[NARRATOR]: Day 7: Hotel"),
            Some(7)
        );
        assert_eq!(infer_day_number(Path::new("lesson9.txt"), ""), Some(9));
        assert_eq!(infer_day_number(Path::new("market.txt"), ""), None);
    }

    #[test]
    fn test_locate_by_day() {
        let temp = TempDir::new().unwrap();
        let archive = StoryArchive::new(temp.path().to_path_buf());

        fs::write(temp.path().join("story_day12_market.txt"), STORY).unwrap();
        fs::write(temp.path().join("demo-0.0.3-day-4.txt"), STORY).unwrap();

        assert_eq!(
            archive.locate(12).unwrap(),
            temp.path().join("story_day12_market.txt")
        );
        assert_eq!(
            archive.locate(4).unwrap(),
            temp.path().join("demo-0.0.3-day-4.txt")
        );
        assert!(archive.locate(1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let temp = TempDir::new().unwrap();
        let archive = StoryArchive::new(temp.path().join("missing"));
        assert!(archive.locate(1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_store_generated_and_extract() {
        let temp = TempDir::new().unwrap();
        let extractor = UsageExtractor::for_stories(temp.path().join("stories"));

        let path = extractor.archive().store_generated(3, STORY).unwrap();
        assert!(path.ends_with("story_day3_generated.txt"));

        let found = extractor.extract_for_day(3, None).unwrap();
        assert_eq!(found.artifact, path);
        assert_eq!(found.phrases.len(), 4);

        let err = extractor
            .extract_for_day(3, Some(&temp.path().join("nope.txt")))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
