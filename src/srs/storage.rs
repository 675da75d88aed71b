//! File persistence for the schedule
//!
//! The whole schedule lives in one JSON document:
//! ```text
//! {data_dir}/
//! └── srs_status.json   # { "current_day": N, "collocations": { text: record } }
//! ```
//!
//! Every save writes `srs_status.json.tmp` and renames it over the document,
//! so a crash mid-write leaves the previous version intact.

use std::collections::{btree_map, BTreeMap};
use std::fs;
use std::path::{Path, PathBuf};

use super::models::{Day, PhraseRecord, ScheduleDocument};
use crate::error::{Result, SrsError};
use crate::quality::normalize_phrase;

/// Owns the schedule document and its location on disk.
///
/// Single writer: callers that share a store across threads must put it
/// behind one `Mutex`.
#[derive(Debug)]
pub struct ScheduleStore {
    path: PathBuf,
    document: ScheduleDocument,
    recovered: Option<String>,
}

impl ScheduleStore {
    /// Open the store at `path`, creating an empty document if none exists.
    ///
    /// An unreadable or unparsable document is replaced by an empty schedule;
    /// the reason is kept in [`ScheduleStore::recovered`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if !path.exists() {
            let store = Self {
                path,
                document: ScheduleDocument::default(),
                recovered: None,
            };
            store.save()?;
            return Ok(store);
        }

        let (document, recovered) = match Self::read_document(&path) {
            Ok(document) => (document, None),
            Err(e) => {
                log::warn!(
                    "Could not load schedule from {}: {}. Starting with a fresh schedule.",
                    path.display(),
                    e
                );
                (ScheduleDocument::default(), Some(e.to_string()))
            }
        };

        Ok(Self {
            path,
            document,
            recovered,
        })
    }

    fn read_document(path: &Path) -> Result<ScheduleDocument> {
        let content = fs::read_to_string(path)
            .map_err(|e| SrsError::Recovered(format!("unreadable schedule: {}", e)))?;
        let mut document: ScheduleDocument = serde_json::from_str(&content)
            .map_err(|e| SrsError::Recovered(format!("malformed schedule: {}", e)))?;

        document.collocations = rekey(std::mem::take(&mut document.collocations));
        for (key, record) in document.collocations.iter_mut() {
            if record.repair() {
                log::warn!("Repaired inconsistent schedule record '{}'", key);
            }
        }

        Ok(document)
    }

    /// Write the full document atomically (write to .tmp then rename)
    pub fn save(&self) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&self.document)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Why the on-disk document was discarded at open, if it was
    pub fn recovered(&self) -> Option<&str> {
        self.recovered.as_deref()
    }

    pub fn document(&self) -> &ScheduleDocument {
        &self.document
    }

    pub fn current_day(&self) -> Day {
        self.document.current_day
    }

    /// Move the day counter forward; it never goes back.
    ///
    /// Returns true when the counter changed.
    pub fn advance_to(&mut self, day: Day) -> bool {
        if day > self.document.current_day {
            self.document.current_day = day;
            true
        } else {
            false
        }
    }

    pub fn get(&self, text: &str) -> Option<&PhraseRecord> {
        self.document.collocations.get(text)
    }

    pub fn get_mut(&mut self, text: &str) -> Option<&mut PhraseRecord> {
        self.document.collocations.get_mut(text)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.document.collocations.contains_key(text)
    }

    /// Insert a new record. Records are never removed.
    pub(crate) fn insert(&mut self, record: PhraseRecord) {
        self.document.collocations.insert(record.text.clone(), record);
    }

    pub fn records(&self) -> btree_map::Values<'_, String, PhraseRecord> {
        self.document.collocations.values()
    }

    pub fn len(&self) -> usize {
        self.document.collocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.collocations.is_empty()
    }
}

/// Move every record under its normalized key, merging records that collide
fn rekey(collocations: BTreeMap<String, PhraseRecord>) -> BTreeMap<String, PhraseRecord> {
    let mut rekeyed: BTreeMap<String, PhraseRecord> = BTreeMap::new();

    for (key, mut record) in collocations {
        let normalized = normalize_phrase(&key);
        if normalized.is_empty() {
            log::warn!("Dropping schedule record with blank key '{}'", key);
            continue;
        }
        if normalized != key {
            log::warn!("Re-keyed schedule record '{}' as '{}'", key, normalized);
        }
        record.text = normalized.clone();

        match rekeyed.entry(normalized) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(record);
            }
            btree_map::Entry::Occupied(mut slot) => slot.get_mut().absorb(record),
        }
    }

    rekeyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::models::FIRST_DAY;
    use tempfile::TempDir;

    fn store_path(temp: &TempDir) -> PathBuf {
        temp.path().join("data").join("srs_status.json")
    }

    #[test]
    fn test_open_creates_empty_document() {
        let temp = TempDir::new().unwrap();
        let store = ScheduleStore::open(store_path(&temp)).unwrap();

        assert!(store.path().exists());
        assert_eq!(store.current_day(), FIRST_DAY);
        assert!(store.is_empty());
        assert!(store.recovered().is_none());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = store_path(&temp);

        let mut store = ScheduleStore::open(&path).unwrap();
        let mut record = PhraseRecord::new("salamat po".into(), 3);
        record.appearances.push(5);
        record.last_seen_day = 5;
        record.review_count = 1;
        record.next_review_day = 6;
        record.stability = 1.2;
        store.insert(record);
        store.insert(PhraseRecord::new("magkano po ito".into(), 5));
        store.advance_to(5);
        store.save().unwrap();

        let reloaded = ScheduleStore::open(&path).unwrap();
        assert_eq!(reloaded.document(), store.document());
        assert_eq!(reloaded.current_day(), 5);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupted_document_resets() {
        let temp = TempDir::new().unwrap();
        let path = store_path(&temp);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ \"current_day\": 9, \"collocations\": ").unwrap();

        let store = ScheduleStore::open(&path).unwrap();
        assert_eq!(store.current_day(), FIRST_DAY);
        assert!(store.is_empty());
        assert!(store.recovered().unwrap().contains("malformed"));
    }

    #[test]
    fn test_document_format() {
        let temp = TempDir::new().unwrap();
        let path = store_path(&temp);

        let mut store = ScheduleStore::open(&path).unwrap();
        store.insert(PhraseRecord::new("pwede po ba".into(), 2));
        store.save().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let record = &raw["collocations"]["pwede po ba"];
        assert_eq!(raw["current_day"], 1);
        assert_eq!(record["text"], "pwede po ba");
        assert_eq!(record["appearances"], serde_json::json!([2]));
        assert_eq!(record["next_review_day"], 2);
        assert_eq!(record["stability"], 1.0);
    }

    #[test]
    fn test_punctuated_keys_are_merged_on_load() {
        let temp = TempDir::new().unwrap();
        let path = store_path(&temp);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let doc = serde_json::json!({
            "current_day": 4,
            "collocations": {
                "pwede po ba": {
                    "text": "pwede po ba",
                    "first_seen_day": 1,
                    "last_seen_day": 1,
                    "appearances": [1],
                    "review_count": 0,
                    "next_review_day": 1,
                    "stability": 1.0
                },
                "Pwede po ba?": {
                    "text": "Pwede po ba?",
                    "first_seen_day": 2,
                    "last_seen_day": 3,
                    "appearances": [2, 3],
                    "review_count": 1,
                    "next_review_day": 5,
                    "stability": 1.2
                }
            }
        });
        fs::write(&path, doc.to_string()).unwrap();

        let store = ScheduleStore::open(&path).unwrap();
        assert!(store.recovered().is_none());
        assert_eq!(store.len(), 1);

        let record = store.get("pwede po ba").unwrap();
        assert_eq!(record.text, "pwede po ba");
        assert_eq!(record.appearances, vec![1, 2, 3]);
        assert_eq!(record.review_count, 2);
        assert_eq!(record.first_seen_day, 1);
        assert_eq!(record.last_seen_day, 3);
        assert_eq!(record.next_review_day, 5);
        assert_eq!(record.stability, 1.2);
    }

    #[test]
    fn test_day_counter_is_monotonic() {
        let temp = TempDir::new().unwrap();
        let mut store = ScheduleStore::open(store_path(&temp)).unwrap();

        assert!(store.advance_to(4));
        assert!(!store.advance_to(2));
        assert_eq!(store.current_day(), 4);
    }
}
