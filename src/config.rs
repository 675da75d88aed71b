//! Configuration for the scheduler and its file layout
//!
//! Read from a TOML file. Every field is optional:
//!
//! ```toml
//! data_dir = "/home/me/.local/share/collocation-srs"
//! store_file = "srs_status.json"
//! gate_mode = "strict"
//! denylist = ["next time"]
//!
//! [due]
//! min_items = 3
//! max_items = 5
//!
//! [leniency]
//! window_days = 3
//!
//! [strategies.deeper]
//! interval_multiplier = 0.7
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SrsError};
use crate::quality::GateMode;
use crate::srs::algorithm::LeniencyPolicy;
use crate::strategy::StrategyCatalog;

/// Directory name under the platform data dir
const APP_DIR_NAME: &str = "collocation-srs";

fn default_store_file() -> String {
    "srs_status.json".to_string()
}

/// Caller defaults for due selection when no strategy is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DueDefaults {
    pub min_items: usize,
    pub max_items: usize,
}

impl Default for DueDefaults {
    fn default() -> Self {
        Self {
            min_items: 3,
            max_items: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_store_file")]
    pub store_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_dir: Option<PathBuf>,
    #[serde(default)]
    pub gate_mode: GateMode,
    /// Known-bad phrases rejected in every gate mode
    #[serde(default)]
    pub denylist: Vec<String>,
    #[serde(default)]
    pub due: DueDefaults,
    #[serde(default)]
    pub leniency: LeniencyPolicy,
    /// Raw strategy overrides, validated one by one in [`SrsConfig::strategies`]
    #[serde(default)]
    pub strategies: BTreeMap<String, toml::Value>,
}

impl Default for SrsConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            store_file: default_store_file(),
            stories_dir: None,
            analysis_dir: None,
            gate_mode: GateMode::default(),
            denylist: Vec::new(),
            due: DueDefaults::default(),
            leniency: LeniencyPolicy::default(),
            strategies: BTreeMap::new(),
        }
    }
}

impl SrsConfig {
    /// Platform default data directory (e.g. ~/.local/share/collocation-srs)
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .ok_or_else(|| SrsError::NotFound("platform data directory".to_string()))
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: SrsConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Config for a fixed data directory, used by tests and `--data-dir`
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir: Some(data_dir),
            ..Self::default()
        }
    }

    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_data_dir(),
        }
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(self.resolved_data_dir()?.join(&self.store_file))
    }

    pub fn stories_dir(&self) -> Result<PathBuf> {
        match &self.stories_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.resolved_data_dir()?.join("stories")),
        }
    }

    pub fn analysis_dir(&self) -> Result<PathBuf> {
        match &self.analysis_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.resolved_data_dir()?.join("analysis")),
        }
    }

    pub fn strategies(&self) -> StrategyCatalog {
        StrategyCatalog::from_table(&self.strategies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ContentStrategy;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = SrsConfig::load(&temp.path().join("srs.toml")).unwrap();

        assert_eq!(config.store_file, "srs_status.json");
        assert_eq!(config.gate_mode, GateMode::Strict);
        assert_eq!(config.due, DueDefaults::default());
    }

    #[test]
    fn test_load_full_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("srs.toml");
        fs::write(
            &path,
            r#"
            data_dir = "/tmp/srs-data"
            gate_mode = "permissive"
            denylist = ["next time"]

            [due]
            max_items = 8

            [leniency]
            deferral_days = 4

            [strategies.deeper]
            interval_multiplier = 0.5
            "#,
        )
        .unwrap();

        let config = SrsConfig::load(&path).unwrap();
        assert_eq!(config.gate_mode, GateMode::Permissive);
        assert_eq!(config.denylist, vec!["next time".to_string()]);
        assert_eq!(config.due.min_items, 3);
        assert_eq!(config.due.max_items, 8);
        assert_eq!(config.leniency.deferral_days, 4);
        assert_eq!(config.leniency.window_days, 3);
        assert_eq!(
            config.store_path().unwrap(),
            PathBuf::from("/tmp/srs-data/srs_status.json")
        );
        assert_eq!(
            config.stories_dir().unwrap(),
            PathBuf::from("/tmp/srs-data/stories")
        );
        assert_eq!(
            config.strategies().parameters(ContentStrategy::Deeper).interval_multiplier,
            0.5
        );
    }

    #[test]
    fn test_unparsable_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("srs.toml");
        fs::write(&path, "gate_mode = [").unwrap();

        let err = SrsConfig::load(&path).unwrap_err();
        assert!(matches!(err, SrsError::Config(_)));
    }
}
