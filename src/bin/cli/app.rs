use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use collocation_srs::feedback::FeedbackApplier;
use collocation_srs::quality::{GateMode, QualityGate};
use collocation_srs::srs::{Day, ScheduleStore, SchedulingEngine};
use collocation_srs::strategy::{StrategyCatalog, StrategyParameters};
use collocation_srs::usage::{UsageExtractor, UsageValidator};
use collocation_srs::SrsConfig;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Shared application state for CLI commands
pub struct App {
    pub config: SrsConfig,
    pub engine: SchedulingEngine,
    pub store: ScheduleStore,
    pub applier: FeedbackApplier,
    pub catalog: StrategyCatalog,
}

impl App {
    /// Load configuration and open the schedule.
    ///
    /// Without `--config`, `config.toml` in the data directory is used if present.
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>, permissive: bool) -> Result<Self> {
        let config_path = match (config_path, &data_dir) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(dir)) => dir.join(CONFIG_FILE_NAME),
            (None, None) => SrsConfig::default_data_dir()
                .context("Failed to get data directory")?
                .join(CONFIG_FILE_NAME),
        };

        let mut config = SrsConfig::load(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;
        if let Some(dir) = data_dir {
            config.data_dir = Some(dir);
        }
        if permissive {
            config.gate_mode = GateMode::Permissive;
        }

        let store_path = config.store_path()?;
        let store = ScheduleStore::open(&store_path)
            .with_context(|| format!("Failed to open schedule {}", store_path.display()))?;
        if let Some(reason) = store.recovered() {
            eprintln!("warning: schedule was reset ({})", reason);
        }

        let gate = QualityGate::new(config.gate_mode).with_denylist(&config.denylist);
        let validator = UsageValidator::new(UsageExtractor::for_stories(config.stories_dir()?));

        Ok(Self {
            engine: SchedulingEngine::new(gate),
            store,
            applier: FeedbackApplier::new(validator, config.leniency),
            catalog: config.strategies(),
            config,
        })
    }

    /// Day to use when the user gave none
    pub fn day_or_current(&self, day: Option<Day>) -> Day {
        day.unwrap_or_else(|| self.store.current_day())
    }

    pub fn strategy(&self, name: Option<&str>) -> Option<StrategyParameters> {
        self.catalog.resolve(name)
    }
}
