//! Content strategies
//!
//! A strategy is a named, read-only parameter bundle chosen by the caller
//! for one invocation. It reshapes how many phrases are requested for
//! review and how aggressively intervals and stability grow. The scheduler
//! never persists or mutates it.
//!
//! - `balanced`: the default pacing
//! - `wider`: new scenarios at the same difficulty, longer intervals
//! - `deeper`: revisit existing material, more reviews, slower growth

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stability growth applied on a credited review when no strategy is given
pub const DEFAULT_GROWTH_RATE: f64 = 1.2;

/// Interval multiplier applied when no strategy is given
pub const DEFAULT_INTERVAL_MULTIPLIER: f64 = 1.0;

/// Parameters carried by a strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyParameters {
    pub min_review_items: usize,
    pub max_new_items: usize,
    pub interval_multiplier: f64,
    pub stability_growth_rate: f64,
}

impl StrategyParameters {
    /// Upper bound on the number of due phrases requested under this strategy
    pub fn max_items(&self) -> usize {
        self.min_review_items + self.max_new_items
    }

    /// Check that the bundle can drive the scheduler
    pub fn validate(&self) -> Result<(), String> {
        if !self.interval_multiplier.is_finite() || self.interval_multiplier <= 0.0 {
            return Err(format!(
                "interval_multiplier must be positive, got {}",
                self.interval_multiplier
            ));
        }
        // a credited review must leave the phrase more stable than before
        if !self.stability_growth_rate.is_finite() || self.stability_growth_rate <= 1.0 {
            return Err(format!(
                "stability_growth_rate must be greater than 1, got {}",
                self.stability_growth_rate
            ));
        }
        if self.max_items() == 0 {
            return Err("strategy requests no items".to_string());
        }
        Ok(())
    }
}

impl Default for StrategyParameters {
    fn default() -> Self {
        ContentStrategy::Balanced.parameters()
    }
}

/// The closed set of named strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStrategy {
    Balanced,
    Wider,
    Deeper,
}

impl Default for ContentStrategy {
    fn default() -> Self {
        Self::Balanced
    }
}

impl ContentStrategy {
    pub const ALL: [ContentStrategy; 3] = [Self::Balanced, Self::Wider, Self::Deeper];

    /// Built-in parameter bundle for this strategy
    pub fn parameters(self) -> StrategyParameters {
        match self {
            Self::Balanced => StrategyParameters {
                min_review_items: 5,
                max_new_items: 5,
                interval_multiplier: DEFAULT_INTERVAL_MULTIPLIER,
                stability_growth_rate: DEFAULT_GROWTH_RATE,
            },
            Self::Wider => StrategyParameters {
                min_review_items: 2,
                max_new_items: 8,
                interval_multiplier: 1.5,
                stability_growth_rate: 1.3,
            },
            Self::Deeper => StrategyParameters {
                min_review_items: 7,
                max_new_items: 3,
                interval_multiplier: 0.8,
                stability_growth_rate: 1.1,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Wider => "wider",
            Self::Deeper => "deeper",
        }
    }

    /// Parse a strategy name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "balanced" => Some(Self::Balanced),
            "wider" => Some(Self::Wider),
            "deeper" => Some(Self::Deeper),
            _ => None,
        }
    }
}

impl fmt::Display for ContentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial bundle read from configuration, merged over the built-in one
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StrategyOverride {
    min_review_items: Option<usize>,
    max_new_items: Option<usize>,
    interval_multiplier: Option<f64>,
    stability_growth_rate: Option<f64>,
}

impl StrategyOverride {
    fn apply(self, mut base: StrategyParameters) -> StrategyParameters {
        if let Some(v) = self.min_review_items {
            base.min_review_items = v;
        }
        if let Some(v) = self.max_new_items {
            base.max_new_items = v;
        }
        if let Some(v) = self.interval_multiplier {
            base.interval_multiplier = v;
        }
        if let Some(v) = self.stability_growth_rate {
            base.stability_growth_rate = v;
        }
        base
    }
}

/// Strategy source: built-in bundles plus any overrides from configuration
#[derive(Debug, Clone, Default)]
pub struct StrategyCatalog {
    overrides: HashMap<ContentStrategy, StrategyParameters>,
}

impl StrategyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from the `[strategies]` table of the config file.
    ///
    /// Entries with an unknown name or a malformed bundle are skipped with a
    /// warning; the built-in bundle stays in effect for them.
    pub fn from_table(table: &BTreeMap<String, toml::Value>) -> Self {
        let mut overrides = HashMap::new();

        for (name, value) in table {
            let Some(strategy) = ContentStrategy::from_name(name) else {
                log::warn!("Ignoring unknown strategy '{}' in config", name);
                continue;
            };

            let parsed: StrategyOverride = match value.clone().try_into() {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::warn!("Ignoring malformed strategy '{}': {}", name, e);
                    continue;
                }
            };

            let params = parsed.apply(strategy.parameters());
            if let Err(e) = params.validate() {
                log::warn!("Ignoring malformed strategy '{}': {}", name, e);
                continue;
            }

            overrides.insert(strategy, params);
        }

        Self { overrides }
    }

    /// Parameters for a strategy, honouring configuration overrides
    pub fn parameters(&self, strategy: ContentStrategy) -> StrategyParameters {
        self.overrides
            .get(&strategy)
            .copied()
            .unwrap_or_else(|| strategy.parameters())
    }

    /// Resolve an optional strategy name.
    ///
    /// `None` means the caller wants engine defaults. An unknown name falls
    /// back to the balanced bundle.
    pub fn resolve(&self, name: Option<&str>) -> Option<StrategyParameters> {
        let name = name?;
        match ContentStrategy::from_name(name) {
            Some(strategy) => Some(self.parameters(strategy)),
            None => {
                log::warn!("Unknown strategy '{}', using default parameters", name);
                Some(self.parameters(ContentStrategy::default()))
            }
        }
    }
}
