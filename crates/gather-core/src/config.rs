//! Configuration loading and typed config structures for auto-gather.
//!
//! The canonical configuration lives in `autogather-config.yaml`. The
//! module's own options sit under `AutoGather:` with the host server's
//! option names; the skill-up table sits under `SkillGain:`. The lowercase
//! `logging:` and `simulation:` sections are only read by the engine
//! harness.
//!
//! ```yaml
//! AutoGather:
//!   Enable: true
//!   LootRange: 10.0
//!   ScanIntervalMs: 1000
//! SkillGain:
//!   ChanceYellow: 75
//! Corpse:
//!   DecayMs: 60000
//! ```
//!
//! A loaded [`GatherSettings`] is wrapped in an `Arc` and treated as an
//! immutable snapshot; a reload builds a new one and swaps it in.

use std::path::{Path, PathBuf};

use gather_agents::SkillGainRates;
use serde::Deserialize;

/// Why a configuration document was rejected.
///
/// A rejected reload leaves the previous snapshot in effect.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read auto-gather config {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not YAML or does not match the option layout.
    #[error("malformed auto-gather config: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// An option parsed but its value is out of range.
    #[error("{field} rejected: {reason}")]
    Invalid {
        /// Option path, e.g. `AutoGather.LootRange`.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Complete configuration document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GatherSettings {
    /// Module options.
    #[serde(rename = "AutoGather", default)]
    pub auto_gather: GatherConfig,

    /// Skill-up chance table.
    #[serde(rename = "SkillGain", default)]
    pub skill_gain: SkillGainRates,

    /// Corpse lifecycle timing.
    #[serde(rename = "Corpse", default)]
    pub corpse: CorpseConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Harness tick loop parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl GatherSettings {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a negative or non-finite
    /// `LootRange` or a zero `ScanIntervalMs`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = self.auto_gather.loot_range;
        if !range.is_finite() || range < 0.0 {
            return Err(ConfigError::Invalid {
                field: "AutoGather.LootRange",
                reason: format!("must be a finite, non-negative distance, got {range}"),
            });
        }
        if self.auto_gather.scan_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "AutoGather.ScanIntervalMs",
                reason: String::from("must be at least 1"),
            });
        }
        Ok(())
    }
}

/// The module's recognized options.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GatherConfig {
    /// Master switch.
    #[serde(default = "default_true")]
    pub enable: bool,

    /// Send the login announcement.
    #[serde(default = "default_true")]
    pub announce: bool,

    /// Keep minimap tracking in step with gathering skills.
    #[serde(default = "default_true")]
    pub auto_track: bool,

    /// Harvest and skin automatically.
    #[serde(default = "default_true")]
    pub auto_loot: bool,

    /// Scan radius in yards.
    #[serde(default = "default_loot_range")]
    pub loot_range: f32,

    /// Milliseconds between scan passes.
    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u32,

    /// Scan while in combat.
    #[serde(default)]
    pub allow_in_combat: bool,

    /// Scan while mounted (on the ground).
    #[serde(default = "default_true")]
    pub allow_while_mounted: bool,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            enable: true,
            announce: true,
            auto_track: true,
            auto_loot: true,
            loot_range: default_loot_range(),
            scan_interval_ms: default_scan_interval_ms(),
            allow_in_combat: false,
            allow_while_mounted: true,
        }
    }
}

/// Corpse lifecycle timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CorpseConfig {
    /// Milliseconds a skinned corpse stays before it despawns.
    #[serde(default = "default_decay_ms")]
    pub decay_ms: u32,
}

impl Default for CorpseConfig {
    fn default() -> Self {
        Self {
            decay_ms: default_decay_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Harness tick loop parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Ticks to run before stopping.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Simulated (and, when pacing, real) milliseconds per tick. 0 runs unpaced
    /// with a nominal 100 ms step.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u32,

    /// Seed for loot and skill-up rolls.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            tick_interval_ms: default_tick_interval_ms(),
            seed: default_seed(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_loot_range() -> f32 {
    10.0
}

const fn default_scan_interval_ms() -> u32 {
    1000
}

const fn default_decay_ms() -> u32 {
    60_000
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_max_ticks() -> u64 {
    600
}

const fn default_tick_interval_ms() -> u32 {
    100
}

const fn default_seed() -> u64 {
    42
}
