//! Overlay configuration loaded from YAML.
//!
//! Every key is optional:
//!
//! ```yaml
//! game: aom
//! tick_interval_ms: 250
//! time_offset: -10
//! speed_factor: 1.5
//! timing_overrides:
//!   aom:
//!     version: aom-retold-patch
//!     worker_field: worker_count
//!     # ...
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::games::rules_for;
use crate::timing::TimingModel;
use crate::types::Game;
use crate::{OverlayError, Result};

/// Default polling interval of the playback clock.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Game selected at startup
    pub game: Game,
    /// Playback clock polling interval
    pub tick_interval_ms: u64,
    /// Seconds added before the first step when estimating timing
    pub time_offset: i64,
    /// Game seconds per real second, replacing the game's own factor
    pub speed_factor: Option<f64>,
    /// Formula tables replacing the built-in ones
    pub timing_overrides: BTreeMap<Game, TimingModel>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            game: Game::Aoe2,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            time_offset: 0,
            speed_factor: None,
            timing_overrides: BTreeMap::new(),
        }
    }
}

impl OverlayConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: OverlayConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| OverlayError::config(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "Loading overlay config");
        Self::from_yaml_str(&yaml)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check values serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(OverlayError::config("tick_interval_ms must be at least 1"));
        }
        if let Some(factor) = self.speed_factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(OverlayError::config(format!(
                    "speed_factor must be positive, got {factor}"
                )));
            }
        }
        for (game, model) in &self.timing_overrides {
            if rules_for(*game).timing_model().is_none() {
                return Err(OverlayError::config(format!(
                    "{game} has no timing support to override"
                )));
            }
            model.check()?;
        }
        Ok(())
    }
}
