//! Versioned formula tables for timing estimation
//!
//! Constants come from game balance data and drift as games are patched, so
//! they live in plain data that can be loaded from YAML instead of code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Step;
use crate::{OverlayError, Result};

/// A counter only some factions can gather (e.g. favor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialCounter {
    /// Counter name inside the resources object
    pub name: String,
    /// Factions whose workers gather it
    pub factions: Vec<String>,
}

/// A one-time technology or unit from the main base, recognized by an image
/// token in step notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningTech {
    /// Image reference looked for inside note lines
    pub token: String,
    /// Research or training time in seconds
    pub time: f64,
    /// Per-faction replacement times
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub faction_times: BTreeMap<String, f64>,
}

impl OpeningTech {
    pub fn new(token: impl Into<String>, time: f64) -> Self {
        Self { token: token.into(), time, faction_times: BTreeMap::new() }
    }

    pub fn with_faction_times(mut self, faction_times: BTreeMap<String, f64>) -> Self {
        self.faction_times = faction_times;
        self
    }

    /// Time for `faction`, falling back to the generic time.
    pub fn time_for(&self, faction: Option<&str>) -> f64 {
        faction.and_then(|f| self.faction_times.get(f)).copied().unwrap_or(self.time)
    }
}

/// Formula table for one game.
///
/// Faction-specific entries are keyed by canonical faction name and only
/// apply when a build order names exactly that faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingModel {
    /// Balance data version the constants were taken from
    pub version: String,
    /// Step field holding the declared worker count
    pub worker_field: String,
    /// Step object holding the resource counters
    pub resources_field: String,
    /// Counters summed when the worker count is not declared
    pub resource_counters: Vec<String>,
    /// Counter for workers busy building, inside the resources object
    #[serde(default)]
    pub builder_counter: Option<String>,
    #[serde(default)]
    pub special_counter: Option<SpecialCounter>,
    /// Seconds to train one worker
    pub worker_time: f64,
    /// Workers at game start
    pub starting_workers: i64,
    #[serde(default)]
    pub faction_starting_workers: BTreeMap<String, i64>,
    /// Work-rate gain per age of the worker-producing building
    #[serde(default)]
    pub worker_speedup_per_age: BTreeMap<String, f64>,
    /// Flat multiplier on worker training time
    #[serde(default)]
    pub worker_time_multiplier: BTreeMap<String, f64>,
    /// Research time to leave age `i + 1`
    pub age_up_times: Vec<f64>,
    /// Divisor on age-up research time
    #[serde(default)]
    pub age_up_speed: BTreeMap<String, f64>,
    /// Free workers spawned when an age-up completes
    #[serde(default)]
    pub age_up_bonus_workers: BTreeMap<String, i64>,
    #[serde(default)]
    pub opening_techs: Vec<OpeningTech>,
}

impl TimingModel {
    /// Load a table from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let model: TimingModel = serde_yaml_ng::from_str(yaml)?;
        model.check()?;
        Ok(model)
    }

    /// Dump the table as YAML, e.g. to start a custom table from the defaults.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Reject tables that would make the estimate go backwards.
    pub fn check(&self) -> Result<()> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        let non_negative = |value: f64| value.is_finite() && value >= 0.0;

        if !positive(self.worker_time) {
            return Err(OverlayError::config(format!(
                "{}: worker_time must be positive",
                self.version
            )));
        }
        if self.starting_workers < 0 || self.faction_starting_workers.values().any(|&n| n < 0) {
            return Err(OverlayError::config(format!(
                "{}: starting workers must not be negative",
                self.version
            )));
        }
        if !self.age_up_times.iter().copied().all(non_negative)
            || !self.opening_techs.iter().all(|tech| {
                non_negative(tech.time) && tech.faction_times.values().copied().all(non_negative)
            })
        {
            return Err(OverlayError::config(format!(
                "{}: research times must not be negative",
                self.version
            )));
        }
        if !self.worker_time_multiplier.values().copied().all(positive)
            || !self.age_up_speed.values().copied().all(positive)
            || !self.worker_speedup_per_age.values().copied().all(non_negative)
        {
            return Err(OverlayError::config(format!(
                "{}: faction modifiers must be positive",
                self.version
            )));
        }
        if self.age_up_bonus_workers.values().any(|&n| n < 0) {
            return Err(OverlayError::config(format!(
                "{}: bonus workers must not be negative",
                self.version
            )));
        }
        Ok(())
    }

    /// Highest age the table knows an age-up for.
    pub fn max_age(&self) -> i64 {
        self.age_up_times.len() as i64 + 1
    }

    /// Workers a faction starts the game with.
    pub fn starting_workers(&self, faction: Option<&str>) -> i64 {
        faction
            .and_then(|f| self.faction_starting_workers.get(f))
            .copied()
            .unwrap_or(self.starting_workers)
    }

    /// Seconds to train one worker in `age`.
    pub fn worker_time(&self, age: i64, faction: Option<&str>) -> f64 {
        let mut time = self.worker_time;
        if let Some(multiplier) = faction.and_then(|f| self.worker_time_multiplier.get(f)) {
            time *= multiplier;
        }
        if let Some(speedup) = faction.and_then(|f| self.worker_speedup_per_age.get(f)) {
            time /= 1.0 + speedup * age.max(1) as f64;
        }
        time
    }

    /// Research time to advance out of `current_age`, if the table has one.
    pub fn age_up_time(&self, current_age: i64, faction: Option<&str>) -> Option<f64> {
        let index = usize::try_from(current_age.checked_sub(1)?).ok()?;
        let base = *self.age_up_times.get(index)?;
        let speed = faction.and_then(|f| self.age_up_speed.get(f)).copied().unwrap_or(1.0);
        Some(base / speed)
    }

    /// Free workers granted when an age-up completes.
    pub fn bonus_workers(&self, faction: Option<&str>) -> i64 {
        faction.and_then(|f| self.age_up_bonus_workers.get(f)).copied().unwrap_or(0)
    }

    /// Whether `faction`'s workers gather the special counter.
    pub fn gathers_special(&self, faction: Option<&str>) -> bool {
        match (&self.special_counter, faction) {
            (Some(special), Some(faction)) => special.factions.iter().any(|f| f == faction),
            _ => false,
        }
    }

    /// Worker count of a step: the declared count, or the sum of positive
    /// counters when the declared count is a negative "not tracked" value.
    pub fn step_worker_count(&self, step: &Step, faction: Option<&str>) -> i64 {
        if let Some(declared) = step.integer(&self.worker_field) {
            if declared >= 0 {
                return declared;
            }
        }

        let counter = |name: &str| {
            step.nested_integer(&self.resources_field, name).filter(|&n| n > 0).unwrap_or(0)
        };

        // Counters have no upper bound in the schema
        let mut total =
            self.resource_counters.iter().map(|name| counter(name)).fold(0i64, i64::saturating_add);
        if let Some(builder) = &self.builder_counter {
            total = total.saturating_add(counter(builder));
        }
        if let Some(special) = &self.special_counter {
            if self.gathers_special(faction) {
                total = total.saturating_add(counter(&special.name));
            }
        }
        total
    }

    /// Every faction name the table refers to.
    pub fn referenced_factions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .faction_starting_workers
            .keys()
            .chain(self.worker_speedup_per_age.keys())
            .chain(self.worker_time_multiplier.keys())
            .chain(self.age_up_speed.keys())
            .chain(self.age_up_bonus_workers.keys())
            .chain(self.opening_techs.iter().flat_map(|tech| tech.faction_times.keys()))
            .map(String::as_str)
            .collect();
        if let Some(special) = &self.special_counter {
            names.extend(special.factions.iter().map(String::as_str));
        }
        names.sort_unstable();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat_model() -> TimingModel {
        TimingModel {
            version: "test".to_string(),
            worker_field: "villager_count".to_string(),
            resources_field: "resources".to_string(),
            resource_counters: vec!["wood".to_string(), "food".to_string()],
            builder_counter: Some("builder".to_string()),
            special_counter: None,
            worker_time: 20.0,
            starting_workers: 3,
            faction_starting_workers: BTreeMap::from([("Big".to_string(), 6)]),
            worker_speedup_per_age: BTreeMap::from([("Fast".to_string(), 0.25)]),
            worker_time_multiplier: BTreeMap::from([("Flat".to_string(), 0.5)]),
            age_up_times: vec![100.0, 200.0, 300.0],
            age_up_speed: BTreeMap::from([("Quick".to_string(), 2.0)]),
            age_up_bonus_workers: BTreeMap::from([("Bonus".to_string(), 2)]),
            opening_techs: vec![OpeningTech::new("loom.png", 25.0)],
        }
    }

    #[test]
    fn worker_time_modifiers() {
        let model = flat_model();
        assert_eq!(model.worker_time(1, None), 20.0);
        assert_eq!(model.worker_time(3, Some("Flat")), 10.0);
        assert_eq!(model.worker_time(1, Some("Fast")), 16.0);
        assert_eq!(model.worker_time(3, Some("Fast")), 20.0 / 1.75);
    }

    #[test]
    fn age_up_time_lookup() {
        let model = flat_model();
        assert_eq!(model.age_up_time(1, None), Some(100.0));
        assert_eq!(model.age_up_time(2, Some("Quick")), Some(100.0));
        assert_eq!(model.age_up_time(4, None), None);
        assert_eq!(model.age_up_time(0, None), None);
        assert_eq!(model.age_up_time(-1, None), None);
        assert_eq!(model.max_age(), 4);
    }

    #[test]
    fn derived_worker_count_skips_sentinels() {
        let model = flat_model();
        let step = Step::new()
            .with("villager_count", -1)
            .with("resources", json!({"wood": 4, "food": -1, "builder": 2}));
        assert_eq!(model.step_worker_count(&step, None), 6);

        let declared = Step::new().with("villager_count", 11);
        assert_eq!(model.step_worker_count(&declared, None), 11);
    }

    #[test]
    fn yaml_round_trip_keeps_the_table() {
        let model = flat_model();
        let yaml = model.to_yaml_string().unwrap();
        let loaded = TimingModel::from_yaml_str(&yaml).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn yaml_rejects_unknown_fields_and_bad_constants() {
        let mut yaml = flat_model().to_yaml_string().unwrap();
        yaml.push_str("villager_tiem: 3\n");
        assert!(matches!(TimingModel::from_yaml_str(&yaml), Err(OverlayError::Config { .. })));

        let mut model = flat_model();
        model.worker_time = 0.0;
        assert!(model.check().is_err());

        let mut model = flat_model();
        model.age_up_speed.insert("Broken".to_string(), -1.0);
        assert!(model.check().is_err());
    }
}
