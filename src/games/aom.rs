//! Age of Mythology
//!
//! Factions are major gods. Greek gods' villagers also gather favor, which
//! counts towards the derived worker total for those gods only.

use serde_json::json;
use std::collections::BTreeMap;

use super::{Faction, RuleSet, age_field, carry_forward, template_notes};
use crate::timing::{OpeningTech, SpecialCounter, TimingModel};
use crate::types::{Game, Step, TimeAlignment};
use crate::validation::{FieldDefinition, FieldType};

const MAX_AGE: i64 = 5;

const GREEK_GODS: [&str; 4] = ["Zeus", "Hades", "Poseidon", "Demeter"];
const EGYPTIAN_GODS: [&str; 3] = ["Ra", "Isis", "Set"];
const ATLANTEAN_GODS: [&str; 3] = ["Kronos", "Oranos", "Gaia"];

static MAJOR_GODS: [Faction; 17] = [
    Faction::new("Zeus", "ZEU", "major_god/zeus.png"),
    Faction::new("Hades", "HAD", "major_god/hades.png"),
    Faction::new("Poseidon", "POS", "major_god/poseidon.png"),
    Faction::new("Demeter", "DEM", "major_god/demeter.png"),
    Faction::new("Ra", "RA", "major_god/ra.png"),
    Faction::new("Isis", "ISI", "major_god/isis.png"),
    Faction::new("Set", "SET", "major_god/set.png"),
    Faction::new("Thor", "THO", "major_god/thor.png"),
    Faction::new("Odin", "ODI", "major_god/odin.png"),
    Faction::new("Loki", "LOK", "major_god/loki.png"),
    Faction::new("Freyr", "FRE", "major_god/freyr.png"),
    Faction::new("Kronos", "KRO", "major_god/kronos.png"),
    Faction::new("Oranos", "ORA", "major_god/oranos.png"),
    Faction::new("Gaia", "GAI", "major_god/gaia.png"),
    Faction::new("Fuxi", "FUX", "major_god/fuxi.png"),
    Faction::new("Nuwa", "NUW", "major_god/nuwa.png"),
    Faction::new("Shennong", "SHE", "major_god/shennong.png"),
];

/// Age of Mythology rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct AomRules;

impl RuleSet for AomRules {
    fn game(&self) -> Game {
        Game::Aom
    }

    fn faction_field(&self) -> &'static str {
        "major_god"
    }

    fn any_faction_valid(&self) -> bool {
        true
    }

    fn faction_catalog(&self) -> &'static [Faction] {
        &MAJOR_GODS
    }

    fn max_age(&self) -> Option<i64> {
        Some(MAX_AGE)
    }

    fn field_schema(&self) -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::required("worker_count", FieldType::Integer),
            age_field(self.max_age()),
            FieldDefinition::required("food", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("wood", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("gold", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("favor", FieldType::Integer).in_parent("resources"),
            FieldDefinition::optional("builder", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("notes", FieldType::StringArray),
            FieldDefinition::optional("time", FieldType::String),
        ]
    }

    fn default_step(&self, previous: &[Step]) -> Step {
        carry_forward(previous, &["worker_count", "age", "resources", "time"])
            .unwrap_or_else(|| {
                Step::new()
                    .with("worker_count", 0)
                    .with("age", 1)
                    .with("resources", json!({"food": 0, "wood": 0, "gold": 0, "favor": 0}))
            })
            .with("notes", template_notes())
    }

    fn time_alignment(&self) -> TimeAlignment {
        TimeAlignment::End
    }

    fn timing_model(&self) -> Option<TimingModel> {
        Some(timing_model())
    }
}

fn gods(names: &[&str]) -> impl Iterator<Item = String> {
    names.iter().map(|name| name.to_string())
}

fn timing_model() -> TimingModel {
    let mut starting_workers: BTreeMap<String, i64> = BTreeMap::new();
    starting_workers.extend(gods(&EGYPTIAN_GODS).map(|god| (god, 2)));
    starting_workers.extend(gods(&ATLANTEAN_GODS).map(|god| (god, 2)));

    TimingModel {
        version: "aom-retold-2024".to_string(),
        worker_field: "worker_count".to_string(),
        resources_field: "resources".to_string(),
        resource_counters: ["food", "wood", "gold"].map(String::from).to_vec(),
        builder_counter: Some("builder".to_string()),
        special_counter: Some(SpecialCounter {
            name: "favor".to_string(),
            factions: gods(&GREEK_GODS).collect(),
        }),
        worker_time: 15.0,
        starting_workers: 3,
        faction_starting_workers: starting_workers,
        worker_speedup_per_age: BTreeMap::new(),
        // Citizens take longer to train than villagers
        worker_time_multiplier: gods(&ATLANTEAN_GODS).map(|god| (god, 1.5)).collect(),
        age_up_times: vec![60.0, 75.0, 90.0, 120.0],
        age_up_speed: BTreeMap::new(),
        age_up_bonus_workers: BTreeMap::new(),
        opening_techs: vec![
            OpeningTech::new("economy_technology/husbandry.png", 30.0),
            OpeningTech::new("economy_technology/hunting_dogs.png", 30.0),
            OpeningTech::new("economy_technology/pickaxe.png", 25.0),
            OpeningTech::new("economy_technology/hand_axe.png", 25.0),
        ],
    }
}
