//! Age of Empires II

use serde_json::json;
use std::collections::BTreeMap;

use super::{Faction, RuleSet, age_field, carry_forward, template_notes};
use crate::timing::{OpeningTech, TimingModel};
use crate::types::{Game, Step, TimeAlignment};
use crate::validation::{FieldDefinition, FieldType};

const MAX_AGE: i64 = 4;

static CIVILIZATIONS: [Faction; 45] = [
    Faction::new("Armenians", "ARM", "civilization_emblems/armenians.png"),
    Faction::new("Aztecs", "AZT", "civilization_emblems/aztecs.png"),
    Faction::new("Bengalis", "BEN", "civilization_emblems/bengalis.png"),
    Faction::new("Berbers", "BER", "civilization_emblems/berbers.png"),
    Faction::new("Bohemians", "BOH", "civilization_emblems/bohemians.png"),
    Faction::new("Britons", "BRI", "civilization_emblems/britons.png"),
    Faction::new("Bulgarians", "BUL", "civilization_emblems/bulgarians.png"),
    Faction::new("Burgundians", "BUR", "civilization_emblems/burgundians.png"),
    Faction::new("Burmese", "BRM", "civilization_emblems/burmese.png"),
    Faction::new("Byzantines", "BYZ", "civilization_emblems/byzantines.png"),
    Faction::new("Celts", "CEL", "civilization_emblems/celts.png"),
    Faction::new("Chinese", "CHI", "civilization_emblems/chinese.png"),
    Faction::new("Cumans", "CUM", "civilization_emblems/cumans.png"),
    Faction::new("Dravidians", "DRA", "civilization_emblems/dravidians.png"),
    Faction::new("Ethiopians", "ETH", "civilization_emblems/ethiopians.png"),
    Faction::new("Franks", "FRA", "civilization_emblems/franks.png"),
    Faction::new("Georgians", "GEO", "civilization_emblems/georgians.png"),
    Faction::new("Goths", "GOT", "civilization_emblems/goths.png"),
    Faction::new("Gurjaras", "GUR", "civilization_emblems/gurjaras.png"),
    Faction::new("Hindustanis", "HIN", "civilization_emblems/hindustanis.png"),
    Faction::new("Huns", "HUN", "civilization_emblems/huns.png"),
    Faction::new("Incas", "INC", "civilization_emblems/incas.png"),
    Faction::new("Italians", "ITA", "civilization_emblems/italians.png"),
    Faction::new("Japanese", "JAP", "civilization_emblems/japanese.png"),
    Faction::new("Khmer", "KHM", "civilization_emblems/khmer.png"),
    Faction::new("Koreans", "KOR", "civilization_emblems/koreans.png"),
    Faction::new("Lithuanians", "LIT", "civilization_emblems/lithuanians.png"),
    Faction::new("Magyars", "MAG", "civilization_emblems/magyars.png"),
    Faction::new("Malay", "MLY", "civilization_emblems/malay.png"),
    Faction::new("Malians", "MAL", "civilization_emblems/malians.png"),
    Faction::new("Mayans", "MAY", "civilization_emblems/mayans.png"),
    Faction::new("Mongols", "MON", "civilization_emblems/mongols.png"),
    Faction::new("Persians", "PER", "civilization_emblems/persians.png"),
    Faction::new("Poles", "POL", "civilization_emblems/poles.png"),
    Faction::new("Portuguese", "POR", "civilization_emblems/portuguese.png"),
    Faction::new("Romans", "ROM", "civilization_emblems/romans.png"),
    Faction::new("Saracens", "SAR", "civilization_emblems/saracens.png"),
    Faction::new("Sicilians", "SIC", "civilization_emblems/sicilians.png"),
    Faction::new("Slavs", "SLA", "civilization_emblems/slavs.png"),
    Faction::new("Spanish", "SPA", "civilization_emblems/spanish.png"),
    Faction::new("Tatars", "TAT", "civilization_emblems/tatars.png"),
    Faction::new("Teutons", "TEU", "civilization_emblems/teutons.png"),
    Faction::new("Turks", "TUR", "civilization_emblems/turks.png"),
    Faction::new("Vietnamese", "VIE", "civilization_emblems/vietnamese.png"),
    Faction::new("Vikings", "VIK", "civilization_emblems/vikings.png"),
];

/// Age of Empires II rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aoe2Rules;

impl RuleSet for Aoe2Rules {
    fn game(&self) -> Game {
        Game::Aoe2
    }

    fn faction_field(&self) -> &'static str {
        "civilization"
    }

    fn any_faction_valid(&self) -> bool {
        true
    }

    fn faction_catalog(&self) -> &'static [Faction] {
        &CIVILIZATIONS
    }

    fn max_age(&self) -> Option<i64> {
        Some(MAX_AGE)
    }

    fn field_schema(&self) -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::required("villager_count", FieldType::Integer),
            age_field(self.max_age()),
            FieldDefinition::required("wood", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("food", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("gold", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("stone", FieldType::Integer).in_parent("resources"),
            FieldDefinition::optional("builder", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("notes", FieldType::StringArray),
            FieldDefinition::optional("time", FieldType::String),
        ]
    }

    fn default_step(&self, previous: &[Step]) -> Step {
        let step = carry_forward(previous, &["villager_count", "age", "resources", "time"])
            .unwrap_or_else(|| {
                Step::new()
                    .with("villager_count", 0)
                    .with("age", 1)
                    .with("resources", json!({"wood": 0, "food": 0, "gold": 0, "stone": 0}))
            });
        step.with("notes", template_notes())
    }

    fn time_alignment(&self) -> TimeAlignment {
        TimeAlignment::End
    }

    fn timer_speed_factor(&self) -> Option<f64> {
        // In-game clock runs at the "normal" 1.7x game speed
        Some(1.7)
    }

    fn timing_model(&self) -> Option<TimingModel> {
        Some(timing_model())
    }
}

fn timing_model() -> TimingModel {
    let vikings_free = BTreeMap::from([("Vikings".to_string(), 0.0)]);

    TimingModel {
        version: "aoe2-de-2024".to_string(),
        worker_field: "villager_count".to_string(),
        resources_field: "resources".to_string(),
        resource_counters: ["wood", "food", "gold", "stone"].map(String::from).to_vec(),
        builder_counter: Some("builder".to_string()),
        special_counter: None,
        worker_time: 25.0,
        starting_workers: 3,
        faction_starting_workers: BTreeMap::from([
            ("Chinese".to_string(), 6),
            ("Mayans".to_string(), 4),
        ]),
        worker_speedup_per_age: BTreeMap::from([("Persians".to_string(), 0.05)]),
        worker_time_multiplier: BTreeMap::new(),
        age_up_times: vec![130.0, 160.0, 190.0],
        age_up_speed: BTreeMap::from([("Malay".to_string(), 1.66)]),
        age_up_bonus_workers: BTreeMap::from([("Bengalis".to_string(), 2)]),
        opening_techs: vec![
            OpeningTech::new("town_center/LoomDE.png", 25.0),
            OpeningTech::new("town_center/WheelbarrowDE.png", 75.0)
                .with_faction_times(vikings_free.clone()),
            OpeningTech::new("town_center/HandCartDE.png", 55.0).with_faction_times(vikings_free),
        ],
    }
}
