//! Age of Empires IV

use serde_json::json;

use super::{Faction, RuleSet, age_field, carry_forward, template_notes};
use crate::types::{Game, Step, TimeAlignment};
use crate::validation::{FieldDefinition, FieldType};

const MAX_AGE: i64 = 4;

static CIVILIZATIONS: [Faction; 16] = [
    Faction::new("Abbasid Dynasty", "ABB", "civilization_flag/CivIcon-AbbasidAoE4.png"),
    Faction::new("Ayyubids", "AYY", "civilization_flag/CivIcon-AyyubidsAoE4.png"),
    Faction::new("Byzantines", "BYZ", "civilization_flag/CivIcon-ByzantinesAoE4.png"),
    Faction::new("Chinese", "CHI", "civilization_flag/CivIcon-ChineseAoE4.png"),
    Faction::new("Delhi Sultanate", "DEL", "civilization_flag/CivIcon-DelhiAoE4.png"),
    Faction::new("English", "ENG", "civilization_flag/CivIcon-EnglishAoE4.png"),
    Faction::new("French", "FRE", "civilization_flag/CivIcon-FrenchAoE4.png"),
    Faction::new("Holy Roman Empire", "HRE", "civilization_flag/CivIcon-HREAoE4.png"),
    Faction::new("Japanese", "JAP", "civilization_flag/CivIcon-JapaneseAoE4.png"),
    Faction::new("Jeanne d'Arc", "JDA", "civilization_flag/CivIcon-JeanneDArcAoE4.png"),
    Faction::new("Malians", "MAL", "civilization_flag/CivIcon-MaliansAoE4.png"),
    Faction::new("Mongols", "MON", "civilization_flag/CivIcon-MongolsAoE4.png"),
    Faction::new(
        "Order of the Dragon",
        "OOD",
        "civilization_flag/CivIcon-OrderOfTheDragonAoE4.png",
    ),
    Faction::new("Ottomans", "OTT", "civilization_flag/CivIcon-OttomansAoE4.png"),
    Faction::new("Rus", "RUS", "civilization_flag/CivIcon-RusAoE4.png"),
    Faction::new("Zhu Xi's Legacy", "ZXL", "civilization_flag/CivIcon-ZhuXiLegacyAoE4.png"),
];

/// Age of Empires IV rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aoe4Rules;

impl RuleSet for Aoe4Rules {
    fn game(&self) -> Game {
        Game::Aoe4
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
            FieldDefinition::required("population_count", FieldType::Integer),
            FieldDefinition::required("villager_count", FieldType::Integer),
            age_field(self.max_age()),
            FieldDefinition::required("food", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("wood", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("gold", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("stone", FieldType::Integer).in_parent("resources"),
            FieldDefinition::optional("builder", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("notes", FieldType::StringArray),
            FieldDefinition::optional("time", FieldType::String),
        ]
    }

    fn default_step(&self, previous: &[Step]) -> Step {
        carry_forward(previous, &["population_count", "villager_count", "age", "resources", "time"])
            .unwrap_or_else(|| {
                Step::new()
                    .with("population_count", -1)
                    .with("villager_count", 0)
                    .with("age", 1)
                    .with("resources", json!({"food": 0, "wood": 0, "gold": 0, "stone": 0}))
            })
            .with("notes", template_notes())
    }

    fn time_alignment(&self) -> TimeAlignment {
        TimeAlignment::End
    }
}
