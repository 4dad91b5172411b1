//! Warcraft III

use serde_json::json;

use super::{Faction, RuleSet, age_field, carry_forward, template_notes};
use crate::types::{Game, Step, TimeAlignment};
use crate::validation::{FieldDefinition, FieldType};

const MAX_TIER: i64 = 3;

static RACES: [Faction; 4] = [
    Faction::new("Human", "HU", "faction/human.png"),
    Faction::new("Orc", "OR", "faction/orc.png"),
    Faction::new("Night Elf", "NE", "faction/night_elf.png"),
    Faction::new("Undead", "UD", "faction/undead.png"),
];

/// Warcraft III rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wc3Rules;

impl RuleSet for Wc3Rules {
    fn game(&self) -> Game {
        Game::Wc3
    }

    fn faction_field(&self) -> &'static str {
        "race"
    }

    fn opponent_field(&self) -> Option<&'static str> {
        Some("opponent_race")
    }

    fn any_faction_valid(&self) -> bool {
        false
    }

    fn faction_catalog(&self) -> &'static [Faction] {
        &RACES
    }

    fn max_age(&self) -> Option<i64> {
        Some(MAX_TIER)
    }

    fn field_schema(&self) -> Vec<FieldDefinition> {
        vec![
            FieldDefinition { required: false, ..age_field(self.max_age()) },
            FieldDefinition::optional("food", FieldType::Integer),
            FieldDefinition::optional("gold", FieldType::Integer).in_parent("resources"),
            FieldDefinition::optional("lumber", FieldType::Integer).in_parent("resources"),
            FieldDefinition::required("notes", FieldType::StringArray),
            FieldDefinition::optional("time", FieldType::String),
        ]
    }

    fn default_step(&self, previous: &[Step]) -> Step {
        carry_forward(previous, &["age", "food", "resources", "time"])
            .unwrap_or_else(|| {
                Step::new()
                    .with("age", 1)
                    .with("food", 5)
                    .with("resources", json!({"gold": 5, "lumber": 0}))
                    .with("time", "0:00")
            })
            .with("notes", template_notes())
    }

    fn time_alignment(&self) -> TimeAlignment {
        TimeAlignment::Start
    }
}
