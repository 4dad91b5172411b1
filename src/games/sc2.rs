//! StarCraft II

use super::{Faction, RuleSet, carry_forward, template_notes};
use crate::types::{Game, Step, TimeAlignment};
use crate::validation::{FieldDefinition, FieldType, IntRange};

static RACES: [Faction; 3] = [
    Faction::new("Terran", "T", "logo/terran.png"),
    Faction::new("Protoss", "P", "logo/protoss.png"),
    Faction::new("Zerg", "Z", "logo/zerg.png"),
];

/// StarCraft II rules.
///
/// Steps have no age; timestamps mark when an instruction should begin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sc2Rules;

impl RuleSet for Sc2Rules {
    fn game(&self) -> Game {
        Game::Sc2
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
        None
    }

    fn field_schema(&self) -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::required("notes", FieldType::StringArray),
            FieldDefinition::optional("time", FieldType::String),
            FieldDefinition::optional("supply", FieldType::Integer)
                .with_range(IntRange::at_most(200)),
            FieldDefinition::optional("minerals", FieldType::Integer),
            FieldDefinition::optional("vespene_gas", FieldType::Integer),
        ]
    }

    fn default_step(&self, previous: &[Step]) -> Step {
        carry_forward(previous, &["time", "supply", "minerals", "vespene_gas"])
            .unwrap_or_else(|| {
                Step::new()
                    .with("time", "0:00")
                    .with("supply", 12)
                    .with("minerals", 50)
                    .with("vespene_gas", 0)
            })
            .with("notes", template_notes())
    }

    fn time_alignment(&self) -> TimeAlignment {
        TimeAlignment::Start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_build_order;
    use serde_json::json;

    #[test]
    fn any_is_rejected_for_own_race_but_accepted_for_opponent() {
        let own_any = json!({
            "name": "Proxy gates",
            "race": "Any",
            "build_order": [{"notes": ["Pylon"]}],
        });
        assert!(validate_build_order(&own_any, &Sc2Rules).is_err());

        let opponent_any = json!({
            "name": "Proxy gates",
            "race": "Protoss",
            "opponent_race": "Any",
            "build_order": [{"notes": ["Pylon"], "time": "0:18", "supply": 14}],
        });
        let bo = validate_build_order(&opponent_any, &Sc2Rules).unwrap();
        assert!(bo.faction().is("Protoss"));
    }

    #[test]
    fn supply_is_capped() {
        let schema = Sc2Rules.field_schema();
        let supply = schema.iter().find(|f| f.name == "supply").unwrap();
        assert!(!supply.range.unwrap().contains(201));
    }
}
