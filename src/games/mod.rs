//! Per-game rule sets.
//!
//! Each supported game implements [`RuleSet`]: the step schema, the faction
//! catalog, the default step template and, for games with a timing model, the
//! formula table used by the estimator. Rule sets are stateless and selected
//! through [`GameRegistry`] or [`rules_for`].
//!
//! # Example
//!
//! ```rust
//! use rts_overlay::games::{GameRegistry, RuleSet};
//! use rts_overlay::types::Game;
//!
//! let rules = GameRegistry::global().lookup("aoe2").unwrap();
//! assert_eq!(rules.game(), Game::Aoe2);
//! assert!(rules.faction("Franks").is_some());
//! assert!(rules.timing_model().is_some());
//!
//! let step = rules.default_step(&[]);
//! assert_eq!(step.age(), Some(1));
//! ```

mod aoe2;
mod aoe4;
mod aom;
mod sc2;
mod wc3;

use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::timing::TimingModel;
use crate::types::{Game, Step, TimeAlignment};
use crate::validation::{FieldDefinition, FieldType, IntRange};
use crate::{OverlayError, Result};

pub use aoe2::Aoe2Rules;
pub use aoe4::Aoe4Rules;
pub use aom::AomRules;
pub use sc2::Sc2Rules;
pub use wc3::Wc3Rules;

/// One selectable faction of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faction {
    /// Canonical name, as written in build orders
    pub name: &'static str,
    /// Short code used in compact displays
    pub code: &'static str,
    /// Icon reference resolved by the renderer
    pub icon: &'static str,
}

impl Faction {
    pub(crate) const fn new(name: &'static str, code: &'static str, icon: &'static str) -> Self {
        Self { name, code, icon }
    }
}

/// Validation, template and timing rules for one game.
pub trait RuleSet: Send + Sync {
    /// Game these rules belong to.
    fn game(&self) -> Game;

    /// Root field naming the player's faction (`civilization`, `race`, ...).
    fn faction_field(&self) -> &'static str;

    /// Root field naming the opponent's faction, for games that have one.
    fn opponent_field(&self) -> Option<&'static str> {
        None
    }

    /// Whether "any" is accepted in the faction field.
    fn any_faction_valid(&self) -> bool;

    /// Known factions; their names are the validation domain.
    fn faction_catalog(&self) -> &'static [Faction];

    /// Find a faction by canonical name.
    fn faction(&self, name: &str) -> Option<&'static Faction> {
        self.faction_catalog().iter().find(|faction| faction.name == name)
    }

    /// Highest age/tier a step may declare, if the game has ages.
    fn max_age(&self) -> Option<i64>;

    /// Ordered schema for one step.
    fn field_schema(&self) -> Vec<FieldDefinition>;

    /// A new step carrying forward the last of `previous`, or game defaults.
    fn default_step(&self, previous: &[Step]) -> Step;

    /// What step timestamps mark for this game.
    fn time_alignment(&self) -> TimeAlignment;

    /// Ratio of displayed game time to wall-clock time, when not 1.
    fn timer_speed_factor(&self) -> Option<f64> {
        None
    }

    /// Formula table for timing estimation, for games that support it.
    fn timing_model(&self) -> Option<TimingModel> {
        None
    }

    /// A complete one-step build order to start editing from.
    fn build_order_template(&self) -> Value {
        let mut root = Map::new();
        root.insert("name".to_string(), json!("Build order name"));
        let faction = if self.any_faction_valid() {
            json!("Any")
        } else {
            json!(self.faction_catalog().first().map(|f| f.name).unwrap_or_default())
        };
        root.insert(self.faction_field().to_string(), faction);
        if let Some(opponent) = self.opponent_field() {
            root.insert(opponent.to_string(), json!("Any"));
        }
        root.insert("author".to_string(), json!("Author"));
        root.insert("source".to_string(), json!("Source"));
        root.insert(
            "build_order".to_string(),
            Value::Array(vec![Value::Object(self.default_step(&[]).fields().clone())]),
        );
        Value::Object(root)
    }
}

/// Notes given to freshly created steps.
pub(crate) fn template_notes() -> Value {
    json!(["Note 1", "Note 2"])
}

/// The required `age` field, capped at `max_age` when the game has ages.
///
/// The lower bound stays open so the `-1` "unspecified" sentinel passes.
pub(crate) fn age_field(max_age: Option<i64>) -> FieldDefinition {
    let field = FieldDefinition::required("age", FieldType::Integer);
    match max_age {
        Some(max) => field.with_range(IntRange::at_most(max)),
        None => field,
    }
}

/// Start a step from the last previous one, copying only `carried` fields.
pub(crate) fn carry_forward(previous: &[Step], carried: &[&str]) -> Option<Step> {
    let last = previous.last()?;
    let mut step = Step::new();
    for &name in carried {
        if let Some(value) = last.get(name) {
            step.insert(name, value.clone());
        }
    }
    Some(step)
}

static AOE2: Aoe2Rules = Aoe2Rules;
static AOE4: Aoe4Rules = Aoe4Rules;
static AOM: AomRules = AomRules;
static SC2: Sc2Rules = Sc2Rules;
static WC3: Wc3Rules = Wc3Rules;

/// Rule set for a game.
pub fn rules_for(game: Game) -> &'static dyn RuleSet {
    match game {
        Game::Aoe2 => &AOE2,
        Game::Aoe4 => &AOE4,
        Game::Aom => &AOM,
        Game::Sc2 => &SC2,
        Game::Wc3 => &WC3,
    }
}

static REGISTRY: LazyLock<GameRegistry> = LazyLock::new(GameRegistry::new);

/// Rule sets keyed by game identifier.
pub struct GameRegistry {
    by_id: HashMap<&'static str, &'static dyn RuleSet>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRegistry {
    /// Registry holding every supported game.
    pub fn new() -> Self {
        let by_id = Game::ALL.into_iter().map(|game| (game.id(), rules_for(game))).collect();
        Self { by_id }
    }

    /// Process-wide registry.
    pub fn global() -> &'static GameRegistry {
        &REGISTRY
    }

    /// Find the rule set for a game identifier.
    ///
    /// An unknown identifier is a caller contract violation and reported as
    /// [`OverlayError::UnknownGame`].
    pub fn lookup(&self, id: &str) -> Result<&'static dyn RuleSet> {
        self.by_id.get(id).copied().ok_or_else(|| OverlayError::UnknownGame { id: id.to_string() })
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_build_order;

    #[test]
    fn registry_covers_every_game() {
        let registry = GameRegistry::new();
        for game in Game::ALL {
            let rules = registry.lookup(game.id()).unwrap();
            assert_eq!(rules.game(), game);
        }
        assert_eq!(registry.ids(), vec!["aoe2", "aoe4", "aom", "sc2", "wc3"]);
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        let err = GameRegistry::global().lookup("chess").err().unwrap();
        assert!(matches!(err, OverlayError::UnknownGame { .. }));
    }

    #[test]
    fn templates_pass_their_own_validation() {
        for game in Game::ALL {
            let rules = rules_for(game);
            let template = rules.build_order_template();
            let bo = validate_build_order(&template, rules)
                .unwrap_or_else(|e| panic!("{} template invalid: {}", game, e));
            assert_eq!(bo.len(), 1);
        }
    }

    #[test]
    fn default_steps_pass_schema_after_carry_forward() {
        for game in Game::ALL {
            let rules = rules_for(game);
            let first = rules.default_step(&[]);
            let second = rules.default_step(std::slice::from_ref(&first));
            let schema = rules.field_schema();
            let value = Value::Object(second.fields().clone());
            crate::validation::validate_step(&value, 1, &schema)
                .unwrap_or_else(|e| panic!("{}: {}", game, e));
        }
    }

    #[test]
    fn age_range_follows_max_age() {
        for game in Game::ALL {
            let rules = rules_for(game);
            let schema = rules.field_schema();
            let age = schema.iter().find(|f| f.name == "age");
            match rules.max_age() {
                Some(max) => {
                    let age = age.unwrap_or_else(|| panic!("{} has ages but no age field", game));
                    assert_eq!(age.range, Some(IntRange::at_most(max)), "{}", game);
                }
                None => assert!(age.is_none(), "{} declares an age field without ages", game),
            }
        }
    }

    #[test]
    fn catalogs_have_unique_names_and_codes() {
        for game in Game::ALL {
            let catalog = rules_for(game).faction_catalog();
            assert!(!catalog.is_empty());
            let mut names: Vec<_> = catalog.iter().map(|f| f.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), catalog.len(), "duplicate faction in {}", game);
            let mut codes: Vec<_> = catalog.iter().map(|f| f.code).collect();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), catalog.len(), "duplicate code in {}", game);
        }
    }

    #[test]
    fn timing_models_use_known_factions() {
        for game in Game::ALL {
            let rules = rules_for(game);
            if let Some(model) = rules.timing_model() {
                for faction in model.referenced_factions() {
                    assert!(rules.faction(faction).is_some(), "{}: unknown {}", game, faction);
                }
            }
        }
    }

    #[test]
    fn only_detailed_games_have_timing() {
        let timed: Vec<_> =
            Game::ALL.into_iter().filter(|g| rules_for(*g).timing_model().is_some()).collect();
        assert_eq!(timed, vec![Game::Aoe2, Game::Aom]);
    }
}
