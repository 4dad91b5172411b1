//! Build order documents and their steps
//!
//! Steps stay as JSON objects so that unknown fields survive a round trip
//! through the overlay; typed accessors read the fields the validator has
//! already checked.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// Tokens accepted as "any faction" by rule sets that allow it.
pub const ANY_FACTION_TOKENS: [&str; 3] = ["any", "Any", "Generic"];

/// Whether `name` is one of the "any faction" tokens.
pub fn is_any_token(name: &str) -> bool {
    ANY_FACTION_TOKENS.contains(&name)
}

/// Read a JSON value as a whole number.
///
/// Floats are accepted only when they have no fractional part. Strings are
/// never numbers, even when they look like one.
pub fn as_integer(value: &Value) -> Option<i64> {
    if let Some(integer) = value.as_i64() {
        return Some(integer);
    }
    match value.as_f64() {
        Some(float) if float.is_finite() && float.fract() == 0.0 => {
            if float >= i64::MIN as f64 && float <= i64::MAX as f64 {
                Some(float as i64)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// One entry of a build order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Step {
    fields: Map<String, Value>,
}

impl Step {
    /// Create an empty step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Builder-style insert, used by step templates.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Raw fields of the step.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a top-level field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Look up a field, optionally nested one level inside `parent`.
    pub fn lookup(&self, parent: Option<&str>, name: &str) -> Option<&Value> {
        match parent {
            Some(parent) => self.fields.get(parent)?.as_object()?.get(name),
            None => self.fields.get(name),
        }
    }

    /// Read a top-level integer field.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(as_integer)
    }

    /// Read an integer field nested inside `parent`.
    pub fn nested_integer(&self, parent: &str, name: &str) -> Option<i64> {
        self.lookup(Some(parent), name).and_then(as_integer)
    }

    /// The step's age, if it has one.
    pub fn age(&self) -> Option<i64> {
        self.integer("age")
    }

    /// Note lines, skipping anything that is not text.
    pub fn notes(&self) -> impl Iterator<Item = &str> {
        self.get("notes")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    /// Whether any note line mentions `token` (usually an image reference).
    pub fn notes_contain(&self, token: &str) -> bool {
        self.notes().any(|note| note.contains(token))
    }

    /// The `M:SS` label of the step, if present and textual.
    pub fn time(&self) -> Option<&str> {
        self.get("time").and_then(Value::as_str)
    }

    /// Overwrite the step's time label.
    pub fn set_time(&mut self, label: impl Into<String>) {
        self.fields.insert("time".to_string(), Value::String(label.into()));
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.to_string(), value.into())
    }
}

/// The faction field of a build order: one name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactionSpec {
    Single(String),
    List(Vec<String>),
}

impl FactionSpec {
    /// Faction names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            FactionSpec::Single(name) => vec![name.as_str()],
            FactionSpec::List(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// The faction this build order is for, when it names exactly one specific
    /// faction. "Any" and multi-faction build orders return `None`.
    pub fn single(&self) -> Option<&str> {
        let name = match self {
            FactionSpec::Single(name) => name.as_str(),
            FactionSpec::List(names) if names.len() == 1 => names[0].as_str(),
            FactionSpec::List(_) => return None,
        };
        (!is_any_token(name)).then_some(name)
    }

    /// Whether this build order names exactly `faction`.
    pub fn is(&self, faction: &str) -> bool {
        self.single() == Some(faction)
    }
}

/// A validated build order.
///
/// Created by [`crate::validation::validate_build_order`]; replaced wholesale
/// whenever the user edits the text.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOrder {
    /// Root fields in authored order; `build_order` itself is a placeholder
    header: Map<String, Value>,
    faction: FactionSpec,
    steps: Vec<Step>,
}

impl BuildOrder {
    pub(crate) fn new(header: Map<String, Value>, faction: FactionSpec, steps: Vec<Step>) -> Self {
        Self { header, faction, steps }
    }

    /// Build order title.
    pub fn name(&self) -> &str {
        self.header_str("name").unwrap_or_default()
    }

    /// Author, if given.
    pub fn author(&self) -> Option<&str> {
        self.header_str("author")
    }

    /// Where the build order comes from, if given.
    pub fn source(&self) -> Option<&str> {
        self.header_str("source")
    }

    /// Faction specifier.
    pub fn faction(&self) -> &FactionSpec {
        &self.faction
    }

    /// Steps in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Mutable access to the steps, for the timing estimator.
    pub fn steps_mut(&mut self) -> &mut [Step] {
        &mut self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the build order has no steps. Validated build orders never do.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`.
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Serialize back to a JSON value, keeping the authored key order.
    pub fn to_value(&self) -> Value {
        let mut root = self.header.clone();
        let steps = self.steps.iter().map(|step| Value::Object(step.fields().clone())).collect();
        root.insert("build_order".to_string(), Value::Array(steps));
        Value::Object(root)
    }

    /// Serialize back to indented JSON text.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    fn header_str(&self, key: &str) -> Option<&str> {
        self.header.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_must_be_whole_numbers() {
        assert_eq!(as_integer(&json!(3)), Some(3));
        assert_eq!(as_integer(&json!(-1)), Some(-1));
        assert_eq!(as_integer(&json!(4.0)), Some(4));
        assert_eq!(as_integer(&json!(4.5)), None);
        assert_eq!(as_integer(&json!("4")), None);
        assert_eq!(as_integer(&json!(true)), None);
    }

    #[test]
    fn nested_lookup_reads_inside_parent() {
        let step: Step = serde_json::from_value(json!({
            "villager_count": 6,
            "resources": {"wood": 2, "food": 4},
            "notes": ["Build @house.png@", 3, "Scout"],
        }))
        .unwrap();

        assert_eq!(step.integer("villager_count"), Some(6));
        assert_eq!(step.nested_integer("resources", "food"), Some(4));
        assert_eq!(step.nested_integer("resources", "gold"), None);
        assert_eq!(step.nested_integer("villager_count", "food"), None);
        assert_eq!(step.notes().collect::<Vec<_>>(), vec!["Build @house.png@", "Scout"]);
        assert!(step.notes_contain("house.png"));
    }

    #[test]
    fn single_faction_ignores_any_and_lists() {
        assert_eq!(FactionSpec::Single("Franks".into()).single(), Some("Franks"));
        assert_eq!(FactionSpec::List(vec!["Franks".into()]).single(), Some("Franks"));
        assert_eq!(FactionSpec::Single("Any".into()).single(), None);
        assert_eq!(FactionSpec::List(vec!["Franks".into(), "Huns".into()]).single(), None);
        assert!(FactionSpec::Single("Huns".into()).is("Huns"));
    }

    #[test]
    fn serializes_header_and_steps() {
        let mut header = Map::new();
        header.insert("name".into(), json!("Scouts"));
        header.insert("civilization".into(), json!("Franks"));
        header.insert("custom".into(), json!({"kept": true}));
        let mut bo = BuildOrder::new(
            header,
            FactionSpec::Single("Franks".into()),
            vec![Step::new().with("age", 1)],
        );
        bo.steps_mut()[0].set_time("0:25");

        let value = bo.to_value();
        assert_eq!(value["name"], "Scouts");
        assert_eq!(value["custom"]["kept"], true);
        assert_eq!(value["build_order"][0]["time"], "0:25");
        assert_eq!(bo.name(), "Scouts");
        assert_eq!(bo.author(), None);
    }
}
