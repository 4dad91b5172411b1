//! Fail-fast schema checks for build orders
//!
//! Every check stops at the first problem and reports it with the step index
//! and field path; callers never see a partially validated build order.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::field::{FieldDefinition, FieldType};
use crate::games::RuleSet;
use crate::types::{BuildOrder, FactionSpec, Step, as_integer, is_any_token};
use crate::{OverlayError, Result};

/// Check one step against an ordered list of field definitions.
///
/// `index` is the zero-based step position; messages show it 1-based.
pub fn validate_step(step: &Value, index: usize, fields: &[FieldDefinition]) -> Result<()> {
    let step_index = Some(index);
    let Some(step) = step.as_object() else {
        return Err(OverlayError::wrong_type(step_index, "build_order", "object"));
    };

    for field in fields {
        let value = match field.parent {
            Some(parent) => match step.get(parent) {
                None if field.required => {
                    return Err(OverlayError::missing_field(step_index, parent));
                }
                None => continue,
                Some(container) => match container.as_object() {
                    Some(container) => container.get(field.name),
                    None => return Err(OverlayError::wrong_type(step_index, parent, "object")),
                },
            },
            None => step.get(field.name),
        };

        let Some(value) = value else {
            if field.required {
                return Err(OverlayError::missing_field(step_index, field.path()));
            }
            continue;
        };

        if !field.field_type.matches(value) {
            return Err(OverlayError::wrong_type(
                step_index,
                field.path(),
                field.field_type.name(),
            ));
        }

        if let (FieldType::Integer, Some(range)) = (field.field_type, field.range) {
            // Type check above guarantees this is a whole number
            if let Some(number) = as_integer(value) {
                if !range.contains(number) {
                    return Err(OverlayError::OutOfRange {
                        step: step_index,
                        path: field.path(),
                        value: number,
                        range: range.to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Check a faction specifier: a single name or a non-empty list of names.
///
/// Each name must satisfy `is_known`, or be one of the "any" tokens when
/// `any_valid` is set.
pub fn validate_faction(
    value: Option<&Value>,
    field: &str,
    is_known: impl Fn(&str) -> bool,
    any_valid: bool,
) -> Result<FactionSpec> {
    let Some(value) = value else {
        return Err(OverlayError::missing_field(None, field));
    };

    let spec = match value {
        Value::String(name) => FactionSpec::Single(name.clone()),
        Value::Array(items) => {
            if items.is_empty() {
                return Err(OverlayError::EmptyFactionList { field: field.to_string() });
            }
            let names = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| OverlayError::wrong_type(None, field, "string"))
                })
                .collect::<Result<Vec<_>>>()?;
            FactionSpec::List(names)
        }
        _ => return Err(OverlayError::wrong_type(None, field, "string or array of strings")),
    };

    for name in spec.names() {
        let accepted = is_known(name) || (any_valid && is_any_token(name));
        if !accepted {
            return Err(OverlayError::UnknownFaction {
                field: field.to_string(),
                value: name.to_string(),
            });
        }
    }

    Ok(spec)
}

/// Parse build order text and validate it against a rule set.
pub fn parse_build_order(text: &str, rules: &dyn RuleSet) -> Result<BuildOrder> {
    let root: Value = serde_json::from_str(text)?;
    validate_build_order(&root, rules)
}

/// Validate a parsed build order against a rule set.
///
/// Root fields are checked first (name, faction, opponent, author, source),
/// then every step in order.
pub fn validate_build_order(root: &Value, rules: &dyn RuleSet) -> Result<BuildOrder> {
    let Some(root) = root.as_object() else {
        return Err(OverlayError::parse("build order", "root must be a JSON object"));
    };

    check_root_string(root, "name", true)?;

    let faction = validate_faction(
        root.get(rules.faction_field()),
        rules.faction_field(),
        |name| rules.faction(name).is_some(),
        rules.any_faction_valid(),
    )?;

    if let Some(opponent_field) = rules.opponent_field() {
        if root.contains_key(opponent_field) {
            validate_faction(
                root.get(opponent_field),
                opponent_field,
                |name| rules.faction(name).is_some(),
                true,
            )?;
        }
    }

    check_root_string(root, "author", false)?;
    check_root_string(root, "source", false)?;

    let Some(raw_steps) = root.get("build_order") else {
        return Err(OverlayError::missing_field(None, "build_order"));
    };
    let Some(raw_steps) = raw_steps.as_array() else {
        return Err(OverlayError::wrong_type(None, "build_order", "array"));
    };
    if raw_steps.is_empty() {
        return Err(OverlayError::EmptyBuildOrder);
    }

    let schema = rules.field_schema();
    let mut steps = Vec::with_capacity(raw_steps.len());
    for (index, raw) in raw_steps.iter().enumerate() {
        validate_step(raw, index, &schema)?;
        trace!(step = index, "Step passed schema checks");
        if let Value::Object(fields) = raw {
            steps.push(Step::from_map(fields.clone()));
        }
    }

    // Steps live in `steps`; the placeholder keeps the authored key position
    let mut header = root.clone();
    header.insert("build_order".to_string(), Value::Null);

    debug!(game = %rules.game(), steps = steps.len(), "Build order validated");
    Ok(BuildOrder::new(header, faction, steps))
}

fn check_root_string(root: &Map<String, Value>, field: &str, required: bool) -> Result<()> {
    match root.get(field) {
        None if required => Err(OverlayError::missing_field(None, field)),
        None => Ok(()),
        Some(value) if value.is_string() => Ok(()),
        Some(_) => Err(OverlayError::wrong_type(None, field, "string")),
    }
}
