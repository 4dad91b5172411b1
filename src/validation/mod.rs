//! Schema validation for build orders.
//!
//! Validation is declarative: each game supplies an ordered list of
//! [`FieldDefinition`]s and the generic checks in this module walk it.
//!
//! # Behavior
//!
//! - Fields are checked in the order supplied and checking stops at the first
//!   failure, so a report names exactly one problem
//! - Nested fields are looked up inside their parent object; a missing parent
//!   is reported by its own name, a missing child as `parent/child`
//! - Ranges only apply to integer fields and either side may be unbounded, so
//!   a `-1` "not tracked" counter passes an `age <= 4` check untouched
//!
//! # Example
//!
//! ```rust
//! use rts_overlay::games::rules_for;
//! use rts_overlay::types::Game;
//! use rts_overlay::validation::parse_build_order;
//!
//! let text = r#"{
//!     "name": "Fast castle",
//!     "civilization": "Any",
//!     "build_order": [{
//!         "villager_count": 6,
//!         "resources": {"wood": 0, "food": 6, "gold": 0, "stone": 0},
//!         "notes": ["6 on sheep"]
//!     }]
//! }"#;
//!
//! let err = parse_build_order(text, rules_for(Game::Aoe2)).unwrap_err();
//! assert_eq!(err.to_string(), "Step 1: Missing field: \"age\".");
//! ```

mod field;
mod validator;

pub use field::{FieldDefinition, FieldType, IntRange};
pub use validator::{parse_build_order, validate_build_order, validate_faction, validate_step};
