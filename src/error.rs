//! Error types for build order processing.
//!
//! This module provides the error taxonomy shared by the validator, the timing
//! estimator and the overlay session. All errors implement the
//! `std::error::Error` trait and carry enough context (step index, field path)
//! to be shown to the user verbatim.
//!
//! ## Error Categories
//!
//! - **Parse Errors**: The build order text is not valid JSON or not an object
//! - **Schema Errors**: Missing, mistyped or out-of-range step fields
//! - **Faction Errors**: Unknown or empty faction specifiers
//! - **Capability Errors**: Timing or timer mode requested where unavailable
//! - **Contract Errors**: Unknown game identifiers supplied by the caller
//! - **Driver Errors**: Commands sent to a playback driver that has stopped
//!
//! ## Recovery
//!
//! Everything except [`OverlayError::UnknownGame`] and
//! [`OverlayError::DriverClosed`] is a user-facing condition:
//!
//! ```rust
//! use rts_overlay::OverlayError;
//!
//! let error = OverlayError::missing_field(Some(1), "age");
//! assert_eq!(error.to_string(), "Step 2: Missing field: \"age\".");
//! assert!(error.is_recoverable());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Result type alias for overlay operations.
pub type Result<T, E = OverlayError> = std::result::Result<T, E>;

/// Prefix naming the step an error belongs to (1-based), or nothing for
/// root-level fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepLabel(pub Option<usize>);

fn step_label(step: &Option<usize>) -> StepLabel {
    StepLabel(*step)
}

impl fmt::Display for StepLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(index) => write!(f, "Step {}: ", index + 1),
            None => Ok(()),
        }
    }
}

/// Main error type for overlay operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OverlayError {
    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("{}Missing field: \"{path}\".", step_label(.step))]
    MissingField { step: Option<usize>, path: String },

    #[error("{}Wrong type for field \"{path}\" (expected {expected}).", step_label(.step))]
    WrongType { step: Option<usize>, path: String, expected: &'static str },

    #[error("{}Field \"{path}\" value {value} is out of range {range}.", step_label(.step))]
    OutOfRange { step: Option<usize>, path: String, value: i64, range: String },

    #[error("Unknown value \"{value}\" for field \"{field}\".")]
    UnknownFaction { field: String, value: String },

    #[error("Field \"{field}\" must not be an empty list.")]
    EmptyFactionList { field: String },

    #[error("Build order must contain at least one step.")]
    EmptyBuildOrder,

    #[error("Unknown game identifier \"{id}\"")]
    UnknownGame { id: String },

    #[error("Timing estimation is not supported for {game}")]
    TimingUnsupported { game: String },

    #[error("Timer mode is unavailable for the current build order")]
    TimerUnavailable,

    #[error("Configuration error: {details}")]
    Config { details: String },

    #[error("Playback driver has shut down")]
    DriverClosed,
}

impl OverlayError {
    /// Returns whether this error is a user-facing condition the session can
    /// report and recover from.
    ///
    /// [`OverlayError::UnknownGame`] means the caller supplied an identifier
    /// outside the closed set of games and is treated as a contract violation.
    /// [`OverlayError::DriverClosed`] means the playback task is gone.
    pub fn is_recoverable(&self) -> bool {
        match self {
            OverlayError::Parse { .. } => true,
            OverlayError::MissingField { .. } => true,
            OverlayError::WrongType { .. } => true,
            OverlayError::OutOfRange { .. } => true,
            OverlayError::UnknownFaction { .. } => true,
            OverlayError::EmptyFactionList { .. } => true,
            OverlayError::EmptyBuildOrder => true,
            OverlayError::UnknownGame { .. } => false,
            OverlayError::TimingUnsupported { .. } => true,
            OverlayError::TimerUnavailable => true,
            OverlayError::Config { .. } => true,
            OverlayError::DriverClosed => false,
        }
    }

    /// Returns whether this error came out of schema validation.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            OverlayError::MissingField { .. }
                | OverlayError::WrongType { .. }
                | OverlayError::OutOfRange { .. }
                | OverlayError::UnknownFaction { .. }
                | OverlayError::EmptyFactionList { .. }
                | OverlayError::EmptyBuildOrder
        )
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            OverlayError::Parse { .. } => vec![
                "Check the build order is valid JSON",
                "Look for trailing commas or unbalanced brackets",
            ],
            OverlayError::MissingField { .. } => vec![
                "Add the missing field to the reported step",
                "Start from the game's build order template",
            ],
            OverlayError::WrongType { .. } => vec![
                "Use whole numbers for counters",
                "Wrap notes in a list of strings",
            ],
            OverlayError::OutOfRange { .. } => vec![
                "Check the age is not above the game's last age",
                "Use -1 for counters that are not tracked",
            ],
            OverlayError::UnknownFaction { .. } => vec![
                "Check the faction name spelling",
                "Use \"any\" where the game allows it",
            ],
            OverlayError::EmptyFactionList { .. } => {
                vec!["List at least one faction", "Use \"any\" where the game allows it"]
            }
            OverlayError::EmptyBuildOrder => vec!["Add at least one step to the build order"],
            OverlayError::UnknownGame { .. } => {
                vec!["Select one of the supported games", "Check the configured game identifier"]
            }
            OverlayError::TimingUnsupported { .. } => {
                vec!["Write the step times by hand", "Use manual paging for this game"]
            }
            OverlayError::TimerUnavailable => vec![
                "Give every step a \"time\" field",
                "Make sure step times never decrease",
            ],
            OverlayError::Config { .. } => vec![
                "Check the configuration file is valid YAML",
                "Compare the timing table fields against the defaults",
            ],
            OverlayError::DriverClosed => {
                vec!["Spawn a new playback driver", "Check the driver was not cancelled"]
            }
        }
    }

    /// Helper constructor for parse errors.
    pub fn parse(context: impl Into<String>, details: impl Into<String>) -> Self {
        OverlayError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for missing field errors.
    pub fn missing_field(step: Option<usize>, path: impl Into<String>) -> Self {
        OverlayError::MissingField { step, path: path.into() }
    }

    /// Helper constructor for wrong type errors.
    pub fn wrong_type(
        step: Option<usize>,
        path: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        OverlayError::WrongType { step, path: path.into(), expected }
    }

    /// Helper constructor for configuration errors.
    pub fn config(details: impl Into<String>) -> Self {
        OverlayError::Config { details: details.into() }
    }
}

impl From<serde_json::Error> for OverlayError {
    fn from(err: serde_json::Error) -> Self {
        OverlayError::parse("build order JSON", err.to_string())
    }
}

impl From<serde_yaml_ng::Error> for OverlayError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        OverlayError::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
          #[test]
          fn step_errors_name_the_one_based_step(
            step in 0usize..500usize,
            path in "[a-z_]{1,12}(/[a-z_]{1,12})?"
          ) {
            let missing = OverlayError::missing_field(Some(step), path.clone());
            let message = missing.to_string();
            let expected_prefix = format!("Step {}: ", step + 1);
            prop_assert!(message.starts_with(&expected_prefix));
            prop_assert!(message.contains(&path));

            let wrong = OverlayError::wrong_type(Some(step), path.clone(), "integer");
            prop_assert!(wrong.to_string().contains("integer"));
          }

          #[test]
          fn root_errors_have_no_step_prefix(path in "[a-z_]{1,12}") {
            let missing = OverlayError::missing_field(None, path.clone());
            prop_assert_eq!(missing.to_string(), format!("Missing field: \"{}\".", path));
          }
        }
    }

    #[test]
    fn missing_age_message_matches_report_format() {
        let error = OverlayError::missing_field(Some(1), "age");
        assert_eq!(error.to_string(), "Step 2: Missing field: \"age\".");
    }

    #[test]
    fn out_of_range_message_includes_value_and_range() {
        let error = OverlayError::OutOfRange {
            step: Some(0),
            path: "age".to_string(),
            value: 7,
            range: "[-inf, 4]".to_string(),
        };
        assert_eq!(error.to_string(), "Step 1: Field \"age\" value 7 is out of range [-inf, 4].");
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<OverlayError>();

        let error = OverlayError::EmptyBuildOrder;
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn recovery_classification() {
        assert!(OverlayError::EmptyBuildOrder.is_recoverable());
        assert!(OverlayError::TimerUnavailable.is_recoverable());
        assert!(!OverlayError::UnknownGame { id: "chess".to_string() }.is_recoverable());

        assert!(OverlayError::missing_field(None, "name").is_schema_error());
        assert!(!OverlayError::parse("json", "eof").is_schema_error());

        for error in [
            OverlayError::EmptyBuildOrder,
            OverlayError::TimerUnavailable,
            OverlayError::config("bad"),
            OverlayError::UnknownGame { id: "x".to_string() },
        ] {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty());
            for suggestion in suggestions {
                assert!(suggestion.len() > 5);
            }
        }
    }

    #[test]
    fn from_json_error_is_parse_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: OverlayError = err.into();
        assert!(matches!(converted, OverlayError::Parse { .. }));
    }
}
