//! Core types for build order representation.
//!
//! This module provides the data structures shared by every layer of the
//! overlay:
//! - [`Game`] is the closed set of supported games, parsed from short ids
//! - [`BuildOrder`] is a validated document with its [`Step`] list
//! - [`FactionSpec`] is the faction field (single name or list)
//! - [`format_time`] and [`parse_time`] convert between seconds and `M:SS`
//!
//! ## Usage Example
//!
//! ```rust
//! use rts_overlay::types::{Game, Step, format_time, parse_time};
//!
//! let game: Game = "aoe2".parse().unwrap();
//! assert_eq!(game, Game::Aoe2);
//!
//! let mut step = Step::new().with("age", 2).with("notes", vec!["Build a mill"]);
//! step.set_time(format_time(125));
//! assert_eq!(step.time().and_then(parse_time), Some(125));
//! ```

mod build_order;
mod game;
mod time;

pub use build_order::{
    ANY_FACTION_TOKENS, BuildOrder, FactionSpec, Step, as_integer, is_any_token,
};
pub use game::{Game, TimeAlignment};
pub use time::{format_time, parse_time};
