//! Build order overlay engine for real-time strategy games.
//!
//! RTS Overlay validates community build orders, estimates when each step
//! should happen, and plays them back step by step or on a game clock.
//!
//! # Features
//!
//! - **Validation**: Per-game step schemas with precise, 1-based error messages
//! - **Five Games**: Age of Empires II and IV, Age of Mythology, StarCraft II,
//!   Warcraft III
//! - **Timing Estimation**: Step times from worker counts, age-ups and opening
//!   technologies, with formula tables loadable from YAML
//! - **Playback**: Manual paging or a timer driven by a tokio task
//!
//! # Pipeline
//!
//! Build order text goes through [`validation`] against the game's
//! [`games::RuleSet`], optionally through [`timing`], then [`projector`]
//! decides whether timer playback is possible and [`playback`] runs it.
//! [`session::OverlaySession`] ties the stages together.
//!
//! ## Example
//!
//! ```rust
//! use rts_overlay::{PlaybackAction, RtsOverlay, Game};
//! use std::time::Instant;
//!
//! let mut session = RtsOverlay::session(Game::Aoe2);
//! let report = session.load_text(
//!     r#"{"name": "Scouts", "civilization": "Franks", "build_order": [
//!         {"villager_count": 6, "age": 1,
//!          "resources": {"wood": 0, "food": 6, "gold": 0, "stone": 0},
//!          "notes": ["6 on sheep"]},
//!         {"villager_count": 9, "age": 1,
//!          "resources": {"wood": 3, "food": 6, "gold": 0, "stone": 0},
//!          "notes": ["3 on wood"]}
//!     ]}"#,
//!     Instant::now(),
//! );
//! assert!(report.valid);
//! assert!(!report.timer_available);
//!
//! let text = session.evaluate_timing(None, Instant::now()).unwrap();
//! assert!(text.contains("\"time\": \"1:15\""));
//! session.apply(PlaybackAction::ToggleTimerMode, Instant::now()).unwrap();
//! ```

// Core types and error handling
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Build order pipeline
pub mod games;
pub mod projector;
pub mod timing;
pub mod validation;

// Playback and configuration
pub mod config;
pub mod playback;
pub mod session;

// Core exports
pub use error::*;
pub use types::*;

// Main API exports
pub use config::OverlayConfig;
pub use games::{GameRegistry, RuleSet, rules_for};
pub use playback::{DriverHandle, PlaybackAction, PlaybackDriver, PlaybackMode};
pub use session::{OverlaySession, OverlaySnapshot, ValidationReport};

/// Unified entry point for overlay sessions.
///
/// # Examples
///
/// ## Synchronous session
/// ```rust
/// use rts_overlay::{Game, RtsOverlay};
///
/// let session = RtsOverlay::session(Game::Sc2);
/// assert_eq!(session.game(), Game::Sc2);
/// ```
///
/// ## Playback task from configuration
/// ```rust,no_run
/// use rts_overlay::RtsOverlay;
///
/// #[tokio::main]
/// async fn main() -> rts_overlay::Result<()> {
///     let handle = RtsOverlay::spawn_from_path("overlay.yaml")?;
///     let snapshot = handle.snapshot();
///     println!("{} {}", snapshot.game, snapshot.time_label);
///     Ok(())
/// }
/// ```
pub struct RtsOverlay;

impl RtsOverlay {
    /// An empty session for `game` with default settings.
    pub fn session(game: Game) -> OverlaySession {
        OverlaySession::new(game)
    }

    /// Spawn a playback task for `game` with default settings.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(game: Game) -> DriverHandle {
        PlaybackDriver::spawn(OverlaySession::new(game), OverlayConfig::default().tick_interval())
    }

    /// Spawn a playback task configured by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Config`] if the configuration is invalid.
    pub fn spawn_with_config(config: &OverlayConfig) -> Result<DriverHandle> {
        let session = OverlaySession::from_config(config)?;
        Ok(PlaybackDriver::spawn(session, config.tick_interval()))
    }

    /// Spawn a playback task configured by a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Config`] if the file cannot be read or is
    /// invalid.
    pub fn spawn_from_path(path: impl AsRef<std::path::Path>) -> Result<DriverHandle> {
        Self::spawn_with_config(&OverlayConfig::from_path(path)?)
    }
}
