//! Overlay playback.
//!
//! [`PlaybackState`] is the synchronous state machine behind the overlay
//! buttons: manual paging, or a timer that selects steps from elapsed game
//! time. [`PlaybackDriver`] runs it on a tokio task, feeding periodic ticks
//! and user commands through a single queue.
//!
//! # Modes
//!
//! ```text
//!            toggle timer mode           start
//!   Manual ------------------> TimerStopped ----> TimerRunning
//!     ^  <------------------        ^  <---- stop ----'
//!     '----- toggle timer mode -----'--------------'
//! ```
//!
//! Paging in timer mode nudges the clock by one second instead of moving the
//! step index. Reset puts the clock at zero without starting or stopping it.
//!
//! # Example
//!
//! ```rust
//! use rts_overlay::playback::{PlaybackDriver, PlaybackAction, PlaybackMode};
//! use rts_overlay::session::OverlaySession;
//! use rts_overlay::types::Game;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> rts_overlay::Result<()> {
//! let handle = PlaybackDriver::spawn(OverlaySession::new(Game::Sc2), Duration::from_millis(250));
//! let report = handle
//!     .load(r#"{"name": "Pool first", "race": "Zerg", "build_order": [
//!         {"time": "0:00", "notes": ["Drone"]},
//!         {"time": "0:50", "notes": ["Spawning pool"]}
//!     ]}"#)
//!     .await?;
//! assert!(report.timer_available);
//!
//! handle.send(PlaybackAction::ToggleTimerMode).await?;
//! handle.send(PlaybackAction::StartTimer).await?;
//! assert_eq!(handle.snapshot().mode, PlaybackMode::TimerRunning);
//! # Ok(())
//! # }
//! ```

mod driver;
mod state;

pub use driver::{DriverCommand, DriverHandle, PlaybackDriver};
pub use state::{PlaybackAction, PlaybackMode, PlaybackState, TickOutcome};
