//! The overlay session: one game, one build order, one playback state.
//!
//! [`OverlaySession`] is the single owner of everything a build order
//! overlay needs between user actions. Loading text replaces the build order
//! wholesale and resets playback; a load that fails leaves the session empty
//! with the failure in its [`ValidationReport`].
//!
//! ```rust
//! use rts_overlay::session::OverlaySession;
//! use rts_overlay::types::Game;
//! use std::time::Instant;
//!
//! let mut session = OverlaySession::new(Game::Sc2);
//! let report = session.load_text(
//!     r#"{"name": "Reaper expand", "race": "Terran", "build_order": [
//!         {"time": "0:00", "notes": ["SCV"]},
//!         {"time": "0:18", "notes": ["Supply depot"]}
//!     ]}"#,
//!     Instant::now(),
//! );
//! assert!(report.valid);
//! assert!(report.timer_available);
//! assert_eq!(session.snapshot().step_count, 2);
//! ```

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::OverlayConfig;
use crate::games::{RuleSet, rules_for};
use crate::playback::{PlaybackAction, PlaybackMode, PlaybackState, TickOutcome};
use crate::projector::Timeline;
use crate::timing::{TimingModel, evaluate_timing};
use crate::types::{BuildOrder, Game, Step};
use crate::validation::{parse_build_order, validate_build_order};
use crate::{OverlayError, Result};

/// Outcome of the last load, as shown next to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ValidationReport {
    pub valid: bool,
    /// Empty when valid
    pub message: String,
    /// Whether the build order can also be played on a timer
    pub timer_available: bool,
}

impl ValidationReport {
    fn empty() -> Self {
        Self { valid: false, message: String::new(), timer_available: false }
    }

    fn failed(err: &OverlayError) -> Self {
        Self { valid: false, message: err.to_string(), timer_available: false }
    }
}

/// Everything a renderer needs to draw the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct OverlaySnapshot {
    pub game: Game,
    pub valid: bool,
    pub message: String,
    pub timer_available: bool,
    pub mode: PlaybackMode,
    pub running: bool,
    pub step_index: usize,
    pub step_count: usize,
    pub time_label: String,
    /// Active timer step indices
    pub active_steps: Vec<usize>,
    /// Build order indices of the steps on screen
    pub visible_steps: Vec<usize>,
    /// Indices into `visible_steps` to emphasize
    pub emphasized: Vec<usize>,
    /// Note lines of each visible step
    pub visible_notes: Vec<Vec<String>>,
}

/// One overlay: the selected game, its build order and playback.
pub struct OverlaySession {
    rules: &'static dyn RuleSet,
    timing_overrides: BTreeMap<Game, TimingModel>,
    speed_factor: Option<f64>,
    time_offset: i64,
    build_order: Option<BuildOrder>,
    report: ValidationReport,
    playback: PlaybackState,
}

impl std::fmt::Debug for OverlaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlaySession")
            .field("game", &self.rules.game())
            .field("report", &self.report)
            .field("mode", &self.playback.mode())
            .finish_non_exhaustive()
    }
}

impl OverlaySession {
    /// An empty session for `game`.
    pub fn new(game: Game) -> Self {
        let rules = rules_for(game);
        Self {
            rules,
            timing_overrides: BTreeMap::new(),
            speed_factor: None,
            time_offset: 0,
            build_order: None,
            report: ValidationReport::empty(),
            playback: PlaybackState::new(
                Timeline::default(),
                0,
                rules.timer_speed_factor(),
                Instant::now(),
            ),
        }
    }

    /// An empty session using the game, speed factor and timing tables of
    /// `config`.
    pub fn from_config(config: &OverlayConfig) -> Result<Self> {
        config.validate()?;
        let mut session = Self::new(config.game);
        session.timing_overrides = config.timing_overrides.clone();
        session.speed_factor = config.speed_factor;
        session.time_offset = config.time_offset;
        session.clear(Instant::now());
        Ok(session)
    }

    pub fn game(&self) -> Game {
        self.rules.game()
    }

    pub fn rules(&self) -> &'static dyn RuleSet {
        self.rules
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// The loaded build order, if the last load was valid.
    pub fn build_order(&self) -> Option<&BuildOrder> {
        self.build_order.as_ref()
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Configured offset for [`OverlaySession::evaluate_timing`].
    pub fn time_offset(&self) -> i64 {
        self.time_offset
    }

    /// Switch games. The build order is dropped since it was validated
    /// against the previous game's rules.
    pub fn set_game(&mut self, game: Game, now: Instant) {
        if game == self.game() {
            return;
        }
        info!(from = %self.game(), to = %game, "Switching game");
        self.rules = rules_for(game);
        self.clear(now);
    }

    /// Parse, validate and load build order text.
    pub fn load_text(&mut self, text: &str, now: Instant) -> &ValidationReport {
        let result = parse_build_order(text, self.rules);
        self.install(result, now)
    }

    /// Validate and load an already parsed document.
    pub fn load_value(&mut self, value: &Value, now: Instant) -> &ValidationReport {
        let result = validate_build_order(value, self.rules);
        self.install(result, now)
    }

    /// Formula table used for the current game, if it supports timing.
    pub fn timing_model(&self) -> Option<TimingModel> {
        self.timing_overrides.get(&self.game()).cloned().or_else(|| self.rules.timing_model())
    }

    /// Write estimated times into the loaded build order and return its new
    /// text. Playback restarts on the re-timed steps.
    ///
    /// `offset` defaults to the configured [`OverlaySession::time_offset`].
    pub fn evaluate_timing(&mut self, offset: Option<i64>, now: Instant) -> Result<String> {
        let offset = offset.unwrap_or(self.time_offset);
        let model = self.timing_model().ok_or_else(|| OverlayError::TimingUnsupported {
            game: self.game().title().to_string(),
        })?;
        let mut build_order = self.build_order.take().ok_or(OverlayError::EmptyBuildOrder)?;

        evaluate_timing(&mut build_order, &model, offset);
        let text = build_order.to_json_pretty();
        self.install(Ok(build_order), now);
        text
    }

    /// Append the rule set's default step and return the new text.
    pub fn append_step(&mut self, now: Instant) -> Result<String> {
        let build_order = self.build_order.as_ref().ok_or(OverlayError::EmptyBuildOrder)?;
        let step = self.rules.default_step(build_order.steps());

        let mut document = build_order.to_value();
        if let Some(steps) = document.get_mut("build_order").and_then(Value::as_array_mut) {
            steps.push(serde_json::to_value(step)?);
        }

        let build_order = validate_build_order(&document, self.rules)?;
        let text = build_order.to_json_pretty()?;
        self.install(Ok(build_order), now);
        Ok(text)
    }

    /// Apply a user action to playback.
    pub fn apply(&mut self, action: PlaybackAction, now: Instant) -> Result<()> {
        self.playback.apply(action, now).inspect_err(|e| {
            warn!(?action, error = %e, "Playback action rejected");
        })
    }

    /// Advance the playback clock.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        self.playback.tick(now)
    }

    /// The step shown in manual mode.
    pub fn current_step(&self) -> Option<&Step> {
        self.build_order.as_ref()?.step(self.playback.step_index())
    }

    /// Steps on screen: the timer window in timer mode, otherwise the
    /// current step.
    pub fn visible_steps(&self) -> Vec<(usize, &Step)> {
        if self.playback.mode() == PlaybackMode::Manual {
            let index = self.playback.step_index();
            return self.current_step().map(|step| vec![(index, step)]).unwrap_or_default();
        }

        let steps = self.playback.timeline().steps();
        self.playback
            .selection()
            .window()
            .filter_map(|i| steps.get(i))
            .map(|timer_step| (timer_step.index, &timer_step.step))
            .collect()
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        let visible = self.visible_steps();
        let emphasized = if self.playback.mode() == PlaybackMode::Manual {
            (0..visible.len()).collect()
        } else {
            self.playback.selection().window_active.clone()
        };

        OverlaySnapshot {
            game: self.game(),
            valid: self.report.valid,
            message: self.report.message.clone(),
            timer_available: self.report.timer_available,
            mode: self.playback.mode(),
            running: self.playback.is_running(),
            step_index: self.playback.step_index(),
            step_count: self.playback.step_count(),
            time_label: self.playback.time_label(),
            active_steps: self.playback.selection().active.clone(),
            visible_steps: visible.iter().map(|(index, _)| *index).collect(),
            emphasized,
            visible_notes: visible
                .iter()
                .map(|(_, step)| step.notes().map(str::to_owned).collect())
                .collect(),
        }
    }

    fn speed_factor(&self) -> Option<f64> {
        self.speed_factor.or_else(|| self.rules.timer_speed_factor())
    }

    fn clear(&mut self, now: Instant) {
        self.build_order = None;
        self.report = ValidationReport::empty();
        self.playback = PlaybackState::new(Timeline::default(), 0, self.speed_factor(), now);
    }

    fn install(&mut self, result: Result<BuildOrder>, now: Instant) -> &ValidationReport {
        match result {
            Ok(build_order) => {
                let timeline =
                    Timeline::from_build_order(&build_order, self.rules.time_alignment());
                self.report = ValidationReport {
                    valid: true,
                    message: String::new(),
                    timer_available: timeline.is_available(),
                };
                self.playback =
                    PlaybackState::new(timeline, build_order.len(), self.speed_factor(), now);
                debug!(
                    name = build_order.name(),
                    steps = build_order.len(),
                    timer = self.report.timer_available,
                    "Build order loaded"
                );
                self.build_order = Some(build_order);
            }
            Err(e) => {
                warn!(game = %self.game(), error = %e, "Build order rejected");
                self.clear(now);
                self.report = ValidationReport::failed(&e);
            }
        }
        &self.report
    }
}
