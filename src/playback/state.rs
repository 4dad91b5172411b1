//! Manual and timer playback state machine

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace};

use crate::projector::{StepSelection, Timeline};
use crate::types::format_time;
use crate::{OverlayError, Result};

/// Playback mode shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PlaybackMode {
    /// Paging through steps by hand
    Manual,
    /// Timer mode, clock paused
    TimerStopped,
    /// Timer mode, clock advancing on every tick
    TimerRunning,
}

/// Discrete user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
pub enum PlaybackAction {
    PreviousStep,
    NextStep,
    ToggleTimerMode,
    StartTimer,
    StopTimer,
    ToggleStartStop,
    ResetTimer,
}

/// What a tick changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The whole-second clock moved
    pub time_changed: bool,
    /// The active steps are different; the overlay needs a redraw
    pub steps_changed: bool,
}

/// Playback position within one build order.
///
/// Elapsed time is derived from the instant the clock was last started, so a
/// late or skipped tick never loses time. Every method that reads the clock
/// takes `now` explicitly.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    timeline: Timeline,
    step_count: usize,
    step_index: usize,
    timer_mode: bool,
    running: bool,
    started_at: Instant,
    captured_elapsed: f64,
    elapsed: f64,
    time_int: i64,
    selection: StepSelection,
    speed_factor: Option<f64>,
}

impl PlaybackState {
    /// Manual playback at the first of `step_count` steps.
    ///
    /// `speed_factor` is the number of game seconds per real second; `None`
    /// means the game clock runs in real time.
    pub fn new(
        timeline: Timeline,
        step_count: usize,
        speed_factor: Option<f64>,
        now: Instant,
    ) -> Self {
        let selection = StepSelection::around(vec![0], timeline.len());
        Self {
            timeline,
            step_count,
            step_index: 0,
            timer_mode: false,
            running: false,
            started_at: now,
            captured_elapsed: 0.0,
            elapsed: 0.0,
            time_int: 0,
            selection,
            speed_factor: speed_factor.filter(|factor| factor.is_finite() && *factor > 0.0),
        }
    }

    pub fn mode(&self) -> PlaybackMode {
        match (self.timer_mode, self.running) {
            (false, _) => PlaybackMode::Manual,
            (true, false) => PlaybackMode::TimerStopped,
            (true, true) => PlaybackMode::TimerRunning,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn timer_available(&self) -> bool {
        self.timeline.is_available()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Manual step index.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Elapsed game time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Elapsed game time truncated to whole seconds.
    pub fn time_int(&self) -> i64 {
        self.time_int
    }

    /// `M:SS` label of the clock.
    pub fn time_label(&self) -> String {
        format_time(self.time_int)
    }

    /// Active timer steps and their display window.
    pub fn selection(&self) -> &StepSelection {
        &self.selection
    }

    pub fn speed_factor(&self) -> Option<f64> {
        self.speed_factor
    }

    /// Apply a user action.
    pub fn apply(&mut self, action: PlaybackAction, now: Instant) -> Result<()> {
        match action {
            PlaybackAction::PreviousStep => self.previous_step(),
            PlaybackAction::NextStep => self.next_step(),
            PlaybackAction::ToggleTimerMode => {
                self.toggle_timer_mode()?;
            }
            PlaybackAction::StartTimer => self.start(now),
            PlaybackAction::StopTimer => self.stop(),
            PlaybackAction::ToggleStartStop => self.toggle_start_stop(now),
            PlaybackAction::ResetTimer => self.reset(now),
        }
        Ok(())
    }

    /// Page back one step, or nudge the clock back one second in timer mode.
    pub fn previous_step(&mut self) {
        if self.timer_mode {
            self.nudge(-1.0);
        } else {
            self.step_index = self.step_index.saturating_sub(1);
        }
    }

    /// Page forward one step, or nudge the clock forward one second in timer
    /// mode.
    pub fn next_step(&mut self) {
        if self.timer_mode {
            self.nudge(1.0);
        } else if self.step_index + 1 < self.step_count {
            self.step_index += 1;
        }
    }

    /// Switch between manual and timer mode.
    ///
    /// Entering timer mode starts the clock from zero, stopped. Leaving it
    /// puts the manual index on the first active timer step.
    pub fn toggle_timer_mode(&mut self) -> Result<PlaybackMode> {
        if self.timer_mode {
            self.timer_mode = false;
            self.running = false;
            let first =
                self.selection.active.first().and_then(|&first| self.timeline.steps().get(first));
            if let Some(step) = first {
                self.step_index = step.index;
            }
        } else {
            if !self.timeline.is_available() {
                return Err(OverlayError::TimerUnavailable);
            }
            self.timer_mode = true;
            self.running = false;
            self.set_clock(0.0);
        }
        debug!(mode = ?self.mode(), "Playback mode changed");
        Ok(self.mode())
    }

    /// Start the clock. No-op outside timer mode or when already running.
    pub fn start(&mut self, now: Instant) {
        if self.timer_mode && !self.running {
            self.running = true;
            self.started_at = now;
            self.captured_elapsed = self.elapsed;
            debug!(elapsed = self.elapsed, "Timer started");
        }
    }

    /// Stop the clock, keeping the elapsed time reached by the last tick.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            debug!(elapsed = self.elapsed, "Timer stopped");
        }
    }

    pub fn toggle_start_stop(&mut self, now: Instant) {
        if self.running {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Put the clock back to zero without changing whether it runs.
    pub fn reset(&mut self, now: Instant) {
        self.started_at = now;
        self.captured_elapsed = 0.0;
        self.elapsed = 0.0;
        self.time_int = 0;
        self.selection = StepSelection::around(vec![0], self.timeline.len());
        debug!(running = self.running, "Timer reset");
    }

    /// Advance the clock to `now`.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.running {
            return TickOutcome::default();
        }

        let real = now.saturating_duration_since(self.started_at).as_secs_f64();
        self.elapsed = self.captured_elapsed + real * self.speed_factor.unwrap_or(1.0);

        let time_int = self.elapsed as i64;
        if time_int == self.time_int {
            return TickOutcome::default();
        }
        self.time_int = time_int;

        let selection = self.timeline.select(time_int);
        let steps_changed = selection.active != self.selection.active;
        self.selection = selection;

        trace!(elapsed = self.elapsed, steps_changed, "Timer tick");
        TickOutcome { time_changed: true, steps_changed }
    }

    /// Shift the clock by `seconds` (not below zero). While running, the
    /// captured value moves by the same amount so later ticks keep the nudge.
    fn nudge(&mut self, seconds: f64) {
        let target = (self.elapsed + seconds).max(0.0);
        let applied = target - self.elapsed;
        self.captured_elapsed += applied;
        self.elapsed = target;
        self.time_int = target as i64;
        self.selection = self.timeline.select(self.time_int);
        trace!(applied, elapsed = self.elapsed, "Timer nudged");
    }

    fn set_clock(&mut self, seconds: f64) {
        self.captured_elapsed = seconds;
        self.elapsed = seconds;
        self.time_int = seconds as i64;
        self.selection = self.timeline.select(self.time_int);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::TimerStep;
    use crate::types::{Step, TimeAlignment};
    use std::time::Duration;

    fn timeline(times: &[u32], alignment: TimeAlignment) -> Timeline {
        let steps = times
            .iter()
            .enumerate()
            .map(|(index, &seconds)| TimerStep {
                index,
                seconds,
                step: Step::new().with("notes", vec!["note"]),
            })
            .collect();
        Timeline::new(steps, alignment)
    }

    fn timer_state(times: &[u32], speed_factor: Option<f64>, now: Instant) -> PlaybackState {
        let timeline = timeline(times, TimeAlignment::Start);
        let mut state = PlaybackState::new(timeline, times.len(), speed_factor, now);
        state.toggle_timer_mode().unwrap();
        state
    }

    #[test]
    fn manual_paging_is_clamped() {
        let now = Instant::now();
        let mut state = PlaybackState::new(Timeline::default(), 3, None, now);
        state.previous_step();
        assert_eq!(state.step_index(), 0);
        state.next_step();
        state.next_step();
        state.next_step();
        assert_eq!(state.step_index(), 2);
        assert_eq!(state.mode(), PlaybackMode::Manual);
    }

    #[test]
    fn timer_mode_requires_timer_steps() {
        let mut state = PlaybackState::new(Timeline::default(), 3, None, Instant::now());
        assert!(matches!(state.toggle_timer_mode(), Err(OverlayError::TimerUnavailable)));
        assert_eq!(state.mode(), PlaybackMode::Manual);
        assert_eq!(state.step_count(), 3);
    }

    #[test]
    fn tick_uses_the_captured_elapsed_time() {
        let t0 = Instant::now();
        let mut state = timer_state(&[0, 10, 20], None, t0);
        state.set_clock(10.0);
        state.start(t0);
        assert_eq!(state.mode(), PlaybackMode::TimerRunning);

        let outcome = state.tick(t0 + Duration::from_millis(2500));
        assert_eq!(state.elapsed(), 12.5);
        assert_eq!(state.time_int(), 12);
        assert!(outcome.time_changed);
        assert!(!outcome.steps_changed);
        assert_eq!(state.selection().active, vec![1]);
    }

    #[test]
    fn tick_reports_step_changes() {
        let t0 = Instant::now();
        let mut state = timer_state(&[0, 10, 20], None, t0);
        state.start(t0);

        assert_eq!(state.tick(t0 + Duration::from_millis(500)), TickOutcome::default());
        let outcome = state.tick(t0 + Duration::from_secs(11));
        assert!(outcome.steps_changed);
        assert_eq!(state.selection().active, vec![1]);
    }

    #[test]
    fn speed_factor_scales_game_time() {
        let t0 = Instant::now();
        let mut state = timer_state(&[0, 10], Some(1.7), t0);
        state.start(t0);
        state.tick(t0 + Duration::from_secs(10));
        assert_eq!(state.time_int(), 17);
        assert_eq!(state.time_label(), "0:17");
    }

    #[test]
    fn stop_keeps_elapsed_and_ignores_ticks() {
        let t0 = Instant::now();
        let mut state = timer_state(&[0, 10], None, t0);
        state.toggle_start_stop(t0);
        state.tick(t0 + Duration::from_secs(5));
        state.toggle_start_stop(t0 + Duration::from_secs(6));
        assert_eq!(state.mode(), PlaybackMode::TimerStopped);

        state.tick(t0 + Duration::from_secs(60));
        assert_eq!(state.time_int(), 5);

        // Resuming continues from the stopped value
        state.start(t0 + Duration::from_secs(100));
        state.tick(t0 + Duration::from_secs(103));
        assert_eq!(state.time_int(), 8);
    }

    #[test]
    fn nudges_survive_running_ticks() {
        let t0 = Instant::now();
        let mut state = timer_state(&[0, 10, 20], None, t0);
        state.start(t0);
        state.tick(t0 + Duration::from_secs(4));

        state.next_step();
        assert_eq!(state.time_int(), 5);
        state.tick(t0 + Duration::from_secs(6));
        assert_eq!(state.time_int(), 7);

        state.previous_step();
        state.previous_step();
        assert_eq!(state.time_int(), 5);
        state.tick(t0 + Duration::from_secs(9));
        assert_eq!(state.time_int(), 8);
    }

    #[test]
    fn nudge_back_stops_at_zero() {
        let t0 = Instant::now();
        let mut state = timer_state(&[0, 10], None, t0);
        state.previous_step();
        assert_eq!(state.elapsed(), 0.0);
        state.next_step();
        assert_eq!(state.time_int(), 1);
        assert_eq!(state.step_index(), 0);
    }

    #[test]
    fn reset_returns_to_zero_and_keeps_running() {
        let t0 = Instant::now();
        let mut state = timer_state(&[0, 10, 20, 30], None, t0);
        state.start(t0);
        state.tick(t0 + Duration::from_secs(25));
        assert_eq!(state.selection().active, vec![2]);

        let t1 = t0 + Duration::from_secs(26);
        state.reset(t1);
        assert_eq!(state.elapsed(), 0.0);
        assert_eq!(state.time_int(), 0);
        assert_eq!(state.selection().active, vec![0]);
        assert!(state.is_running());

        state.tick(t1 + Duration::from_secs(3));
        assert_eq!(state.time_int(), 3);
    }

    #[test]
    fn leaving_timer_mode_keeps_the_active_step() {
        let t0 = Instant::now();
        let mut state = timer_state(&[0, 10, 20], None, t0);
        state.start(t0);
        state.tick(t0 + Duration::from_secs(15));
        assert_eq!(state.toggle_timer_mode().unwrap(), PlaybackMode::Manual);
        assert_eq!(state.step_index(), 1);
        assert!(!state.is_running());
    }

    #[test]
    fn actions_dispatch() {
        let t0 = Instant::now();
        let mut state = PlaybackState::new(timeline(&[0, 10], TimeAlignment::End), 2, None, t0);
        state.apply(PlaybackAction::NextStep, t0).unwrap();
        assert_eq!(state.step_index(), 1);
        state.apply(PlaybackAction::ToggleTimerMode, t0).unwrap();
        state.apply(PlaybackAction::StartTimer, t0).unwrap();
        assert_eq!(state.mode(), PlaybackMode::TimerRunning);
        state.apply(PlaybackAction::StopTimer, t0).unwrap();
        assert_eq!(state.mode(), PlaybackMode::TimerStopped);
        state.apply(PlaybackAction::ResetTimer, t0).unwrap();
        assert_eq!(state.time_int(), 0);
    }
}
