//! Timer steps and active step selection.
//!
//! A build order qualifies for timer mode when every step has notes and a
//! parseable `M:SS` time, and the times never go backwards. The projected
//! [`TimerStep`] list is then searched on every tick for the steps matching
//! the current clock.
//!
//! # Alignment
//!
//! Some games write the time a step *starts* ([`TimeAlignment::Start`]):
//! the active steps are the last ones whose time has been reached. Others
//! write the time a step should be *done* ([`TimeAlignment::End`]): the
//! active steps are the first ones whose time has not passed yet.
//!
//! # Example
//!
//! ```rust
//! use rts_overlay::projector::select_active_steps;
//! use rts_overlay::types::TimeAlignment;
//!
//! let times = [0, 30, 30, 90];
//! let selection = select_active_steps(&times, 45, TimeAlignment::Start);
//! assert_eq!(selection.active, vec![1, 2]);
//!
//! let selection = select_active_steps(&times, 45, TimeAlignment::End);
//! assert_eq!(selection.active, vec![3]);
//! ```

use serde::Serialize;
use tracing::debug;

use crate::types::{BuildOrder, Step, TimeAlignment, parse_time};

/// A step with its parsed time attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerStep {
    /// Position in the build order
    pub index: usize,
    pub seconds: u32,
    pub step: Step,
}

/// Project `build_order` onto timer steps.
///
/// Returns an empty list when timer mode is unavailable: a step lacks notes
/// or a valid time, or a time is earlier than the one before it.
pub fn project_timer_steps(build_order: &BuildOrder) -> Vec<TimerStep> {
    let mut projected: Vec<TimerStep> = Vec::with_capacity(build_order.len());

    for (index, step) in build_order.steps().iter().enumerate() {
        if step.get("notes").is_none() {
            debug!(step = index, "Timer mode unavailable: step has no notes");
            return Vec::new();
        }
        let Some(seconds) = step.time().and_then(parse_time) else {
            debug!(step = index, "Timer mode unavailable: step has no valid time");
            return Vec::new();
        };
        if projected.last().is_some_and(|previous| previous.seconds > seconds) {
            debug!(step = index, "Timer mode unavailable: times go backwards");
            return Vec::new();
        }
        projected.push(TimerStep { index, seconds, step: step.clone() });
    }

    projected
}

/// Active steps for a clock value, plus the display window around them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct StepSelection {
    /// Active step indices, ascending
    pub active: Vec<usize>,
    /// First step index shown
    pub window_start: usize,
    /// Number of steps shown
    pub window_len: usize,
    /// Active indices relative to `window_start`
    pub window_active: Vec<usize>,
}

impl StepSelection {
    /// Bound the displayed steps to one neighbor on each side of `active`,
    /// a contiguous ascending group out of `count` steps.
    pub fn around(active: Vec<usize>, count: usize) -> Self {
        let (first, last) = match (active.first(), active.last()) {
            (Some(&first), Some(&last)) if last < count => (first, last),
            _ => {
                return Self {
                    active: Vec::new(),
                    window_start: 0,
                    window_len: 0,
                    window_active: Vec::new(),
                };
            }
        };

        let touches_boundary = first == 0 || last + 1 == count;
        let show_all = if touches_boundary { count <= 2 } else { count <= 3 };

        let (window_start, window_end) = if show_all {
            (0, count)
        } else {
            (first.saturating_sub(1), (last + 2).min(count))
        };

        let window_active = active.iter().map(|index| index - window_start).collect();
        Self { active, window_start, window_len: window_end - window_start, window_active }
    }

    /// Absolute indices of the displayed steps.
    pub fn window(&self) -> std::ops::Range<usize> {
        self.window_start..self.window_start + self.window_len
    }
}

/// Select the active steps among `times` (non-decreasing seconds) at clock `t`.
///
/// An empty `times` yields an empty selection.
pub fn select_active_steps(times: &[u32], t: i64, alignment: TimeAlignment) -> StepSelection {
    let count = times.len();
    if count == 0 {
        return StepSelection::around(Vec::new(), 0);
    }

    let active = match alignment {
        TimeAlignment::Start => {
            // Latest timestamp already reached, default to the first step
            match times.iter().rposition(|&time| i64::from(time) <= t) {
                Some(last) => {
                    let time = times[last];
                    let first = times[..last]
                        .iter()
                        .rposition(|&other| other != time)
                        .map_or(0, |i| i + 1);
                    (first..=last).collect()
                }
                None => vec![0],
            }
        }
        TimeAlignment::End => {
            // Earliest timestamp not yet passed, default to the last step
            match times.iter().position(|&time| i64::from(time) >= t) {
                Some(first) => {
                    let time = times[first];
                    let last = times[first..]
                        .iter()
                        .position(|&other| other != time)
                        .map_or(count - 1, |i| first + i - 1);
                    (first..=last).collect()
                }
                None => vec![count - 1],
            }
        }
    };

    StepSelection::around(active, count)
}

/// Timer steps of one build order together with the game's alignment.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    steps: Vec<TimerStep>,
    times: Vec<u32>,
    alignment: TimeAlignment,
}

impl Timeline {
    pub fn new(steps: Vec<TimerStep>, alignment: TimeAlignment) -> Self {
        let times = steps.iter().map(|step| step.seconds).collect();
        Self { steps, times, alignment }
    }

    /// Project `build_order` directly.
    pub fn from_build_order(build_order: &BuildOrder, alignment: TimeAlignment) -> Self {
        Self::new(project_timer_steps(build_order), alignment)
    }

    /// Whether timer mode can be entered.
    pub fn is_available(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn steps(&self) -> &[TimerStep] {
        &self.steps
    }

    pub fn alignment(&self) -> TimeAlignment {
        self.alignment
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Select the active steps at clock `t`.
    pub fn select(&self, t: i64) -> StepSelection {
        select_active_steps(&self.times, t, self.alignment)
    }
}
