//! Cumulative step time estimation.

use tracing::{debug, trace};

use super::TimingModel;
use crate::types::{BuildOrder, format_time};

/// Running totals carried from one step to the next.
#[derive(Debug)]
struct Progress {
    workers: i64,
    age: i64,
    elapsed: f64,
    age_up_started: bool,
    consumed: Vec<bool>,
}

/// Write an estimated `time` into every step of `build_order`.
///
/// `offset` is added to the clock before the first step; a negative offset
/// models a head start. Returns the whole seconds stored in each step.
///
/// The estimate is best-effort: workers are never assumed to die, only the
/// opening technologies listed in `model` are counted, and the result is
/// non-decreasing from step to step.
pub fn evaluate_timing(build_order: &mut BuildOrder, model: &TimingModel, offset: i64) -> Vec<i64> {
    let faction = build_order.faction().single().map(str::to_owned);
    let faction = faction.as_deref();

    let mut progress = Progress {
        workers: model.starting_workers(faction),
        age: 1,
        elapsed: offset as f64,
        age_up_started: false,
        consumed: vec![false; model.opening_techs.len()],
    };

    let step_count = build_order.len();
    let mut seconds = Vec::with_capacity(step_count);

    for (index, step) in build_order.steps_mut().iter_mut().enumerate() {
        let count = model.step_worker_count(step, faction).max(progress.workers);
        let mut new_workers = count - progress.workers;
        progress.workers = count;

        // Free workers from the age-up that finished on the previous step
        if std::mem::take(&mut progress.age_up_started) {
            new_workers -= model.bonus_workers(faction).min(new_workers);
        }

        let mut delta = new_workers as f64 * model.worker_time(progress.age, faction);

        if step.age() == Some(progress.age + 1) {
            if let Some(research) = model.age_up_time(progress.age, faction) {
                delta += research;
                progress.age += 1;
                progress.age_up_started = true;
            }
        }

        for (tech, consumed) in model.opening_techs.iter().zip(progress.consumed.iter_mut()) {
            if !*consumed && step.notes_contain(&tech.token) {
                delta += tech.time_for(faction);
                *consumed = true;
            }
        }

        progress.elapsed += delta;
        let mut current = (progress.elapsed.round() as i64).max(0);

        // Keep the last two steps from showing the same timestamp
        if index + 1 == step_count && step_count >= 2 && seconds.last() == Some(&current) {
            current = current.saturating_add(1);
        }

        trace!(step = index, workers = progress.workers, age = progress.age, delta, current);
        step.set_time(format_time(current));
        seconds.push(current);
    }

    debug!(
        version = %model.version,
        steps = step_count,
        offset,
        total = seconds.last().copied().unwrap_or(0),
        "Estimated build order timing"
    );
    seconds
}
