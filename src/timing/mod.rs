//! Build order timing estimation.
//!
//! Games with a [`TimingModel`] can have the `time` of every step computed
//! from worker counts, age-ups and a few opening technologies. The formula
//! constants are data, so a patched game only needs a new table:
//!
//! ```rust
//! use rts_overlay::timing::TimingModel;
//!
//! let model = TimingModel::from_yaml_str(
//!     "version: patched
//! worker_field: villager_count
//! resources_field: resources
//! resource_counters: [wood, food, gold, stone]
//! worker_time: 24
//! starting_workers: 3
//! age_up_times: [130, 160, 190]
//! ",
//! )
//! .unwrap();
//! assert_eq!(model.max_age(), 4);
//! assert_eq!(model.worker_time(2, None), 24.0);
//! ```

mod estimator;
mod model;

pub use estimator::evaluate_timing;
pub use model::{OpeningTech, SpecialCounter, TimingModel};

use crate::games::RuleSet;
use crate::types::BuildOrder;
use crate::{OverlayError, Result};

/// Estimate step times with the rule set's built-in table.
pub fn estimate_for(
    rules: &dyn RuleSet,
    build_order: &mut BuildOrder,
    offset: i64,
) -> Result<Vec<i64>> {
    let model = rules.timing_model().ok_or_else(|| OverlayError::TimingUnsupported {
        game: rules.game().title().to_string(),
    })?;
    Ok(evaluate_timing(build_order, &model, offset))
}
