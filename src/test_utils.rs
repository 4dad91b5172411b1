//! Test utilities for build order fixtures and tracing setup
//!
//! Fixtures live under `test-data/build_orders/` and are embedded at compile
//! time, so tests and benchmarks do not depend on the working directory.

#![cfg(any(test, feature = "benchmark"))]

use std::path::PathBuf;

use crate::types::{Game, format_time};

/// Age of Empires II archers opening for Britons, without times.
pub const AOE2_ARCHERS: &str = include_str!("../test-data/build_orders/aoe2_archers.json");
/// Age of Empires IV opening with times.
pub const AOE4_ENGLISH: &str = include_str!("../test-data/build_orders/aoe4_english.json");
/// Age of Mythology Zeus opening, with an untracked worker count.
pub const AOM_ZEUS: &str = include_str!("../test-data/build_orders/aom_zeus.json");
/// StarCraft II opening with five timed steps.
pub const SC2_REAPER_EXPAND: &str =
    include_str!("../test-data/build_orders/sc2_reaper_expand.json");
/// Warcraft III opening with times.
pub const WC3_HUMAN_FAST_EXPAND: &str =
    include_str!("../test-data/build_orders/wc3_human_fast_expand.json");

pub fn aoe2_build_order() -> String {
    AOE2_ARCHERS.to_string()
}

pub fn sc2_build_order() -> String {
    SC2_REAPER_EXPAND.to_string()
}

/// One valid fixture per game.
pub fn sample_build_orders() -> Vec<(Game, &'static str)> {
    vec![
        (Game::Aoe2, AOE2_ARCHERS),
        (Game::Aoe4, AOE4_ENGLISH),
        (Game::Aom, AOM_ZEUS),
        (Game::Sc2, SC2_REAPER_EXPAND),
        (Game::Wc3, WC3_HUMAN_FAST_EXPAND),
    ]
}

/// Directory holding the fixture files.
pub fn test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

/// A timed build order with `count` steps, `spacing` seconds apart.
pub fn timed_sc2_build_order(count: usize, spacing: u32) -> String {
    let steps: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            let seconds = i as i64 * i64::from(spacing);
            serde_json::json!({
                "time": format_time(seconds),
                "notes": [format!("Step {}", i + 1)],
            })
        })
        .collect();
    serde_json::json!({"name": "Generated", "race": "Protoss", "build_order": steps}).to_string()
}

/// Install a test subscriber once, honoring `RUST_LOG`.
#[cfg(test)]
pub fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
