//! Supported games and how their step timestamps are read

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::OverlayError;

/// Closed set of games the overlay knows how to validate and play back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "lowercase")]
pub enum Game {
    /// Age of Empires II
    Aoe2,
    /// Age of Empires IV
    Aoe4,
    /// Age of Mythology
    Aom,
    /// StarCraft II
    Sc2,
    /// Warcraft III
    Wc3,
}

impl Game {
    /// Every supported game, in registry order.
    pub const ALL: [Game; 5] = [Game::Aoe2, Game::Aoe4, Game::Aom, Game::Sc2, Game::Wc3];

    /// Short identifier used in configuration files and by callers.
    pub fn id(self) -> &'static str {
        match self {
            Game::Aoe2 => "aoe2",
            Game::Aoe4 => "aoe4",
            Game::Aom => "aom",
            Game::Sc2 => "sc2",
            Game::Wc3 => "wc3",
        }
    }

    /// Human readable title.
    pub fn title(self) -> &'static str {
        match self {
            Game::Aoe2 => "Age of Empires II",
            Game::Aoe4 => "Age of Empires IV",
            Game::Aom => "Age of Mythology",
            Game::Sc2 => "StarCraft II",
            Game::Wc3 => "Warcraft III",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Game {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Game::ALL
            .into_iter()
            .find(|game| game.id() == s)
            .ok_or_else(|| OverlayError::UnknownGame { id: s.to_string() })
    }
}

/// What a step's timestamp marks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum TimeAlignment {
    /// The timestamp is when the step should begin.
    #[default]
    Start,
    /// The timestamp is when the step should be finished.
    End,
}
