//! Bot opponent used in player-vs-bot games.

mod eval;
mod search;

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::board::Board;
use crate::error::ConfigError;
use crate::types::{Color, Coord, Difficulty};

pub use eval::{WIN_SCORE, evaluate};
pub use search::Searcher;

const MAX_DEPTH: u8 = 6;

pub trait MoveSelector: Send + Sync {
    fn select_move(&self, board: &Board, color: Color, difficulty: Difficulty) -> Option<Coord>;
}

/// Plays the lowest-index empty cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstEmptySelector;

impl MoveSelector for FirstEmptySelector {
    fn select_move(&self, board: &Board, _color: Color, _difficulty: Difficulty) -> Option<Coord> {
        board.empty_cells().into_iter().next()
    }
}

/// Search depth per difficulty and the time budget of one bot move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub easy_depth: u8,
    pub medium_depth: u8,
    pub hard_depth: u8,
    pub time_budget_ms: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            easy_depth: 1,
            medium_depth: 2,
            hard_depth: 3,
            time_budget_ms: 2_000,
        }
    }
}

impl BotConfig {
    pub fn depth_for(&self, difficulty: Difficulty) -> u8 {
        match difficulty {
            Difficulty::Easy => self.easy_depth,
            Difficulty::Medium => self.medium_depth,
            Difficulty::Hard => self.hard_depth,
        }
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, depth) in [
            ("bot.easy_depth", self.easy_depth),
            ("bot.medium_depth", self.medium_depth),
            ("bot.hard_depth", self.hard_depth),
        ] {
            if !(1..=MAX_DEPTH).contains(&depth) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be in 1..={MAX_DEPTH}"
                )));
            }
        }
        if self.time_budget_ms == 0 {
            return Err(ConfigError::Validation(
                "bot.time_budget_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Alpha-beta bot; depth comes from the game's difficulty.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchSelector {
    config: BotConfig,
}

impl SearchSelector {
    pub fn new(config: BotConfig) -> Self {
        Self { config }
    }
}

impl MoveSelector for SearchSelector {
    fn select_move(&self, board: &Board, color: Color, difficulty: Difficulty) -> Option<Coord> {
        let depth = self.config.depth_for(difficulty);
        Searcher::with_timeout(depth, self.config.time_budget()).search(board, color)
    }
}
