use wasm_bindgen::prelude::*;

pub mod ai;
pub mod api;
pub mod board;
pub mod codec;
pub mod config;
pub mod error;
pub mod game;
pub mod rules;
pub mod scoring;
pub mod types;

pub use board::Board;
pub use error::{ConfigError, EngineError, SnapshotError};
pub use game::GameState;
pub use types::{Cell, Color, Coord, Difficulty, EndReason, GameMode, GameSettings, Move, Scores};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
