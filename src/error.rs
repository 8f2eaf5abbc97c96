use std::path::PathBuf;

use crate::types::Color;

/// Errors produced by board access and game transitions.
///
/// All of them are local and deterministic: the input state is never
/// modified, so the caller can surface the error and keep the old snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("coordinate ({x}, {y}, {z}) is outside the 4x4x4 board")]
    OutOfRange { x: i32, y: i32, z: i32 },

    #[error("cell ({x}, {y}, {z}) is already occupied")]
    CellOccupied { x: u8, y: u8, z: u8 },

    #[error("it is {} to move", .expected.name())]
    NotYourTurn { expected: Color },

    #[error("game is already over")]
    GameOver,

    #[error("there is no pending draw offer from the opponent")]
    NoDrawOffer,

    #[error("move selector could not pick a move")]
    NoMoveSelected,
}

impl EngineError {
    /// Stable code used by the transport layer for error responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "OUT_OF_RANGE",
            Self::CellOccupied { .. } => "CELL_OCCUPIED",
            Self::NotYourTurn { .. } => "NOT_YOUR_TURN",
            Self::GameOver => "GAME_OVER",
            Self::NoDrawOffer => "NO_DRAW_OFFER",
            Self::NoMoveSelected => "NO_MOVE_SELECTED",
        }
    }
}

/// Errors raised while decoding or validating a persisted game snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("invalid snapshot magic (expected Q4D1)")]
    BadMagic,

    #[error("unsupported snapshot version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u32, actual: u32 },

    #[error("CRC32 mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("unexpected EOF while reading {0}")]
    Truncated(&'static str),

    #[error("snapshot payload has trailing bytes")]
    TrailingBytes,

    #[error("invalid value {value} for field {field}")]
    InvalidField { field: &'static str, value: u8 },

    #[error("board must have 64 cells, got {0}")]
    BoardLength(usize),

    #[error("move history does not replay: {0}")]
    Replay(#[from] EngineError),

    #[error("snapshot field `{field}` does not match its move history")]
    Inconsistent { field: &'static str },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
