use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Cells per axis.
pub const BOARD_WIDTH: u8 = 4;
/// Cells on the whole cube.
pub const NUM_CELLS: usize = 64;

/// A board coordinate. Cell index is `x + 4y + 16z`.
///
/// Fields are not range-checked on construction; `Board` rejects anything
/// outside `[0, 3]` with `EngineError::OutOfRange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Builds a coordinate from transport-level integers.
    pub fn from_signed(x: i32, y: i32, z: i32) -> Result<Self, EngineError> {
        let axis = |v: i32| u8::try_from(v).ok().filter(|&v| v < BOARD_WIDTH);
        match (axis(x), axis(y), axis(z)) {
            (Some(x), Some(y), Some(z)) => Ok(Self { x, y, z }),
            _ => Err(EngineError::OutOfRange { x, y, z }),
        }
    }

    pub fn is_valid(self) -> bool {
        self.x < BOARD_WIDTH && self.y < BOARD_WIDTH && self.z < BOARD_WIDTH
    }

    /// Returns the cell index, or `OutOfRange`.
    pub fn index(self) -> Result<usize, EngineError> {
        if !self.is_valid() {
            return Err(EngineError::OutOfRange {
                x: self.x.into(),
                y: self.y.into(),
                z: self.z.into(),
            });
        }
        let w = BOARD_WIDTH as usize;
        Ok(self.x as usize + self.y as usize * w + self.z as usize * w * w)
    }

    /// Caller contract: `idx < NUM_CELLS`.
    pub(crate) fn from_index(idx: usize) -> Self {
        let w = BOARD_WIDTH as usize;
        debug_assert!(idx < NUM_CELLS);
        Self {
            x: (idx % w) as u8,
            y: ((idx / w) % w) as u8,
            z: (idx / (w * w)) as u8,
        }
    }

    /// Steps `steps` times along `dir`; `None` once the walk leaves the cube.
    pub(crate) fn step(self, dir: (i8, i8, i8), steps: i8) -> Option<Self> {
        let axis = |v: u8, d: i8| {
            let next = v as i16 + d as i16 * steps as i16;
            (0..BOARD_WIDTH as i16).contains(&next).then_some(next as u8)
        };
        Some(Self {
            x: axis(self.x, dir.0)?,
            y: axis(self.y, dir.1)?,
            z: axis(self.z, dir.2)?,
        })
    }
}

/// Side to move / owner of a bead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

/// Occupant of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    White,
    Black,
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Cell::White,
            Color::Black => Cell::Black,
        }
    }
}

impl Cell {
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::White => Some(Color::White),
            Cell::Black => Some(Color::Black),
        }
    }
}

/// One placement: a coordinate and the color that placed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub coord: Coord,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    #[serde(rename = "pvp")]
    PlayerVsPlayer,
    #[serde(rename = "pvb")]
    PlayerVsBot,
}

/// Match parameters fixed when the game is created. They survive `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub difficulty: Difficulty,
    pub mode: GameMode,
}

/// Why a game reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndReason {
    Win,
    BoardFull,
    Resign,
    Leave,
    Abort,
    DrawAgreed,
}

/// Final points per color. Both stay zero until a line win settles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scores {
    pub white: u32,
    pub black: u32,
}

impl Scores {
    pub fn of(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}
