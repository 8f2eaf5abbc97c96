use serde::{Deserialize, Serialize};

use crate::error::{EngineError, SnapshotError};
use crate::types::{Cell, Color, Coord, NUM_CELLS};

/// 4x4x4 board represented by two disjoint bitboards, one bit per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Cell>", try_from = "Vec<Cell>")]
pub struct Board {
    white: u64,
    black: u64,
}

impl Board {
    /// Creates a board with all 64 cells empty.
    pub fn empty() -> Self {
        Self { white: 0, black: 0 }
    }

    /// Returns the occupant at `coord`.
    pub fn get(&self, coord: Coord) -> Result<Cell, EngineError> {
        Ok(self.cell_at(coord.index()?))
    }

    /// Returns a copy of the board with `coord` set to `cell`.
    pub fn set(&self, coord: Coord, cell: Cell) -> Result<Board, EngineError> {
        let square = bit(coord.index()?);
        let mut next = *self;
        next.white &= !square;
        next.black &= !square;
        match cell {
            Cell::Empty => {}
            Cell::White => next.white |= square,
            Cell::Black => next.black |= square,
        }
        Ok(next)
    }

    /// Returns `(white_count, black_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.white.count_ones() as u8, self.black.count_ones() as u8)
    }

    pub fn count_of(&self, color: Color) -> u8 {
        self.bits(color).count_ones() as u8
    }

    pub fn occupied_count(&self) -> u8 {
        (self.white | self.black).count_ones() as u8
    }

    pub fn empty_count(&self) -> u8 {
        NUM_CELLS as u8 - self.occupied_count()
    }

    pub fn is_full(&self) -> bool {
        (self.white | self.black) == u64::MAX
    }

    /// Empty cells in ascending index order.
    pub fn empty_cells(&self) -> Vec<Coord> {
        let mut bits = !(self.white | self.black);
        let mut out = Vec::with_capacity(bits.count_ones() as usize);
        while bits != 0 {
            out.push(Coord::from_index(bits.trailing_zeros() as usize));
            bits &= bits - 1;
        }
        out
    }

    /// Converts the board to one occupant per cell index.
    pub fn to_array(&self) -> [Cell; NUM_CELLS] {
        let mut cells = [Cell::Empty; NUM_CELLS];
        for (idx, cell) in cells.iter_mut().enumerate() {
            *cell = self.cell_at(idx);
        }
        cells
    }

    pub(crate) fn bits(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    /// Places a bead without validation, for search.
    /// Caller contract: `idx < NUM_CELLS` and the cell is empty.
    pub(crate) fn with_bead(&self, idx: usize, color: Color) -> Board {
        let mut next = *self;
        match color {
            Color::White => next.white |= bit(idx),
            Color::Black => next.black |= bit(idx),
        }
        next
    }

    /// Caller contract: `idx < NUM_CELLS`.
    pub(crate) fn cell_at(&self, idx: usize) -> Cell {
        let square = bit(idx);
        if (self.white & square) != 0 {
            Cell::White
        } else if (self.black & square) != 0 {
            Cell::Black
        } else {
            Cell::Empty
        }
    }

    #[cfg(test)]
    pub(crate) fn from_bitboards(white: u64, black: u64) -> Self {
        debug_assert_eq!(white & black, 0);
        Self { white, black }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Board> for Vec<Cell> {
    fn from(board: Board) -> Self {
        board.to_array().to_vec()
    }
}

impl TryFrom<Vec<Cell>> for Board {
    type Error = SnapshotError;

    fn try_from(cells: Vec<Cell>) -> Result<Self, Self::Error> {
        if cells.len() != NUM_CELLS {
            return Err(SnapshotError::BoardLength(cells.len()));
        }
        let mut board = Board::empty();
        for (idx, cell) in cells.into_iter().enumerate() {
            match cell {
                Cell::Empty => {}
                Cell::White => board.white |= bit(idx),
                Cell::Black => board.black |= bit(idx),
            }
        }
        Ok(board)
    }
}

fn bit(idx: usize) -> u64 {
    if idx < NUM_CELLS { 1u64 << idx } else { 0 }
}
