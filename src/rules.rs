//! Four-in-a-row detection on the 4x4x4 cube.
//!
//! A line runs along one of 13 directions: a direction and its negation
//! describe the same line, so only one of each pair is listed.

use once_cell::sync::Lazy;

use crate::board::Board;
use crate::types::{Color, Coord, NUM_CELLS};

/// Beads needed in a row to win.
pub const WIN_LENGTH: usize = 4;

/// Scan order for anchored detection: axes, face diagonals, space diagonals.
pub const DIRECTIONS: [(i8, i8, i8); 13] = [
    (1, 0, 0),
    (0, 1, 0),
    (0, 0, 1),
    (1, 1, 0),
    (1, -1, 0),
    (1, 0, 1),
    (1, 0, -1),
    (0, 1, 1),
    (0, 1, -1),
    (1, 1, 1),
    (1, 1, -1),
    (1, -1, 1),
    (1, -1, -1),
];

/// One complete winning line of the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinLine {
    pub cells: [Coord; WIN_LENGTH],
    pub mask: u64,
}

/// All 76 winning lines: 48 along axes, 24 face diagonals, 4 space diagonals.
pub static WIN_LINES: Lazy<Vec<WinLine>> = Lazy::new(generate_win_lines);

/// Checks whether the bead at `coord` completes a line.
///
/// Walks only the cells collinear with `coord`. When a run is longer than
/// four, the first window of four (from the `-d` end) that contains `coord`
/// is reported.
pub fn find_win_line(board: &Board, coord: Coord) -> Option<[Coord; WIN_LENGTH]> {
    let color = board.get(coord).ok()?.color()?;

    for dir in DIRECTIONS {
        let mut start = coord;
        while let Some(prev) = start.step(dir, -1) {
            if !is_color(board, prev, color) {
                break;
            }
            start = prev;
        }

        let mut run = vec![start];
        let mut cursor = start;
        while let Some(next) = cursor.step(dir, 1) {
            if !is_color(board, next, color) {
                break;
            }
            run.push(next);
            cursor = next;
        }

        if run.len() >= WIN_LENGTH {
            let anchor = run.iter().position(|&c| c == coord)?;
            let from = anchor.saturating_sub(WIN_LENGTH - 1);
            let mut cells = [coord; WIN_LENGTH];
            cells.copy_from_slice(&run[from..from + WIN_LENGTH]);
            return Some(cells);
        }
    }
    None
}

/// Fast anchored check without reporting cells.
pub fn has_win_at(board: &Board, coord: Coord) -> bool {
    find_win_line(board, coord).is_some()
}

/// Scans every line of the board; returns the first complete one.
pub fn find_any_win(board: &Board) -> Option<(Color, [Coord; WIN_LENGTH])> {
    WIN_LINES.iter().find_map(|line| {
        [Color::White, Color::Black]
            .into_iter()
            .find(|&color| board.bits(color) & line.mask == line.mask)
            .map(|color| (color, line.cells))
    })
}

fn is_color(board: &Board, coord: Coord, color: Color) -> bool {
    matches!(board.get(coord), Ok(cell) if cell.color() == Some(color))
}

fn generate_win_lines() -> Vec<WinLine> {
    let mut lines = Vec::new();
    for idx in 0..NUM_CELLS {
        let start = Coord::from_index(idx);
        for dir in DIRECTIONS {
            // Only count a line from the end where it enters the cube.
            if start.step(dir, -1).is_some() {
                continue;
            }
            let Some(cells) = collect_line(start, dir) else {
                continue;
            };
            let mask = cells
                .iter()
                .filter_map(|c| c.index().ok())
                .fold(0u64, |acc, i| acc | (1u64 << i));
            lines.push(WinLine { cells, mask });
        }
    }
    lines
}

fn collect_line(start: Coord, dir: (i8, i8, i8)) -> Option<[Coord; WIN_LENGTH]> {
    let mut cells = [start; WIN_LENGTH];
    for (i, cell) in cells.iter_mut().enumerate() {
        *cell = start.step(dir, i as i8)?;
    }
    Some(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn place(board: Board, cells: &[(u8, u8, u8)], cell: Cell) -> Board {
        cells.iter().fold(board, |b, &(x, y, z)| {
            b.set(Coord::new(x, y, z), cell).unwrap()
        })
    }

    #[test]
    fn there_are_76_distinct_lines() {
        assert_eq!(WIN_LINES.len(), 76);

        let mut masks: Vec<u64> = WIN_LINES.iter().map(|l| l.mask).collect();
        masks.sort_unstable();
        masks.dedup();
        assert_eq!(masks.len(), 76);
        assert!(WIN_LINES.iter().all(|l| l.mask.count_ones() == 4));
    }

    #[test]
    fn corner_and_center_cells_sit_on_seven_lines() {
        let on = |c: Coord| {
            let bit = 1u64 << c.index().unwrap();
            WIN_LINES.iter().filter(|l| l.mask & bit != 0).count()
        };
        assert_eq!(on(Coord::new(0, 0, 0)), 7);
        assert_eq!(on(Coord::new(1, 1, 1)), 7);
        assert_eq!(on(Coord::new(1, 0, 0)), 4);
    }

    #[test]
    fn detects_space_diagonal_from_a_middle_cell() {
        let board = place(
            Board::empty(),
            &[(0, 3, 3), (1, 2, 2), (2, 1, 1), (3, 0, 0)],
            Cell::Black,
        );

        let cells = find_win_line(&board, Coord::new(2, 1, 1)).unwrap();

        assert_eq!(
            cells,
            [
                Coord::new(0, 3, 3),
                Coord::new(1, 2, 2),
                Coord::new(2, 1, 1),
                Coord::new(3, 0, 0),
            ]
        );
    }

    #[test]
    fn three_in_a_row_is_not_a_win() {
        let board = place(Board::empty(), &[(0, 0, 2), (0, 1, 2), (0, 2, 2)], Cell::White);
        let board = place(board, &[(0, 3, 2)], Cell::Black);

        assert_eq!(find_win_line(&board, Coord::new(0, 1, 2)), None);
        assert_eq!(find_any_win(&board), None);
    }

    #[test]
    fn empty_or_out_of_range_anchor_is_not_a_win() {
        let board = place(Board::empty(), &[(0, 0, 0), (1, 0, 0), (2, 0, 0), (3, 0, 0)], Cell::White);

        assert_eq!(find_win_line(&board, Coord::new(0, 1, 0)), None);
        assert_eq!(find_win_line(&board, Coord::new(7, 0, 0)), None);
    }

    #[test]
    fn first_direction_in_scan_order_wins_ties() {
        // (0,0,0) completes both the x axis line and the z axis line.
        let board = place(
            Board::empty(),
            &[
                (0, 0, 0),
                (1, 0, 0),
                (2, 0, 0),
                (3, 0, 0),
                (0, 0, 1),
                (0, 0, 2),
                (0, 0, 3),
            ],
            Cell::White,
        );

        let cells = find_win_line(&board, Coord::new(0, 0, 0)).unwrap();

        assert_eq!(cells[3], Coord::new(3, 0, 0));
    }

    #[test]
    fn full_scan_reports_color_of_the_line() {
        let board = place(Board::empty(), &[(2, 0, 3), (2, 1, 2), (2, 2, 1), (2, 3, 0)], Cell::Black);

        let (color, cells) = find_any_win(&board).unwrap();

        assert_eq!(color, Color::Black);
        assert!(cells.contains(&Coord::new(2, 2, 1)));
    }
}
