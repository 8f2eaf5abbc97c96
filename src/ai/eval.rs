use crate::board::Board;
use crate::rules::WIN_LINES;
use crate::types::Color;

pub const WIN_SCORE: i32 = 1_000_000;

/// Value of an open line by the number of beads already on it.
const LINE_WEIGHTS: [i32; 4] = [0, 1, 10, 100];

/// Static evaluation from `color`'s perspective.
///
/// Only lines free of the other color count; a completed line dominates.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let mine = board.bits(color);
    let theirs = board.bits(color.opponent());

    let mut score = 0;
    for line in WIN_LINES.iter() {
        let m = (mine & line.mask).count_ones() as usize;
        let t = (theirs & line.mask).count_ones() as usize;
        match (m, t) {
            (4, _) => return WIN_SCORE,
            (_, 4) => return -WIN_SCORE,
            (m, 0) => score += LINE_WEIGHTS[m],
            (0, t) => score -= LINE_WEIGHTS[t],
            _ => {} // blocked
        }
    }
    score
}
