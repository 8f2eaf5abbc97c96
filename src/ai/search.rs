use web_time::{Duration, Instant};

use crate::ai::eval::{WIN_SCORE, evaluate};
use crate::board::Board;
use crate::rules;
use crate::types::{Color, Coord};

const DEFAULT_TIMEOUT_MS: u64 = 2_000;
const MIN_SCORE: i32 = -2 * WIN_SCORE;
const MAX_SCORE: i32 = 2 * WIN_SCORE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchResult {
    Complete(usize, i32),
    TimedOut,
}

pub struct Searcher {
    start_time: Instant,
    timeout: Duration,
    max_depth: u8,
    timed_out: bool,
}

impl Searcher {
    pub fn new(max_depth: u8) -> Self {
        Self::with_timeout(max_depth, Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    pub fn with_timeout(max_depth: u8, timeout: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            timeout,
            max_depth: max_depth.max(1),
            timed_out: false,
        }
    }

    /// Picks a move for `color`, or `None` on a full board.
    ///
    /// Iterative deepening; the deepest completed iteration wins. Depth 1
    /// always completes regardless of the time budget.
    pub fn search(&mut self, board: &Board, color: Color) -> Option<Coord> {
        self.start_time = Instant::now();
        self.timed_out = false;

        let moves = empty_indices(board);
        if moves.len() <= 1 {
            return moves.first().map(|&mv| Coord::from_index(mv));
        }
        if let Some(&mv) = moves.iter().find(|&&mv| wins_at(board, mv, color)) {
            return Some(Coord::from_index(mv));
        }

        let mut best_move = moves[0];
        for depth in 1..=self.max_depth {
            match self.negaalpha(board, color, depth, depth, MIN_SCORE, MAX_SCORE) {
                SearchResult::Complete(mv, _score) => best_move = mv,
                SearchResult::TimedOut => break,
            }
        }

        Some(Coord::from_index(best_move))
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    fn negaalpha(
        &mut self,
        board: &Board,
        color: Color,
        depth: u8,
        root_depth: u8,
        alpha: i32,
        beta: i32,
    ) -> SearchResult {
        if root_depth > 1 && self.start_time.elapsed() >= self.timeout {
            self.timed_out = true;
            return SearchResult::TimedOut;
        }

        if depth == 0 {
            return SearchResult::Complete(0, evaluate(board, color));
        }

        let moves = sorted_moves(board, color);
        let Some(&first) = moves.first() else {
            return SearchResult::Complete(0, 0);
        };
        let mut best_move = first;
        let mut best_score = MIN_SCORE;
        let mut alpha = alpha;

        for mv in moves {
            let next = board.with_bead(mv, color);
            let score = if rules::has_win_at(&next, Coord::from_index(mv)) {
                // Sooner wins score higher.
                WIN_SCORE + depth as i32
            } else {
                match self.negaalpha(&next, color.opponent(), depth - 1, root_depth, -beta, -alpha) {
                    SearchResult::TimedOut => return SearchResult::TimedOut,
                    SearchResult::Complete(_, score) => -score,
                }
            };

            if is_better_move(score, mv, best_score, best_move) {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        SearchResult::Complete(best_move, best_score)
    }
}

fn is_better_move(score: i32, mv: usize, best_score: i32, best_move: usize) -> bool {
    score > best_score || (score == best_score && mv < best_move)
}

fn wins_at(board: &Board, mv: usize, color: Color) -> bool {
    rules::has_win_at(&board.with_bead(mv, color), Coord::from_index(mv))
}

fn empty_indices(board: &Board) -> Vec<usize> {
    board
        .empty_cells()
        .into_iter()
        .filter_map(|c| c.index().ok())
        .collect()
}

/// Empty cells ordered by static evaluation after the move, best first.
fn sorted_moves(board: &Board, color: Color) -> Vec<usize> {
    let mut scored: Vec<(usize, i32)> = empty_indices(board)
        .into_iter()
        .map(|mv| (mv, evaluate(&board.with_bead(mv, color), color)))
        .collect();

    scored.sort_by(|(left_mv, left_score), (right_mv, right_score)| {
        right_score.cmp(left_score).then_with(|| left_mv.cmp(right_mv))
    });

    scored.into_iter().map(|(mv, _)| mv).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn board_with(white: &[(u8, u8, u8)], black: &[(u8, u8, u8)]) -> Board {
        let place = |board: Board, cells: &[(u8, u8, u8)], cell: Cell| {
            cells.iter().fold(board, |b, &(x, y, z)| {
                b.set(Coord::new(x, y, z), cell).unwrap()
            })
        };
        place(place(Board::empty(), white, Cell::White), black, Cell::Black)
    }

    #[test]
    fn search_takes_an_immediate_win() {
        let board = board_with(
            &[(0, 0, 0), (1, 0, 0), (2, 0, 0)],
            &[(0, 1, 0), (0, 2, 0), (3, 3, 3)],
        );
        let mut searcher = Searcher::new(3);

        assert_eq!(searcher.search(&board, Color::White), Some(Coord::new(3, 0, 0)));
    }

    #[test]
    fn search_blocks_the_opponent_three() {
        let board = board_with(
            &[(0, 0, 0), (1, 2, 3), (2, 0, 1)],
            &[(3, 3, 0), (3, 3, 1), (3, 3, 2)],
        );
        let mut searcher = Searcher::new(2);

        assert_eq!(searcher.search(&board, Color::White), Some(Coord::new(3, 3, 3)));
    }

    #[test]
    fn search_tie_breaks_to_smallest_index_when_scores_equal() {
        let mut searcher = Searcher::new(1);

        // Corners and the inner cube sit on seven lines; (0,0,0) comes first.
        assert_eq!(
            searcher.search(&Board::empty(), Color::White),
            Some(Coord::new(0, 0, 0))
        );
    }

    #[test]
    fn search_returns_single_empty_cell_immediately() {
        let mut board = Board::empty();
        for (i, coord) in Board::empty().empty_cells().into_iter().enumerate().skip(1) {
            let cell = if i % 2 == 0 { Cell::White } else { Cell::Black };
            board = board.set(coord, cell).unwrap();
        }
        let mut searcher = Searcher::new(4);

        assert_eq!(searcher.search(&board, Color::Black), Some(Coord::new(0, 0, 0)));
        assert!(!searcher.timed_out());
    }

    #[test]
    fn search_depth_one_completes_before_timeout_cutoff() {
        let mut searcher = Searcher::with_timeout(4, Duration::from_nanos(1));
        let board = board_with(&[(1, 1, 1)], &[]);

        let mv = searcher.search(&board, Color::Black).unwrap();

        assert_eq!(board.get(mv), Ok(Cell::Empty));
        assert!(searcher.timed_out());
    }
}
