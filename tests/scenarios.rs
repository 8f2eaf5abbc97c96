//! End-to-end scenarios for the 4x4x4 engine: board access, move legality,
//! win/draw detection, lifecycle transitions and scoring.

use cube4::rules::{WIN_LINES, find_win_line};
use cube4::scoring::score;
use cube4::{
    Board, Cell, Color, Coord, Difficulty, EndReason, EngineError, GameMode, GameSettings,
    GameState,
};

/// Full-board coloring (by cell index) with no single-colored line.
const DRAW_PATTERN: &str = "WBBWBWWBBBBWBBWBBBBWWBBBWWBWBWWWWWWBBWBWBBBWWWBWWWBBBWBWWBWBWWWB";

fn c(x: u8, y: u8, z: u8) -> Coord {
    Coord::new(x, y, z)
}

fn coord_of(idx: usize) -> Coord {
    c((idx % 4) as u8, ((idx / 4) % 4) as u8, (idx / 16) as u8)
}

/// White and black cells of `DRAW_PATTERN`, interleaved white first.
fn draw_sequence() -> Vec<Coord> {
    let cells = |tag: char| -> Vec<Coord> {
        DRAW_PATTERN
            .chars()
            .enumerate()
            .filter(|&(_, t)| t == tag)
            .map(|(idx, _)| coord_of(idx))
            .collect()
    };
    let white = cells('W');
    let black = cells('B');
    white
        .into_iter()
        .zip(black)
        .flat_map(|(w, b)| [w, b])
        .collect()
}

#[test]
fn out_of_range_coordinates_fail_on_get_and_set() {
    let board = Board::empty();
    let outside = [
        c(4, 0, 0),
        c(0, 4, 0),
        c(0, 0, 4),
        c(255, 255, 255),
        c(3, 3, 4),
    ];

    for coord in outside {
        assert!(matches!(board.get(coord), Err(EngineError::OutOfRange { .. })));
        assert!(matches!(
            board.set(coord, Cell::Black),
            Err(EngineError::OutOfRange { .. })
        ));
    }
    assert_eq!(
        Coord::from_signed(0, -1, 2),
        Err(EngineError::OutOfRange { x: 0, y: -1, z: 2 })
    );
}

#[test]
fn history_grows_by_one_and_colors_alternate_from_white() {
    let moves = [c(0, 0, 0), c(3, 3, 3), c(1, 2, 0), c(2, 1, 3), c(0, 3, 1)];
    let mut state = GameState::default();

    for (n, &coord) in moves.iter().enumerate() {
        let expected = if n % 2 == 0 { Color::White } else { Color::Black };
        assert_eq!(state.current_player, expected);

        state = state.apply_move(coord, expected).unwrap();

        assert_eq!(state.move_history.len(), n + 1);
        assert_eq!(state.board.occupied_count() as usize, n + 1);
    }
}

#[test]
fn filling_the_board_without_a_line_is_a_draw() {
    let sequence = draw_sequence();
    assert_eq!(sequence.len(), 64);

    let mut state = GameState::default();
    for (n, &coord) in sequence.iter().enumerate() {
        assert!(!state.is_finished, "finished early at ply {n}");
        state = state.apply_move(coord, state.current_player).unwrap();
    }

    assert!(state.is_finished);
    assert_eq!(state.winner_color, None);
    assert_eq!(state.end_reason, Some(EndReason::BoardFull));
    assert!(state.winning_cells.is_empty());
    assert!(state.board.is_full());
    assert_eq!(state.move_history.len(), 64);
    assert_eq!(state.validate(), Ok(()));
}

#[test]
fn every_line_is_detected_whichever_cell_comes_last() {
    for line in WIN_LINES.iter() {
        for last in 0..4 {
            let board = line
                .cells
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != last)
                .fold(Board::empty(), |b, (_, &coord)| {
                    b.set(coord, Cell::White).unwrap()
                });
            assert_eq!(find_win_line(&board, line.cells[last]), None);

            let board = board.set(line.cells[last], Cell::White).unwrap();
            let found = find_win_line(&board, line.cells[last])
                .unwrap_or_else(|| panic!("missed line {:?}", line.cells));

            let mut found = found.to_vec();
            let mut expected = line.cells.to_vec();
            found.sort();
            expected.sort();
            assert_eq!(found, expected);
        }
    }
}

#[test]
fn white_completes_a_row_along_x() {
    let state = GameState::default()
        .apply_move(c(0, 0, 0), Color::White)
        .unwrap()
        .apply_move(c(0, 1, 0), Color::Black)
        .unwrap()
        .apply_move(c(1, 0, 0), Color::White)
        .unwrap()
        .apply_move(c(0, 2, 0), Color::Black)
        .unwrap()
        .apply_move(c(2, 0, 0), Color::White)
        .unwrap()
        .apply_move(c(3, 3, 3), Color::Black)
        .unwrap();
    assert!(!state.is_finished);

    let state = state.apply_move(c(3, 0, 0), Color::White).unwrap();

    assert!(state.is_finished);
    assert_eq!(state.winner_color, Some(Color::White));
    assert_eq!(
        state.winning_cells,
        vec![c(0, 0, 0), c(1, 0, 0), c(2, 0, 0), c(3, 0, 0)]
    );
    assert_eq!(state.end_reason, Some(EndReason::Win));
}

#[test]
fn occupied_cell_is_rejected_and_state_is_unchanged() {
    let state = GameState::default()
        .apply_move(c(2, 2, 2), Color::White)
        .unwrap();
    let before = state.clone();

    let err = state.apply_move(c(2, 2, 2), Color::Black).unwrap_err();

    assert_eq!(err, EngineError::CellOccupied { x: 2, y: 2, z: 2 });
    assert_eq!(state, before);
}

#[test]
fn black_cannot_move_on_whites_turn() {
    let err = GameState::default()
        .apply_move(c(0, 0, 0), Color::Black)
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::NotYourTurn {
            expected: Color::White
        }
    );
    assert_eq!(err.code(), "NOT_YOUR_TURN");
}

#[test]
fn white_resigning_hands_black_the_win() {
    let state = GameState::default()
        .apply_move(c(1, 1, 1), Color::White)
        .unwrap();

    let state = state.resign(Color::White).unwrap();

    assert!(state.is_finished);
    assert_eq!(state.winner_color, Some(Color::Black));
    assert!(state.winning_cells.is_empty());
}

#[test]
fn hard_pvp_win_by_four_beads_scores_95() {
    assert_eq!(score(Difficulty::Hard, GameMode::PlayerVsPlayer, 6, 2), 95);
}

#[test]
fn reset_after_a_finished_game_starts_over() {
    let settings = GameSettings {
        difficulty: Difficulty::Easy,
        mode: GameMode::PlayerVsPlayer,
    };
    let finished = GameState::new(settings)
        .apply_move(c(0, 0, 0), Color::White)
        .unwrap()
        .resign(Color::Black)
        .unwrap();

    let fresh = finished.reset();

    assert!(!fresh.is_finished);
    assert_eq!(fresh.board, Board::empty());
    assert!(fresh.move_history.is_empty());
    assert_eq!(fresh.current_player, Color::White);
    assert_eq!(fresh.settings, settings);
    assert!(fresh.apply_move(c(0, 0, 0), Color::White).is_ok());
}

#[test]
fn finished_game_rejects_everything_but_reset() {
    let finished = GameState::default().abort().unwrap();

    assert_eq!(
        finished.apply_move(c(0, 0, 0), Color::White),
        Err(EngineError::GameOver)
    );
    assert_eq!(finished.resign(Color::White), Err(EngineError::GameOver));
    assert_eq!(finished.leave(Color::Black), Err(EngineError::GameOver));
    assert_eq!(finished.abort(), Err(EngineError::GameOver));
    assert_eq!(finished.offer_draw(Color::White), Err(EngineError::GameOver));
    assert_eq!(finished.accept_draw(Color::Black), Err(EngineError::GameOver));
    assert!(!finished.reset().is_finished);
}
