use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::ai::MoveSelector;
use crate::board::Board;
use crate::error::{EngineError, SnapshotError};
use crate::rules;
use crate::scoring::ScoringConfig;
use crate::types::{Cell, Color, Coord, EndReason, GameSettings, Move, Scores};

/// Snapshot of one game, as persisted by the surrounding system.
///
/// Every transition borrows the current snapshot and returns a new one, so a
/// rejected operation never changes what the caller holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    pub current_player: Color,
    pub move_history: Vec<Move>,
    pub last_move: Option<Move>,
    pub is_finished: bool,
    pub winner_color: Option<Color>,
    /// Contract:
    /// - Line win: the four cells of the line through `last_move`.
    /// - Any other state: empty.
    #[serde(default)]
    pub winning_cells: Vec<Coord>,
    #[serde(default)]
    pub scores: Scores,
    #[serde(default)]
    pub settings: GameSettings,
    pub end_reason: Option<EndReason>,
    /// Color with a pending draw offer. Cleared by any move.
    pub draw_offer: Option<Color>,
}

impl GameState {
    /// Empty board, white to move.
    pub fn new(settings: GameSettings) -> Self {
        Self {
            board: Board::empty(),
            current_player: Color::White,
            move_history: Vec::new(),
            last_move: None,
            is_finished: false,
            winner_color: None,
            winning_cells: Vec::new(),
            scores: Scores::default(),
            settings,
            end_reason: None,
            draw_offer: None,
        }
    }

    /// Rebuilds a state by applying `moves` to a fresh game.
    pub fn replay(settings: GameSettings, moves: &[Move]) -> Result<Self, EngineError> {
        Self::replay_with(settings, moves, &ScoringConfig::default())
    }

    /// Like [`GameState::replay`], settling a line win with `scoring`.
    pub fn replay_with(
        settings: GameSettings,
        moves: &[Move],
        scoring: &ScoringConfig,
    ) -> Result<Self, EngineError> {
        moves.iter().try_fold(Self::new(settings), |state, mv| {
            state.apply_move_with(mv.coord, mv.color, scoring)
        })
    }

    /// Number of accepted moves.
    pub fn ply(&self) -> usize {
        self.move_history.len()
    }

    pub fn legal_moves(&self) -> Vec<Coord> {
        if self.is_finished {
            return Vec::new();
        }
        self.board.empty_cells()
    }

    /// The first two move preconditions: game still running, `color` to move.
    pub fn check_turn(&self, color: Color) -> Result<(), EngineError> {
        if self.is_finished {
            return Err(EngineError::GameOver);
        }
        if color != self.current_player {
            return Err(EngineError::NotYourTurn {
                expected: self.current_player,
            });
        }
        Ok(())
    }

    /// Places a bead; a line win is scored with the default weights.
    pub fn apply_move(&self, coord: Coord, color: Color) -> Result<Self, EngineError> {
        self.apply_move_with(coord, color, &ScoringConfig::default())
    }

    #[instrument(level = "debug", skip(self, scoring), fields(ply = self.move_history.len()))]
    pub fn apply_move_with(
        &self,
        coord: Coord,
        color: Color,
        scoring: &ScoringConfig,
    ) -> Result<Self, EngineError> {
        self.check_turn(color)?;
        if self.board.get(coord)? != Cell::Empty {
            return Err(EngineError::CellOccupied {
                x: coord.x,
                y: coord.y,
                z: coord.z,
            });
        }

        let board = self.board.set(coord, color.into())?;
        let mv = Move { coord, color };
        let mut next = Self {
            board,
            last_move: Some(mv),
            draw_offer: None,
            ..self.clone()
        };
        next.move_history.push(mv);

        if let Some(cells) = rules::find_win_line(&board, coord) {
            next.finish(Some(color), EndReason::Win);
            next.winning_cells = cells.to_vec();
            next.scores = next.settle_scores(color, scoring);
        } else if board.is_full() {
            next.finish(None, EndReason::BoardFull);
        } else {
            next.current_player = color.opponent();
            debug!(ply = next.ply(), "move accepted");
        }

        Ok(next)
    }

    /// Lets the selector play for the side to move.
    pub fn apply_bot_move(&self, selector: &dyn MoveSelector) -> Result<Self, EngineError> {
        self.apply_bot_move_with(selector, &ScoringConfig::default())
    }

    pub fn apply_bot_move_with(
        &self,
        selector: &dyn MoveSelector,
        scoring: &ScoringConfig,
    ) -> Result<Self, EngineError> {
        if self.is_finished {
            return Err(EngineError::GameOver);
        }
        let color = self.current_player;
        let coord = selector
            .select_move(&self.board, color, self.settings.difficulty)
            .ok_or(EngineError::NoMoveSelected)?;
        self.apply_move_with(coord, color, scoring)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn resign(&self, color: Color) -> Result<Self, EngineError> {
        self.forfeit(color, EndReason::Resign)
    }

    /// The player of `color` left the table; the opponent wins.
    #[instrument(level = "debug", skip(self))]
    pub fn leave(&self, color: Color) -> Result<Self, EngineError> {
        self.forfeit(color, EndReason::Leave)
    }

    /// Ends the game as a forced draw. Scores are left as they are.
    #[instrument(level = "debug", skip(self))]
    pub fn abort(&self) -> Result<Self, EngineError> {
        if self.is_finished {
            return Err(EngineError::GameOver);
        }
        let mut next = self.clone();
        next.finish(None, EndReason::Abort);
        Ok(next)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn offer_draw(&self, color: Color) -> Result<Self, EngineError> {
        if self.is_finished {
            return Err(EngineError::GameOver);
        }
        Ok(Self {
            draw_offer: Some(color),
            ..self.clone()
        })
    }

    /// Accepts the opponent's pending offer.
    #[instrument(level = "debug", skip(self))]
    pub fn accept_draw(&self, color: Color) -> Result<Self, EngineError> {
        if self.is_finished {
            return Err(EngineError::GameOver);
        }
        if self.draw_offer != Some(color.opponent()) {
            return Err(EngineError::NoDrawOffer);
        }
        let mut next = self.clone();
        next.finish(None, EndReason::DrawAgreed);
        Ok(next)
    }

    /// Fresh game with the same settings. Valid in any state.
    pub fn reset(&self) -> Self {
        info!(ply = self.ply(), finished = self.is_finished, "game reset");
        Self::new(self.settings)
    }

    /// Checks that the snapshot is what its own move history produces.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        self.validate_with(&ScoringConfig::default())
    }

    /// Like [`GameState::validate`], for scores settled with `scoring`.
    pub fn validate_with(&self, scoring: &ScoringConfig) -> Result<(), SnapshotError> {
        let mut rebuilt = Self::replay_with(self.settings, &self.move_history, scoring)?;
        match self.end_reason {
            Some(reason) => rebuilt = rebuilt.conclude(reason, self.winner_color)?,
            None => rebuilt.draw_offer = self.draw_offer,
        }

        let checks = [
            ("board", rebuilt.board == self.board),
            ("currentPlayer", rebuilt.current_player == self.current_player),
            ("lastMove", rebuilt.last_move == self.last_move),
            ("isFinished", rebuilt.is_finished == self.is_finished),
            ("endReason", rebuilt.end_reason == self.end_reason),
            ("winnerColor", rebuilt.winner_color == self.winner_color),
            ("winningCells", rebuilt.winning_cells == self.winning_cells),
            ("scores", rebuilt.scores == self.scores),
            ("drawOffer", rebuilt.draw_offer == self.draw_offer),
        ];
        if let Some(&(field, _)) = checks.iter().find(|(_, ok)| !ok) {
            warn!(field, ply = self.ply(), "snapshot rejected");
            return Err(SnapshotError::Inconsistent { field });
        }
        Ok(())
    }

    /// Re-applies a terminal reason to a replayed state.
    pub(crate) fn conclude(
        &self,
        reason: EndReason,
        winner: Option<Color>,
    ) -> Result<Self, SnapshotError> {
        let loser = || {
            winner
                .map(Color::opponent)
                .ok_or(SnapshotError::Inconsistent {
                    field: "winnerColor",
                })
        };
        let next = match reason {
            EndReason::Win | EndReason::BoardFull => {
                if self.end_reason != Some(reason) {
                    return Err(SnapshotError::Inconsistent { field: "endReason" });
                }
                self.clone()
            }
            EndReason::Resign => self.resign(loser()?)?,
            EndReason::Leave => self.leave(loser()?)?,
            EndReason::Abort => self.abort()?,
            EndReason::DrawAgreed => self
                .offer_draw(Color::White)?
                .accept_draw(Color::Black)?,
        };
        Ok(next)
    }

    fn forfeit(&self, color: Color, reason: EndReason) -> Result<Self, EngineError> {
        if self.is_finished {
            return Err(EngineError::GameOver);
        }
        let mut next = self.clone();
        next.finish(Some(color.opponent()), reason);
        Ok(next)
    }

    fn finish(&mut self, winner: Option<Color>, reason: EndReason) {
        self.is_finished = true;
        self.winner_color = winner;
        self.winning_cells.clear();
        self.end_reason = Some(reason);
        self.draw_offer = None;
        info!(
            ?reason,
            winner = winner.map(Color::name),
            ply = self.ply(),
            "game finished"
        );
    }

    fn settle_scores(&self, winner: Color, scoring: &ScoringConfig) -> Scores {
        let points = scoring.score(
            self.settings.difficulty,
            self.settings.mode,
            self.board.count_of(winner).into(),
            self.board.count_of(winner.opponent()).into(),
        );
        match winner {
            Color::White => Scores {
                white: points,
                black: 0,
            },
            Color::Black => Scores {
                white: 0,
                black: points,
            },
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}
