//! Compact binary snapshot of a game.
//!
//! Only the settings, the terminal reason and the move list are stored; the
//! rest of the state is rebuilt by replaying the moves, so a decoded
//! snapshot always satisfies the game invariants.
//!
//! Layout (little endian):
//! `magic[4] | version u32 | move_count u32 | crc32(payload) u32 | reserved u32`
//! followed by the payload
//! `difficulty u8 | mode u8 | end_reason u8 | winner u8 | draw_offer u8 | moves[move_count]`
//! where each move byte is `cell_index | color << 6`.

use tracing::warn;

use crate::error::SnapshotError;
use crate::game::GameState;
use crate::scoring::ScoringConfig;
use crate::types::{Color, Coord, Difficulty, EndReason, GameMode, GameSettings, Move, NUM_CELLS};

const MAGIC: &[u8; 4] = b"Q4D1";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 20;
const FIELDS_SIZE: usize = 5;
const INDEX_MASK: u8 = 0x3F;
const COLOR_SHIFT: u8 = 6;

/// Serializes `state` into the binary snapshot format.
///
/// Fails with `OutOfRange` if the history holds a coordinate off the board.
pub fn encode(state: &GameState) -> Result<Vec<u8>, SnapshotError> {
    let payload = encode_payload(state)?;
    let crc = crc32fast::hash(&payload);

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&(state.move_history.len() as u32).to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Version token of a state: equal states share it, any accepted
/// transition changes it.
pub fn fingerprint(state: &GameState) -> Result<u32, SnapshotError> {
    Ok(crc32fast::hash(&encode_payload(state)?))
}

/// Parses a binary snapshot and rebuilds the state it describes.
pub fn decode(data: &[u8]) -> Result<GameState, SnapshotError> {
    decode_with(data, &ScoringConfig::default())
}

/// Like [`decode`], for games whose scores were settled with `scoring`.
pub fn decode_with(data: &[u8], scoring: &ScoringConfig) -> Result<GameState, SnapshotError> {
    let result = decode_inner(data, scoring);
    if let Err(err) = &result {
        warn!(%err, len = data.len(), "binary snapshot rejected");
    }
    result
}

fn decode_inner(data: &[u8], scoring: &ScoringConfig) -> Result<GameState, SnapshotError> {
    if data.len() < HEADER_SIZE {
        return Err(SnapshotError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    if &data[0..4] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }

    let version = read_u32_le(data, 4)?;
    if version != VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            expected: VERSION,
            actual: version,
        });
    }

    let move_count = read_u32_le(data, 8)? as usize;
    let expected_crc = read_u32_le(data, 12)?;
    let payload = &data[HEADER_SIZE..];

    let actual_crc = crc32fast::hash(payload);
    if actual_crc != expected_crc {
        return Err(SnapshotError::ChecksumMismatch {
            expected: expected_crc,
            actual: actual_crc,
        });
    }

    if payload.len() < FIELDS_SIZE {
        return Err(SnapshotError::Truncated("snapshot fields"));
    }
    let settings = GameSettings {
        difficulty: decode_difficulty(payload[0])?,
        mode: decode_mode(payload[1])?,
    };
    let end_reason = decode_end_reason(payload[2])?;
    let winner = decode_color("winner", payload[3])?;
    let draw_offer = decode_color("draw_offer", payload[4])?;

    let move_bytes = &payload[FIELDS_SIZE..];
    if move_bytes.len() < move_count {
        return Err(SnapshotError::Truncated("move list"));
    }
    if move_bytes.len() > move_count {
        return Err(SnapshotError::TrailingBytes);
    }
    let moves = move_bytes
        .iter()
        .map(|&b| decode_move(b))
        .collect::<Result<Vec<_>, _>>()?;

    let mut state = GameState::replay_with(settings, &moves, scoring)?;
    match end_reason {
        Some(_) if draw_offer.is_some() => {
            return Err(SnapshotError::InvalidField {
                field: "draw_offer",
                value: payload[4],
            });
        }
        Some(reason) => state = state.conclude(reason, winner)?,
        None if state.is_finished => {
            return Err(SnapshotError::Inconsistent { field: "endReason" });
        }
        None => state.draw_offer = draw_offer,
    }
    if state.winner_color != winner {
        return Err(SnapshotError::Inconsistent {
            field: "winnerColor",
        });
    }
    Ok(state)
}

fn encode_payload(state: &GameState) -> Result<Vec<u8>, SnapshotError> {
    let mut payload = Vec::with_capacity(FIELDS_SIZE + state.move_history.len());
    payload.push(match state.settings.difficulty {
        Difficulty::Easy => 0,
        Difficulty::Medium => 1,
        Difficulty::Hard => 2,
    });
    payload.push(match state.settings.mode {
        GameMode::PlayerVsPlayer => 0,
        GameMode::PlayerVsBot => 1,
    });
    payload.push(match state.end_reason {
        None => 0,
        Some(EndReason::Win) => 1,
        Some(EndReason::BoardFull) => 2,
        Some(EndReason::Resign) => 3,
        Some(EndReason::Leave) => 4,
        Some(EndReason::Abort) => 5,
        Some(EndReason::DrawAgreed) => 6,
    });
    payload.push(encode_color(state.winner_color));
    payload.push(encode_color(state.draw_offer));
    for mv in &state.move_history {
        let idx = mv.coord.index()? as u8;
        let color: u8 = match mv.color {
            Color::White => 0,
            Color::Black => 1,
        };
        payload.push(idx | (color << COLOR_SHIFT));
    }
    Ok(payload)
}

fn encode_color(color: Option<Color>) -> u8 {
    match color {
        None => 0,
        Some(Color::White) => 1,
        Some(Color::Black) => 2,
    }
}

fn decode_color(field: &'static str, value: u8) -> Result<Option<Color>, SnapshotError> {
    match value {
        0 => Ok(None),
        1 => Ok(Some(Color::White)),
        2 => Ok(Some(Color::Black)),
        _ => Err(SnapshotError::InvalidField { field, value }),
    }
}

fn decode_difficulty(value: u8) -> Result<Difficulty, SnapshotError> {
    match value {
        0 => Ok(Difficulty::Easy),
        1 => Ok(Difficulty::Medium),
        2 => Ok(Difficulty::Hard),
        _ => Err(SnapshotError::InvalidField {
            field: "difficulty",
            value,
        }),
    }
}

fn decode_mode(value: u8) -> Result<GameMode, SnapshotError> {
    match value {
        0 => Ok(GameMode::PlayerVsPlayer),
        1 => Ok(GameMode::PlayerVsBot),
        _ => Err(SnapshotError::InvalidField {
            field: "mode",
            value,
        }),
    }
}

fn decode_end_reason(value: u8) -> Result<Option<EndReason>, SnapshotError> {
    Ok(Some(match value {
        0 => return Ok(None),
        1 => EndReason::Win,
        2 => EndReason::BoardFull,
        3 => EndReason::Resign,
        4 => EndReason::Leave,
        5 => EndReason::Abort,
        6 => EndReason::DrawAgreed,
        _ => {
            return Err(SnapshotError::InvalidField {
                field: "end_reason",
                value,
            });
        }
    }))
}

fn decode_move(value: u8) -> Result<Move, SnapshotError> {
    let idx = (value & INDEX_MASK) as usize;
    debug_assert!(idx < NUM_CELLS);
    let color = match value >> COLOR_SHIFT {
        0 => Color::White,
        1 => Color::Black,
        _ => {
            return Err(SnapshotError::InvalidField {
                field: "move",
                value,
            });
        }
    };
    Ok(Move {
        coord: Coord::from_index(idx),
        color,
    })
}

fn read_u32_le(data: &[u8], offset: usize) -> Result<u32, SnapshotError> {
    if offset + 4 > data.len() {
        return Err(SnapshotError::Truncated("header"));
    }
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    Ok(u32::from_le_bytes(bytes))
}
