//! Browser-facing API.
//!
//! Every call takes the caller's persisted snapshot (a plain JS object in
//! the shape of `GameState`) and returns the next one. Engine failures are
//! thrown as `{ code, message }` objects. The optional `config` argument
//! carries the host's `EngineConfig`; its scoring weights settle line wins
//! and must be the same for every call on one game.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::ai::SearchSelector;
use crate::codec;
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError, SnapshotError};
use crate::game::GameState;
use crate::types::{Color, Coord, Difficulty, GameMode, GameSettings};

#[derive(Serialize)]
struct ErrorPayload {
    code: &'static str,
    message: String,
}

/// The only part of a snapshot that `reset` reads.
#[derive(Deserialize, Default)]
struct ResetInput {
    #[serde(default)]
    settings: GameSettings,
}

#[wasm_bindgen]
pub fn new_game(settings: JsValue) -> Result<JsValue, JsValue> {
    let settings: GameSettings = optional_from_js(settings)?;
    to_js(&GameState::new(settings))
}

#[wasm_bindgen]
pub fn apply_move(
    state: JsValue,
    x: i32,
    y: i32,
    z: i32,
    color: JsValue,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let state: GameState = from_js(state)?;
    let color: Color = from_js(color)?;
    let config = engine_config(config)?;
    state.check_turn(color).map_err(engine_error)?;
    let coord = Coord::from_signed(x, y, z).map_err(engine_error)?;
    to_js(
        &state
            .apply_move_with(coord, color, &config.scoring)
            .map_err(engine_error)?,
    )
}

#[wasm_bindgen]
pub fn resign(state: JsValue, color: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_js(state)?;
    to_js(&state.resign(from_js(color)?).map_err(engine_error)?)
}

#[wasm_bindgen]
pub fn leave(state: JsValue, color: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_js(state)?;
    to_js(&state.leave(from_js(color)?).map_err(engine_error)?)
}

#[wasm_bindgen]
pub fn abort(state: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_js(state)?;
    to_js(&state.abort().map_err(engine_error)?)
}

#[wasm_bindgen]
pub fn offer_draw(state: JsValue, color: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_js(state)?;
    to_js(&state.offer_draw(from_js(color)?).map_err(engine_error)?)
}

#[wasm_bindgen]
pub fn accept_draw(state: JsValue, color: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_js(state)?;
    to_js(&state.accept_draw(from_js(color)?).map_err(engine_error)?)
}

/// Never fails on the snapshot: an unreadable one resets to default settings.
#[wasm_bindgen]
pub fn reset(state: JsValue) -> Result<JsValue, JsValue> {
    let input: ResetInput = serde_wasm_bindgen::from_value(state).unwrap_or_default();
    to_js(&GameState::new(input.settings))
}

/// Plays one bot move for the side to move. `config` may be `undefined`.
#[wasm_bindgen]
pub fn bot_move(state: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_js(state)?;
    let config = engine_config(config)?;
    let selector = SearchSelector::new(config.bot);
    to_js(
        &state
            .apply_bot_move_with(&selector, &config.scoring)
            .map_err(engine_error)?,
    )
}

#[wasm_bindgen]
pub fn compute_score(
    difficulty: JsValue,
    mode: JsValue,
    winner_beads: u32,
    loser_beads: u32,
    config: JsValue,
) -> Result<u32, JsValue> {
    let difficulty: Difficulty = from_js(difficulty)?;
    let mode: GameMode = from_js(mode)?;
    let config = engine_config(config)?;
    Ok(config
        .scoring
        .score(difficulty, mode, winner_beads, loser_beads))
}

#[wasm_bindgen]
pub fn validate_state(state: JsValue, config: JsValue) -> Result<(), JsValue> {
    let state: GameState = from_js(state)?;
    let config = engine_config(config)?;
    state.validate_with(&config.scoring).map_err(snapshot_error)
}

#[wasm_bindgen]
pub fn encode_state(state: JsValue, config: JsValue) -> Result<Vec<u8>, JsValue> {
    let state: GameState = from_js(state)?;
    let config = engine_config(config)?;
    state.validate_with(&config.scoring).map_err(snapshot_error)?;
    codec::encode(&state).map_err(snapshot_error)
}

#[wasm_bindgen]
pub fn decode_state(bytes: &[u8], config: JsValue) -> Result<JsValue, JsValue> {
    let config = engine_config(config)?;
    to_js(&codec::decode_with(bytes, &config.scoring).map_err(snapshot_error)?)
}

/// Version token for conditional updates of a stored game.
#[wasm_bindgen]
pub fn fingerprint(state: JsValue) -> Result<u32, JsValue> {
    let state: GameState = from_js(state)?;
    codec::fingerprint(&state).map_err(snapshot_error)
}

fn engine_config(value: JsValue) -> Result<EngineConfig, JsValue> {
    let config: EngineConfig = optional_from_js(value)?;
    config.validate().map_err(config_error)?;
    Ok(config)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| error_object("INVALID_INPUT", e.to_string()))
}

fn optional_from_js<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        Ok(T::default())
    } else {
        from_js(value)
    }
}

/// Snapshots are stored as JSON, so `None` must become `null`.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn engine_error(err: EngineError) -> JsValue {
    error_object(err.code(), err.to_string())
}

fn snapshot_error(err: SnapshotError) -> JsValue {
    match err {
        SnapshotError::Replay(inner) => engine_error(inner),
        other => error_object("INVALID_SNAPSHOT", other.to_string()),
    }
}

fn config_error(err: ConfigError) -> JsValue {
    error_object("INVALID_CONFIG", err.to_string())
}

fn error_object(code: &'static str, message: String) -> JsValue {
    let payload = ErrorPayload { code, message };
    to_js(&payload).unwrap_or_else(|e| e)
}
