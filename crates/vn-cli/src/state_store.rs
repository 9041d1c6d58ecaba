use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use vn_core::VnError;

use crate::{
    map_cli_state_encode, map_cli_state_invalid, map_cli_state_read, map_cli_state_write,
    PlayerStateV1, SaveFileV1, PLAYER_STATE_SCHEMA, SAVE_FILE_SCHEMA,
};

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), VnError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(map_cli_state_write)?;

    let payload = serde_json::to_string(value).map_err(map_cli_state_encode)?;
    fs::write(path, payload).map_err(map_cli_state_write)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, VnError> {
    if !path.exists() {
        return Err(VnError::new(
            "CLI_STATE_NOT_FOUND",
            format!("State file does not exist: {}", path.display()),
        ));
    }
    let raw = fs::read_to_string(path).map_err(map_cli_state_read)?;
    serde_json::from_str(&raw).map_err(map_cli_state_invalid)
}

fn check_schema(found: &str, expected: &str) -> Result<(), VnError> {
    if found != expected {
        return Err(VnError::new(
            "CLI_STATE_SCHEMA",
            format!("Unsupported state schema: {}", found),
        ));
    }
    Ok(())
}

pub(crate) fn save_player_state(path: &Path, state: &PlayerStateV1) -> Result<(), VnError> {
    write_json(path, state)
}

pub(crate) fn load_player_state(path: &Path) -> Result<PlayerStateV1, VnError> {
    let state: PlayerStateV1 = read_json(path)?;
    check_schema(&state.schema_version, PLAYER_STATE_SCHEMA)?;
    Ok(state)
}

pub(crate) fn save_save_file(path: &Path, save: &SaveFileV1) -> Result<(), VnError> {
    write_json(path, save)
}

pub(crate) fn load_save_file(path: &Path) -> Result<SaveFileV1, VnError> {
    let save: SaveFileV1 = read_json(path)?;
    check_schema(&save.schema_version, SAVE_FILE_SCHEMA)?;
    Ok(save)
}
