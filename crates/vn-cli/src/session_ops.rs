use std::path::Path;

use vn_api::{
    create_engine_from_json, resume_engine_from_json, CreateEngineFromJsonOptions,
    ResumeEngineFromJsonOptions,
};
use vn_core::{ValueMap, VnError};
use vn_runtime::{Engine, EventRecorder};

use crate::{
    emit_boundary, load_player_state, load_script_file, save_player_state, BoundaryResult,
    LoadedScript, PlayerStateV1, PLAYER_STATE_SCHEMA,
};

pub(crate) fn create_engine_for_script(
    script: &LoadedScript,
    saved_globals: Option<ValueMap>,
    saved_variables: Option<ValueMap>,
    start_label: Option<&str>,
    random_seed: Option<u32>,
    recorder: &EventRecorder,
) -> Result<Engine, VnError> {
    create_engine_from_json(CreateEngineFromJsonOptions {
        script_json: script.script_json.clone(),
        saved_globals,
        saved_variables,
        random_seed,
        start_label: start_label.map(str::to_string),
        listeners: vec![Box::new(recorder.clone())],
        ..CreateEngineFromJsonOptions::default()
    })
}

pub(crate) fn resume_engine_for_state(
    script: &LoadedScript,
    state: &PlayerStateV1,
    recorder: &EventRecorder,
) -> Result<Engine, VnError> {
    resume_engine_from_json(ResumeEngineFromJsonOptions {
        script_json: script.script_json.clone(),
        snapshot: state.snapshot.clone(),
        environment: None,
        step_guard: None,
        listeners: vec![Box::new(recorder.clone())],
    })
}

pub(crate) fn save_engine_state(
    path: &Path,
    engine: &Engine,
    script_path: &str,
) -> Result<(), VnError> {
    let snapshot = engine.snapshot()?;
    let state = PlayerStateV1 {
        schema_version: PLAYER_STATE_SCHEMA.to_string(),
        script_path: script_path.to_string(),
        snapshot,
    };
    save_player_state(path, &state)
}

pub(crate) fn load_engine_from_state(
    path: &Path,
    recorder: &EventRecorder,
) -> Result<(LoadedScript, Engine), VnError> {
    let state = load_player_state(path)?;
    let script = load_script_file(&state.script_path)?;
    let engine = resume_engine_for_state(&script, &state, recorder)?;
    Ok((script, engine))
}

/// Only suspended runs are resumable, so only they get a state file.
pub(crate) fn emit_boundary_with_saved_state(
    engine: &Engine,
    boundary: BoundaryResult,
    state_out: &str,
    script_path: &str,
) -> Result<i32, VnError> {
    if boundary.event.is_suspended() {
        save_engine_state(Path::new(state_out), engine, script_path)?;
        emit_boundary(boundary, Some(state_out.to_string()))?;
        return Ok(0);
    }

    emit_boundary(boundary, None)?;
    Ok(0)
}
