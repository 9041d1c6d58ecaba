use super::runtime_test_support::*;
use super::*;
use serde_json::json;

fn story() -> serde_json::Value {
    json!([
        {"id": 1, "type": "modify_variable", "var": "visits", "action": "increment_var", "value": 1},
        {"id": 2, "type": "dialogue", "label": "N", "content": "Visit <visits>"},
        {"id": 3, "type": "choice", "choice": [
            {"display": "Stay", "label": "stay"},
            {"display": "Leave", "label": "leave"}
        ]},
        {"id": 4, "type": "label", "label": "stay"},
        {"id": 5, "type": "dialogue", "label": "N", "content": "Staying"},
        {"id": 6, "type": "label", "label": "leave"},
        {"id": 7, "type": "finish_dialogue"}
    ])
}

#[test]
fn snapshot_requires_a_suspended_machine() {
    let (engine, _recorder) = engine_from(story());
    let error = engine.snapshot().expect_err("idle engine");
    assert_eq!(error.code, "ENGINE_NOT_SUSPENDED");
}

#[test]
fn snapshot_captures_run_state() {
    let (mut engine, _recorder) = engine_from(story());
    engine.set_environment("isNight", true).expect("env");
    engine.start(None).expect("start");
    let snapshot = engine.snapshot().expect("snapshot");

    assert_eq!(snapshot.schema_version, SNAPSHOT_SCHEMA_V1);
    assert_eq!(snapshot.cursor, 1);
    assert_eq!(snapshot.state, EngineState::Waiting);
    assert_eq!(snapshot.variables.get("visits"), Some(&VnValue::from(1)));
    assert_eq!(snapshot.environment.get("isNight"), Some(&true));
}

#[test]
fn resume_continues_from_a_choice() {
    let (mut engine, _recorder) = engine_from(story());
    engine.start(None).expect("start");
    engine.advance().expect("advance");
    let snapshot = engine.snapshot().expect("snapshot");
    assert_eq!(snapshot.state, EngineState::Choice);

    let (mut resumed, recorder) = engine_from(story());
    resumed.resume(snapshot).expect("resume");
    assert_eq!(resumed.state(), EngineState::Choice);
    assert_eq!(resumed.cursor(), 2);
    assert!(recorder.story_events().is_empty());

    resumed.select_choice("stay").expect("choose");
    assert_eq!(recorder.story_events(), vec![say("N", "Staying")]);
}

#[test]
fn resume_restores_stores_and_environment() {
    let (mut engine, _recorder) = engine_from(story());
    engine.set_environment("isNight", true).expect("env");
    engine.set_global("plays", VnValue::from(2));
    engine.start(None).expect("start");
    let snapshot = engine.snapshot().expect("snapshot");

    let (mut resumed, _recorder) = engine_from(story());
    resumed.resume(snapshot).expect("resume");
    assert_eq!(resumed.get_variable("visits"), Some(VnValue::from(1)));
    assert_eq!(resumed.get_global("plays"), Some(VnValue::from(2)));
    assert_eq!(resumed.environment().get("isNight"), Some(&true));
    assert_eq!(resumed.current_boundary(), Some(say("N", "Visit 1")));
}

#[test]
fn resumed_rng_continues_the_same_sequence() {
    let script = json!([
        {"id": 1, "type": "unlock_dialogues", "events": ["a", "b", "c", "d"]},
        {"id": 2, "type": "dialogue", "label": "N", "content": "pause"},
        {"id": 3, "type": "idle_chat"},
        {"id": 4, "type": "label", "label": "a"},
        {"id": 5, "type": "dialogue", "label": "N", "content": "a"},
        {"id": 6, "type": "label", "label": "b"},
        {"id": 7, "type": "dialogue", "label": "N", "content": "b"},
        {"id": 8, "type": "label", "label": "c"},
        {"id": 9, "type": "dialogue", "label": "N", "content": "c"},
        {"id": 10, "type": "label", "label": "d"},
        {"id": 11, "type": "dialogue", "label": "N", "content": "d"}
    ]);
    let (mut original, original_events) = engine_from(script.clone());
    original.start(None).expect("start");
    let snapshot = original.snapshot().expect("snapshot");
    original_events.clear();
    original.advance().expect("advance");

    let (mut resumed, resumed_events) = engine_from(script);
    resumed.resume(snapshot).expect("resume");
    resumed.advance().expect("advance");
    assert_eq!(resumed_events.story_events(), original_events.story_events());
}

#[test]
fn resume_rejects_foreign_schema() {
    let (mut engine, _recorder) = engine_from(story());
    engine.start(None).expect("start");
    let mut snapshot = engine.snapshot().expect("snapshot");
    snapshot.schema_version = "vn-snapshot.v0".to_string();

    let (mut target, _recorder) = engine_from(story());
    let error = target.resume(snapshot).expect_err("schema");
    assert_eq!(error.code, "SNAPSHOT_SCHEMA");
    assert_eq!(target.state(), EngineState::Idle);
}

#[test]
fn resume_rejects_cursor_that_does_not_match_state() {
    let (mut engine, _recorder) = engine_from(story());
    engine.start(None).expect("start");
    let snapshot = engine.snapshot().expect("snapshot");

    let mut wrong_state = snapshot.clone();
    wrong_state.state = EngineState::Choice;
    let mut out_of_range = snapshot;
    out_of_range.cursor = 99;

    let (mut target, _recorder) = engine_from(story());
    for broken in [wrong_state, out_of_range] {
        let error = target.resume(broken).expect_err("cursor");
        assert_eq!(error.code, "SNAPSHOT_CURSOR");
    }
    assert_eq!(target.state(), EngineState::Idle);
}

#[test]
fn resume_rejects_unknown_environment_keys_without_side_effects() {
    let (mut engine, _recorder) = engine_from(story());
    engine.start(None).expect("start");
    let mut snapshot = engine.snapshot().expect("snapshot");
    snapshot.environment.insert("isDusk".to_string(), true);
    snapshot.environment.insert("isNight".to_string(), true);

    let (mut target, _recorder) = engine_from(story());
    let error = target.resume(snapshot).expect_err("unknown key");
    assert_eq!(error.code, "ENGINE_UNKNOWN_ENVIRONMENT_KEY");
    assert_eq!(target.environment().get("isNight"), Some(&false));
    assert_eq!(target.get_variable("visits"), None);
}

#[test]
fn snapshot_serialises_with_camel_case_keys() {
    let (mut engine, _recorder) = engine_from(story());
    engine.start(None).expect("start");
    let snapshot = engine.snapshot().expect("snapshot");
    let raw = serde_json::to_value(&snapshot).expect("serialize");
    assert_eq!(raw["schemaVersion"], json!(SNAPSHOT_SCHEMA_V1));
    assert_eq!(raw["state"], json!("WAITING"));
    assert!(raw["rngState"].is_u64());
}
