use std::path::Path;

use vn_api::{create_engine_from_json, CreateEngineFromJsonOptions};
use vn_core::{EngineState, ValueMap};
use vn_runtime::{Engine, EventRecorder};

use crate::source::{read_script, read_test_case};
use crate::{ExpectedEvent, TestAction, TestCase, VnToolError};

const MAX_BOUNDARIES: usize = 5_000;

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub observed_events: Vec<ExpectedEvent>,
    pub consumed_actions: usize,
    pub boundaries: usize,
    pub final_state: EngineState,
    pub globals: ValueMap,
    pub variables: ValueMap,
}

pub fn run_case(example_dir: &Path, case: &TestCase) -> Result<RunReport, VnToolError> {
    let script_json = read_script(example_dir, &case.script)?;
    let recorder = EventRecorder::default();
    let mut engine = create_engine_from_json(CreateEngineFromJsonOptions {
        script_json,
        saved_globals: Some(case.globals.clone()),
        saved_variables: Some(case.variables.clone()),
        random_seed: Some(case.random_seed.unwrap_or(1)),
        auto_start: false,
        listeners: vec![Box::new(recorder.clone())],
        ..CreateEngineFromJsonOptions::default()
    })?;
    for (key, value) in &case.environment {
        engine.set_environment(key, *value)?;
    }
    engine.start(case.start_label.as_deref())?;

    let mut observed_events = Vec::new();
    let mut action_index = 0usize;

    for boundary in 1..=MAX_BOUNDARIES {
        observed_events.extend(
            recorder
                .take()
                .iter()
                .filter_map(ExpectedEvent::from_engine_event),
        );
        action_index = apply_env_actions(&mut engine, &case.actions, action_index)?;

        let expected_action_kind = match engine.state() {
            EngineState::Waiting => "advance",
            EngineState::Choice => "choose",
            EngineState::Playing if engine.is_stalled() => {
                observed_events.push(ExpectedEvent::Stalled);
                return finish_run(&engine, observed_events, action_index, boundary, case);
            }
            _ => return finish_run(&engine, observed_events, action_index, boundary, case),
        };

        let event_index = observed_events.len().saturating_sub(1);
        let action = case
            .actions
            .get(action_index)
            .ok_or_else(|| VnToolError::MissingAction {
                event_index,
                expected_action_kind: expected_action_kind.to_string(),
            })?;
        match (engine.state(), action) {
            (EngineState::Waiting, TestAction::Advance) => engine.advance()?,
            (EngineState::Choice, TestAction::Choose { label }) => engine.select_choice(label)?,
            _ => {
                return Err(VnToolError::ActionKindMismatch {
                    event_index,
                    expected_action_kind: expected_action_kind.to_string(),
                    actual_action_kind: action.kind_name().to_string(),
                })
            }
        }
        action_index += 1;
    }

    Err(VnToolError::GuardExceeded {
        max_boundaries: MAX_BOUNDARIES,
    })
}

/// Environment toggles apply between boundaries and never satisfy one.
fn apply_env_actions(
    engine: &mut Engine,
    actions: &[TestAction],
    mut action_index: usize,
) -> Result<usize, VnToolError> {
    while let Some(TestAction::Env { key, value }) = actions.get(action_index) {
        engine.set_environment(key, *value)?;
        action_index += 1;
    }
    Ok(action_index)
}

fn finish_run(
    engine: &Engine,
    observed_events: Vec<ExpectedEvent>,
    action_index: usize,
    boundaries: usize,
    case: &TestCase,
) -> Result<RunReport, VnToolError> {
    if action_index != case.actions.len() {
        return Err(VnToolError::UnusedActions {
            used: action_index,
            total: case.actions.len(),
        });
    }
    Ok(RunReport {
        observed_events,
        consumed_actions: action_index,
        boundaries,
        final_state: engine.state(),
        globals: engine.globals().clone(),
        variables: engine.variables_snapshot(),
    })
}

pub fn assert_case(example_dir: &Path, case_path: &Path) -> Result<(), VnToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(example_dir, &case)?;

    if report.observed_events.len() != case.expected_events.len() {
        let observed = serde_json::to_string_pretty(&report.observed_events)
            .map_err(VnToolError::EventSerialize)?;
        return Err(VnToolError::EventCountMismatch {
            expected: case.expected_events.len(),
            actual: report.observed_events.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_events
        .iter()
        .zip(report.observed_events.iter())
        .enumerate()
    {
        if expected != actual {
            let expected = serde_json::to_string(expected).map_err(VnToolError::EventSerialize)?;
            let actual = serde_json::to_string(actual).map_err(VnToolError::EventSerialize)?;
            return Err(VnToolError::EventMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    if let Some(expected) = case.expected_state {
        if expected != report.final_state {
            return Err(VnToolError::StateMismatch {
                expected: expected.to_string(),
                actual: report.final_state.to_string(),
            });
        }
    }

    compare_values("variable", &case.expected_variables, &report.variables)?;
    compare_values("global", &case.expected_globals, &report.globals)?;
    Ok(())
}

fn compare_values(scope: &str, expected: &ValueMap, actual: &ValueMap) -> Result<(), VnToolError> {
    for (key, value) in expected {
        let found = actual.get(key);
        if found != Some(value) {
            let expected = serde_json::to_string(value).map_err(VnToolError::EventSerialize)?;
            let actual = serde_json::to_string(&found).map_err(VnToolError::EventSerialize)?;
            return Err(VnToolError::ValueMismatch {
                scope: scope.to_string(),
                key: key.clone(),
                expected,
                actual,
            });
        }
    }
    Ok(())
}
