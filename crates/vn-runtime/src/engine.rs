#![allow(unused_imports)]

use std::collections::BTreeMap;

use tracing::{debug, error, info, warn};
use vn_core::{
    ChoiceOption, Comparison, Condition, EngineEvent, EngineSnapshot, EngineState, MetaAction,
    MetaStep, Mutation, MutationAction, SpritePlacement, Step, StepId, StepKind, ValueMap,
    VnError, VnValue, AUTOSAVE_KEY, UNLOCKED_DIALOGUES_KEY,
};

use crate::helpers::template::{has_placeholder, render_placeholders};

mod eval;
mod jump;
mod lifecycle;
mod listener;
mod rng;
mod scope;
mod snapshot;
mod step;

pub use lifecycle::{Engine, EngineFault, EngineOptions};
pub use listener::{EngineListener, EventRecorder};
pub use scope::Environment;
pub use snapshot::SNAPSHOT_SCHEMA_V1;

#[cfg(test)]
mod eval_tests;
#[cfg(test)]
mod snapshot_tests;

#[cfg(test)]
pub(super) mod runtime_test_support {
    use super::*;

    pub(super) fn steps(raw: serde_json::Value) -> Vec<Step> {
        vn_core::steps_from_json(raw).expect("steps should decode")
    }

    pub(super) fn values(raw: serde_json::Value) -> ValueMap {
        serde_json::from_value(raw).expect("value map should decode")
    }

    pub(super) fn engine_with(
        script: serde_json::Value,
        globals: Option<ValueMap>,
        variables: Option<ValueMap>,
    ) -> (Engine, EventRecorder) {
        let mut engine = Engine::new(EngineOptions {
            random_seed: Some(1),
            ..EngineOptions::default()
        });
        let recorder = EventRecorder::default();
        engine.add_listener(Box::new(recorder.clone()));
        engine.load_script(steps(script), globals, variables);
        (engine, recorder)
    }

    pub(super) fn engine_from(script: serde_json::Value) -> (Engine, EventRecorder) {
        engine_with(script, None, None)
    }

    pub(super) fn say(character: &str, text: &str) -> EngineEvent {
        EngineEvent::Say {
            character: character.to_string(),
            text: text.to_string(),
        }
    }
}
