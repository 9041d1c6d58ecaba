use vn_core::{EngineEvent, EngineState, VnError};
use vn_runtime::{Engine, EventRecorder};

use crate::{json_string, map_cli_output_encode, BoundaryEvent, BoundaryResult};

/// Drains the story events recorded since the last boundary and classifies
/// where the engine stopped. A suspended engine with nothing new to show
/// (fresh resume, failed choice jump) re-renders its parked step.
pub(crate) fn collect_boundary(engine: &Engine, recorder: &EventRecorder) -> BoundaryResult {
    let mut events = recorder.take_story_events();
    if events.is_empty() && engine.state().is_suspended() {
        events.extend(engine.current_boundary());
    }

    let event = match engine.state() {
        EngineState::Waiting => BoundaryEvent::Say,
        EngineState::Choice => BoundaryEvent::Choice,
        EngineState::Ended => BoundaryEvent::End,
        EngineState::Playing if engine.is_stalled() => BoundaryEvent::Stalled,
        EngineState::Playing | EngineState::Idle => BoundaryEvent::Paused,
    };
    let choices = match engine.current_boundary() {
        Some(EngineEvent::Choice { choices }) if event == BoundaryEvent::Choice => choices,
        _ => Vec::new(),
    };
    let fault = engine.last_fault().map(|fault| format!("{:?}", fault));

    BoundaryResult {
        event,
        events,
        choices,
        fault,
    }
}

pub(crate) fn emit_boundary(
    boundary: BoundaryResult,
    state_out: Option<String>,
) -> Result<(), VnError> {
    println!("RESULT:OK");
    println!("EVENT:{}", boundary.event.as_str());

    for event in &boundary.events {
        println!(
            "EVENT_JSON:{}",
            serde_json::to_string(event).map_err(map_cli_output_encode)?
        );
    }

    for option in &boundary.choices {
        println!("CHOICE:{}|{}", option.label, json_string(&option.display));
    }

    if let Some(fault) = boundary.fault {
        println!("FAULT_JSON:{}", json_string(&fault));
    }

    println!(
        "STATE_OUT:{}",
        state_out.unwrap_or_else(|| "NONE".to_string())
    );
    Ok(())
}
