use std::path::Path;

use tracing::info;
use vn_core::VnError;
use vn_runtime::{Engine, EventRecorder};

use crate::{
    collect_boundary, create_engine_for_script, emit_boundary_with_saved_state,
    load_engine_from_state, load_script_file, parse_value_map_arg, AdvanceArgs, AgentArgs,
    AgentCommand, ChooseArgs, EnvArgs, StartArgs,
};

pub(super) fn run_agent(args: AgentArgs) -> Result<i32, VnError> {
    match args.command {
        AgentCommand::Start(args) => run_start(args),
        AgentCommand::Advance(args) => run_advance(args),
        AgentCommand::Choose(args) => run_choose(args),
        AgentCommand::Env(args) => run_env(args),
    }
}

pub(super) fn run_start(args: StartArgs) -> Result<i32, VnError> {
    let script = load_script_file(&args.script)?;
    let globals = args.globals.as_deref().map(parse_value_map_arg).transpose()?;
    let variables = args
        .variables
        .as_deref()
        .map(parse_value_map_arg)
        .transpose()?;
    let recorder = EventRecorder::default();
    let engine = create_engine_for_script(
        &script,
        globals,
        variables,
        args.start_label.as_deref(),
        args.seed,
        &recorder,
    )?;
    info!(script = %script.id, state = %engine.state(), "agent start");

    let boundary = collect_boundary(&engine, &recorder);
    emit_boundary_with_saved_state(&engine, boundary, &args.state_out, &script.id)
}

pub(super) fn run_advance(args: AdvanceArgs) -> Result<i32, VnError> {
    run_state_transition(&args.state_in, &args.state_out, |engine| engine.advance())
}

pub(super) fn run_choose(args: ChooseArgs) -> Result<i32, VnError> {
    run_state_transition(&args.state_in, &args.state_out, |engine| {
        engine.select_choice(&args.label)
    })
}

pub(super) fn run_env(args: EnvArgs) -> Result<i32, VnError> {
    run_state_transition(&args.state_in, &args.state_out, |engine| {
        engine.set_environment(&args.key, args.value)
    })
}

fn run_state_transition(
    state_in: &str,
    state_out: &str,
    transition: impl FnOnce(&mut Engine) -> Result<(), VnError>,
) -> Result<i32, VnError> {
    let recorder = EventRecorder::default();
    let (script, mut engine) = load_engine_from_state(Path::new(state_in), &recorder)?;
    recorder.clear();
    transition(&mut engine)?;
    let boundary = collect_boundary(&engine, &recorder);
    emit_boundary_with_saved_state(&engine, boundary, state_out, &script.id)
}
