use std::ffi::OsString;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vn_core::VnError;

mod agent;
mod boundary_runner;
mod cli_args;
mod error_map;
mod models;
mod play;
mod script_loader;
mod session_ops;
mod state_store;

pub(crate) use boundary_runner::{collect_boundary, emit_boundary};
pub(crate) use cli_args::{
    AdvanceArgs, AgentArgs, AgentCommand, ChooseArgs, Cli, EnvArgs, Mode, PlayArgs, StartArgs,
};
pub(crate) use error_map::{
    emit_error, json_string, map_cli_io, map_cli_output_encode, map_cli_script_path,
    map_cli_script_read, map_cli_state_encode, map_cli_state_invalid, map_cli_state_read,
    map_cli_state_write, map_cli_values_invalid,
};
pub(crate) use models::{
    BoundaryEvent, BoundaryResult, LoadedScript, PlayCommandAction, PlayCommandContext,
    PlayerStateV1, SaveFileV1, PLAYER_STATE_SCHEMA, SAVE_FILE_SCHEMA,
};
pub(crate) use script_loader::{load_script_file, parse_value_map_arg};
#[cfg(test)]
pub(crate) use script_loader::resolve_script_path;
pub(crate) use session_ops::{
    create_engine_for_script, emit_boundary_with_saved_state, load_engine_from_state,
};
pub(crate) use state_store::{load_player_state, load_save_file, save_player_state, save_save_file};

/// Log filter variable; stdout stays reserved for protocol lines.
pub const LOG_ENV: &str = "VN_LOG";

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_logging();
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // no-op when already initialised
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<i32, VnError> {
    match cli.command {
        Mode::Agent(args) => agent::run_agent(args),
        Mode::Play(args) => play::run_play(args),
    }
}
