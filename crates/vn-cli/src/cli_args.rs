use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "vn-player")]
#[command(about = "Visual novel script player and agent CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Agent(AgentArgs),
    Play(PlayArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[command(subcommand)]
    pub(crate) command: AgentCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AgentCommand {
    Start(StartArgs),
    Advance(AdvanceArgs),
    Choose(ChooseArgs),
    Env(EnvArgs),
}

#[derive(Debug, Args)]
pub(crate) struct StartArgs {
    #[arg(long = "script")]
    pub(crate) script: String,
    /// JSON object with saved globals.
    #[arg(long = "globals")]
    pub(crate) globals: Option<String>,
    /// JSON object with saved locals.
    #[arg(long = "variables")]
    pub(crate) variables: Option<String>,
    #[arg(long = "start-label")]
    pub(crate) start_label: Option<String>,
    #[arg(long = "seed")]
    pub(crate) seed: Option<u32>,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct AdvanceArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct ChooseArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "label")]
    pub(crate) label: String,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct EnvArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "key")]
    pub(crate) key: String,
    #[arg(long = "value", action = ArgAction::Set)]
    pub(crate) value: bool,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct PlayArgs {
    #[arg(long = "script")]
    pub(crate) script: String,
    #[arg(long = "save-file")]
    pub(crate) save_file: Option<String>,
    #[arg(long = "start-label")]
    pub(crate) start_label: Option<String>,
}
