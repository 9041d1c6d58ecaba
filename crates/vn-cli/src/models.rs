use serde::{Deserialize, Serialize};
use vn_core::{ChoiceOption, EngineEvent, EngineSnapshot, ValueMap};

pub(crate) const PLAYER_STATE_SCHEMA: &str = "vn-player-state.v1";
pub(crate) const SAVE_FILE_SCHEMA: &str = "vn-save.v1";

#[derive(Debug, Clone)]
pub(crate) struct LoadedScript {
    /// Absolute path, used as the script reference in state files.
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) script_json: String,
}

/// Agent state between invocations: the script reference plus an engine
/// snapshot taken at the last boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerStateV1 {
    pub(crate) schema_version: String,
    pub(crate) script_path: String,
    pub(crate) snapshot: EngineSnapshot,
}

/// Host persistence for the line player: globals and locals only. Loading
/// restarts the script, which resumes at the saved autosave label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaveFileV1 {
    pub(crate) schema_version: String,
    pub(crate) globals: ValueMap,
    pub(crate) variables: ValueMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundaryEvent {
    Say,
    Choice,
    End,
    Stalled,
    Paused,
}

impl BoundaryEvent {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Say => "SAY",
            Self::Choice => "CHOICE",
            Self::End => "END",
            Self::Stalled => "STALLED",
            Self::Paused => "PAUSED",
        }
    }

    pub(crate) fn is_suspended(self) -> bool {
        matches!(self, Self::Say | Self::Choice)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BoundaryResult {
    pub(crate) event: BoundaryEvent,
    /// Story events emitted since the previous boundary, in order.
    pub(crate) events: Vec<EngineEvent>,
    pub(crate) choices: Vec<ChoiceOption>,
    pub(crate) fault: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayCommandAction {
    NotHandled,
    Continue,
    RefreshBoundary,
    Quit,
}

pub(crate) struct PlayCommandContext<'a> {
    pub(crate) save_file: &'a str,
    pub(crate) script: &'a LoadedScript,
    pub(crate) start_label: Option<&'a str>,
}
