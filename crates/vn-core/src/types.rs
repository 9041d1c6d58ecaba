use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::ValueMap;

/// Reserved local key holding the label of the last `next` step passed.
pub const AUTOSAVE_KEY: &str = "_autosave";
/// Reserved local key holding the labels `idle_chat` may jump to.
pub const UNLOCKED_DIALOGUES_KEY: &str = "_unlocked_dialogues";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineState {
    #[default]
    Idle,
    Playing,
    Waiting,
    Choice,
    Ended,
}

impl EngineState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Playing => "PLAYING",
            Self::Waiting => "WAITING",
            Self::Choice => "CHOICE",
            Self::Ended => "ENDED",
        }
    }

    /// True when the machine is parked on a dialogue or choice step.
    pub fn is_suspended(self) -> bool {
        matches!(self, Self::Waiting | Self::Choice)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub schema_version: String,
    pub cursor: usize,
    pub state: EngineState,
    pub globals: ValueMap,
    /// Locals including the reserved `_autosave` / `_unlocked_dialogues` keys.
    pub variables: ValueMap,
    pub environment: BTreeMap<String, bool>,
    pub rng_state: u32,
}
