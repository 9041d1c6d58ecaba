use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vn_core::{EngineEvent, EngineState, ValueMap};

pub const TESTCASE_SCHEMA_V1: &str = "vn-tool-case.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default = "default_script_file")]
    pub script: String,
    #[serde(default)]
    pub random_seed: Option<u32>,
    #[serde(default)]
    pub globals: ValueMap,
    #[serde(default)]
    pub variables: ValueMap,
    /// Applied before `start`; keys must belong to the default environment.
    #[serde(default)]
    pub environment: BTreeMap<String, bool>,
    #[serde(default)]
    pub start_label: Option<String>,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_events: Vec<ExpectedEvent>,
    #[serde(default)]
    pub expected_state: Option<EngineState>,
    /// Subset of the final locals to check, reserved keys included.
    #[serde(default)]
    pub expected_variables: ValueMap,
    #[serde(default)]
    pub expected_globals: ValueMap,
}

fn default_script_file() -> String {
    "script.json".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestAction {
    Advance,
    Choose { label: String },
    Env { key: String, value: bool },
}

impl TestAction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Choose { .. } => "choose",
            Self::Env { .. } => "env",
        }
    }
}

/// Story events in a compact form. Debug snapshots are never compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExpectedEvent {
    Say {
        character: String,
        text: String,
    },
    Choice {
        choices: Vec<String>,
    },
    ShowSprite {
        sprite: String,
        location: String,
    },
    RemoveSprite {
        sprite: String,
    },
    Background {
        path: String,
    },
    AutoSave {
        label: String,
    },
    Stalled,
    End,
}

impl ExpectedEvent {
    pub fn from_engine_event(event: &EngineEvent) -> Option<Self> {
        let converted = match event {
            EngineEvent::Say { character, text } => Self::Say {
                character: character.clone(),
                text: text.clone(),
            },
            EngineEvent::Choice { choices } => Self::Choice {
                choices: choices.iter().map(|option| option.display.clone()).collect(),
            },
            EngineEvent::ShowSprite {
                final_location,
                placement,
            } => Self::ShowSprite {
                sprite: placement.sprite.clone(),
                location: final_location.clone(),
            },
            EngineEvent::RemoveSprite { sprite } => Self::RemoveSprite {
                sprite: sprite.clone(),
            },
            EngineEvent::Background { path } => Self::Background { path: path.clone() },
            EngineEvent::AutoSave { label } => Self::AutoSave {
                label: label.clone(),
            },
            EngineEvent::Finish => Self::End,
            EngineEvent::UpdateDebug { .. } => return None,
        };
        Some(converted)
    }
}
