use serde::{Deserialize, Serialize};

use crate::step::{ChoiceOption, SpritePlacement};
use crate::types::EngineState;
use crate::value::ValueMap;

/// Notifications emitted to the presentation layer, in step-execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EngineEvent {
    Say {
        character: String,
        text: String,
    },
    Choice {
        choices: Vec<ChoiceOption>,
    },
    #[serde(rename_all = "camelCase")]
    ShowSprite {
        final_location: String,
        placement: SpritePlacement,
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
    Finish,
    UpdateDebug {
        globals: ValueMap,
        variables: ValueMap,
        state: EngineState,
    },
}

impl EngineEvent {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Say { .. } => "say",
            Self::Choice { .. } => "choice",
            Self::ShowSprite { .. } => "showSprite",
            Self::RemoveSprite { .. } => "removeSprite",
            Self::Background { .. } => "background",
            Self::AutoSave { .. } => "autoSave",
            Self::Finish => "finish",
            Self::UpdateDebug { .. } => "updateDebug",
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, Self::UpdateDebug { .. })
    }
}
