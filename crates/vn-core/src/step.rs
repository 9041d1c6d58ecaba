use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::VnValue;

/// Author-assigned step identifier. Ids are matched strictly, so `1` and
/// `"1"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepId {
    Number(i64),
    Text(String),
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for StepId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for StepId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One instruction of a script. Decoded from JSON through
/// [`Step::from_json`], which never fails: an unrecognised or malformed
/// step becomes [`StepKind::Unknown`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Step {
    pub id: Option<StepId>,
    pub kind: StepKind,
}

impl Step {
    pub fn new(id: impl Into<StepId>, kind: StepKind) -> Self {
        Self {
            id: Some(id.into()),
            kind,
        }
    }

    pub fn from_json(raw: Value) -> Self {
        let id = raw
            .get("id")
            .cloned()
            .and_then(|value| serde_json::from_value::<StepId>(value).ok());
        let type_name = raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let kind = match serde_json::from_value::<StepKind>(raw) {
            Ok(kind) => kind,
            Err(error) => StepKind::Unknown {
                type_name,
                reason: error.to_string(),
            },
        };
        Self { id, kind }
    }

    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// Label name when this step is a jump target.
    pub fn label_name(&self) -> Option<&str> {
        match &self.kind {
            StepKind::Label { label } => Some(label.as_str()),
            _ => None,
        }
    }
}

impl From<Value> for Step {
    fn from(raw: Value) -> Self {
        Self::from_json(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    Label {
        #[serde(default)]
        label: String,
    },
    Start,
    Command,
    Meta(MetaStep),
    Transition {
        #[serde(default)]
        label: String,
    },
    Next {
        #[serde(default)]
        label: String,
    },
    Dialogue {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        content: Option<String>,
    },
    Choice {
        #[serde(default)]
        choice: Vec<ChoiceOption>,
    },
    ShowSprite(SpritePlacement),
    RemoveSprite {
        #[serde(default)]
        sprite: String,
    },
    ModifyBackground {
        #[serde(default)]
        background: String,
    },
    ModifyVariable(Mutation),
    ModifyGlobal(Mutation),
    UnlockDialogues {
        #[serde(default)]
        events: Vec<String>,
    },
    IdleChat,
    Conditional(Condition),
    ConditionalGlobal(Condition),
    FinishDialogue,
    #[serde(skip)]
    Unknown { type_name: String, reason: String },
}

impl StepKind {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Label { .. } => "label",
            Self::Start => "start",
            Self::Command => "command",
            Self::Meta(_) => "meta",
            Self::Transition { .. } => "transition",
            Self::Next { .. } => "next",
            Self::Dialogue { .. } => "dialogue",
            Self::Choice { .. } => "choice",
            Self::ShowSprite(_) => "show_sprite",
            Self::RemoveSprite { .. } => "remove_sprite",
            Self::ModifyBackground { .. } => "modify_background",
            Self::ModifyVariable(_) => "modify_variable",
            Self::ModifyGlobal(_) => "modify_global",
            Self::UnlockDialogues { .. } => "unlock_dialogues",
            Self::IdleChat => "idle_chat",
            Self::Conditional(_) => "conditional",
            Self::ConditionalGlobal(_) => "conditional_global",
            Self::FinishDialogue => "finish_dialogue",
            Self::Unknown { type_name, .. } => type_name.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChoiceOption {
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaAction {
    CreateVar,
    CreateGlobal,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetaStep {
    #[serde(default)]
    pub action: MetaAction,
    #[serde(default)]
    pub var: String,
    #[serde(default, alias = "value")]
    pub init: Option<VnValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationAction {
    ModifyVar,
    IncrementVar,
    SubtractVar,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Mutation {
    #[serde(default)]
    pub action: MutationAction,
    #[serde(default)]
    pub var: String,
    #[serde(default)]
    pub value: Option<VnValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub var: String,
    #[serde(default)]
    pub condition: Comparison,
    #[serde(default)]
    pub value: Option<VnValue>,
    #[serde(default)]
    pub end: Option<StepId>,
}

/// Sprite placement as authored on a `show_sprite` step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpritePlacement {
    #[serde(default)]
    pub sprite: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        rename = "dyn_location",
        skip_serializing_if = "Option::is_none"
    )]
    pub dyn_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w_frame_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_frame_ratio: Option<f64>,
}

/// Stage rectangle in percent of the stage size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SpritePlacement {
    /// Grid cell to stage rectangle. The stage is split into `wRatio` columns
    /// and `hRatio` rows; `column`/`row` are 1-based and the sprite spans
    /// `wFrameRatio` x `hFrameRatio` cells.
    pub fn grid_rect(&self) -> Option<SpriteRect> {
        let w_ratio = self.w_ratio.filter(|ratio| *ratio != 0.0)?;
        let h_ratio = self.h_ratio.filter(|ratio| *ratio != 0.0)?;
        Some(SpriteRect {
            left: (self.column? - 1.0) / w_ratio * 100.0,
            top: (self.row? - 1.0) / h_ratio * 100.0,
            width: self.w_frame_ratio? / w_ratio * 100.0,
            height: self.h_frame_ratio? / h_ratio * 100.0,
        })
    }
}

/// Decodes a script from a JSON array of steps.
pub fn steps_from_json(raw: Value) -> Result<Vec<Step>, serde_json::Error> {
    serde_json::from_value(raw)
}
