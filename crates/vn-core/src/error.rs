use crate::step::StepId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{code}: {message}")]
pub struct VnError {
    pub code: String,
    pub message: String,
    pub step_id: Option<StepId>,
}

impl VnError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            step_id: None,
        }
    }

    pub fn at_step(code: impl Into<String>, message: impl Into<String>, step_id: StepId) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            step_id: Some(step_id),
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn display_joins_code_and_message() {
        let error = VnError::new("ENGINE_GUARD_EXCEEDED", "too many steps");
        assert_eq!(error.to_string(), "ENGINE_GUARD_EXCEEDED: too many steps");
        assert!(error.step_id.is_none());
    }

    #[test]
    fn at_step_keeps_offending_id() {
        let error = VnError::at_step("X", "y", StepId::Number(7));
        assert_eq!(error.step_id, Some(StepId::Number(7)));
    }
}
