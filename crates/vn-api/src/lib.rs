use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;
use vn_core::{EngineSnapshot, Step, StepKind, ValueMap, VnError};
use vn_runtime::{Engine, EngineListener, EngineOptions};

pub struct CreateEngineFromJsonOptions {
    pub script_json: String,
    pub saved_globals: Option<ValueMap>,
    pub saved_variables: Option<ValueMap>,
    pub environment: Option<BTreeMap<String, bool>>,
    pub random_seed: Option<u32>,
    /// Start playback right after loading. `start_label` is only used then.
    pub auto_start: bool,
    pub start_label: Option<String>,
    /// Reject scripts containing steps the interpreter would skip.
    pub strict: bool,
    /// Step limit per drive; `None` runs unbounded.
    pub step_guard: Option<usize>,
    pub listeners: Vec<Box<dyn EngineListener>>,
}

impl Default for CreateEngineFromJsonOptions {
    fn default() -> Self {
        Self {
            script_json: "[]".to_string(),
            saved_globals: None,
            saved_variables: None,
            environment: None,
            random_seed: None,
            auto_start: true,
            start_label: None,
            strict: false,
            step_guard: None,
            listeners: Vec::new(),
        }
    }
}

pub struct ResumeEngineFromJsonOptions {
    pub script_json: String,
    pub snapshot: EngineSnapshot,
    pub environment: Option<BTreeMap<String, bool>>,
    pub step_guard: Option<usize>,
    pub listeners: Vec<Box<dyn EngineListener>>,
}

/// Parses script text. Accepts a bare array of steps or an object carrying
/// them under `steps`.
pub fn parse_script_json(text: &str) -> Result<Vec<Step>, VnError> {
    let raw: Value = serde_json::from_str(text).map_err(|error| {
        VnError::new(
            "API_SCRIPT_JSON",
            format!("Script is not valid JSON: {}", error),
        )
    })?;
    parse_script_value(raw)
}

pub fn parse_script_value(raw: Value) -> Result<Vec<Step>, VnError> {
    let list = match raw {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("steps") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(VnError::new(
                    "API_SCRIPT_SHAPE",
                    "Script object must carry a \"steps\" array.",
                ))
            }
        },
        other => {
            return Err(VnError::new(
                "API_SCRIPT_SHAPE",
                format!(
                    "Script must be an array of steps, got {}.",
                    json_type_name(&other)
                ),
            ))
        }
    };

    let mut steps = Vec::with_capacity(list.len());
    for (index, item) in list.into_iter().enumerate() {
        if !item.is_object() {
            return Err(VnError::new(
                "API_SCRIPT_SHAPE",
                format!(
                    "Step at index {} must be an object, got {}.",
                    index,
                    json_type_name(&item)
                ),
            ));
        }
        steps.push(Step::from_json(item));
    }
    debug!(total_steps = steps.len(), "script parsed");
    Ok(steps)
}

/// Fails on the first step that decoded to an unknown instruction.
pub fn ensure_known_steps(steps: &[Step]) -> Result<(), VnError> {
    for (index, step) in steps.iter().enumerate() {
        if let StepKind::Unknown { type_name, reason } = &step.kind {
            let message = format!(
                "Step at index {} has unsupported type \"{}\": {}",
                index, type_name, reason
            );
            return Err(match &step.id {
                Some(id) => VnError::at_step("API_SCRIPT_UNKNOWN_STEP", message, id.clone()),
                None => VnError::new("API_SCRIPT_UNKNOWN_STEP", message),
            });
        }
    }
    Ok(())
}

pub fn create_engine_from_json(options: CreateEngineFromJsonOptions) -> Result<Engine, VnError> {
    let steps = parse_script_json(&options.script_json)?;
    if options.strict {
        ensure_known_steps(&steps)?;
    }

    let mut engine = Engine::new(EngineOptions {
        random_seed: options.random_seed,
        environment: options.environment,
        step_guard: options.step_guard,
    });
    for listener in options.listeners {
        engine.add_listener(listener);
    }
    engine.load_script(steps, options.saved_globals, options.saved_variables);

    if options.auto_start {
        engine.start(options.start_label.as_deref())?;
    }
    Ok(engine)
}

pub fn resume_engine_from_json(options: ResumeEngineFromJsonOptions) -> Result<Engine, VnError> {
    let steps = parse_script_json(&options.script_json)?;
    let mut engine = Engine::new(EngineOptions {
        random_seed: None,
        environment: options.environment,
        step_guard: options.step_guard,
    });
    for listener in options.listeners {
        engine.add_listener(listener);
    }
    engine.load_script(steps, None, None);
    engine.resume(options.snapshot)?;
    Ok(engine)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
