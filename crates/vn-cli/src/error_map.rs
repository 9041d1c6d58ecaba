use std::fmt::Display;

use vn_core::VnError;

fn map_error(code: &'static str, error: impl Display) -> VnError {
    VnError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: VnError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!("ERROR_MSG_JSON:{}", json_string(&error.message));
    1
}

pub(crate) fn json_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

pub(crate) fn map_cli_io(error: std::io::Error) -> VnError {
    map_error("CLI_IO", error)
}

pub(crate) fn map_cli_script_path(error: std::io::Error) -> VnError {
    map_error("CLI_SCRIPT_PATH", error)
}

pub(crate) fn map_cli_script_read(error: std::io::Error) -> VnError {
    map_error("CLI_SCRIPT_READ", error)
}

pub(crate) fn map_cli_values_invalid(error: serde_json::Error) -> VnError {
    map_error("CLI_VALUES_INVALID", error)
}

pub(crate) fn map_cli_state_write(error: std::io::Error) -> VnError {
    map_error("CLI_STATE_WRITE", error)
}

pub(crate) fn map_cli_state_read(error: std::io::Error) -> VnError {
    map_error("CLI_STATE_READ", error)
}

pub(crate) fn map_cli_state_invalid(error: serde_json::Error) -> VnError {
    map_error("CLI_STATE_INVALID", error)
}

pub(crate) fn map_cli_state_encode(error: serde_json::Error) -> VnError {
    map_error("CLI_STATE_ENCODE", error)
}

pub(crate) fn map_cli_output_encode(error: serde_json::Error) -> VnError {
    map_error("CLI_OUTPUT_ENCODE", error)
}
