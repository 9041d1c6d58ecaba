use std::fs;
use std::path::PathBuf;

use vn_core::{ValueMap, VnError};

use crate::{map_cli_script_path, map_cli_script_read, map_cli_values_invalid, LoadedScript};

pub(crate) fn load_script_file(script_path: &str) -> Result<LoadedScript, VnError> {
    let path = resolve_script_path(script_path)?;
    let script_json = fs::read_to_string(&path).map_err(map_cli_script_read)?;
    // shape check only; the engine re-parses on every create/resume
    vn_api::parse_script_json(&script_json)?;

    let title = path
        .file_stem()
        .and_then(|name| name.to_str())
        .unwrap_or("script")
        .to_string();
    Ok(LoadedScript {
        id: path.to_string_lossy().to_string(),
        title,
        script_json,
    })
}

pub(crate) fn resolve_script_path(script_path: &str) -> Result<PathBuf, VnError> {
    let path = PathBuf::from(script_path);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_script_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(VnError::new(
            "CLI_SCRIPT_NOT_FOUND",
            format!("script does not exist: {}", absolute.display()),
        ));
    }
    if !absolute.is_file() {
        return Err(VnError::new(
            "CLI_SCRIPT_NOT_FILE",
            format!("script is not a file: {}", absolute.display()),
        ));
    }
    Ok(absolute)
}

/// Parses a `--globals` / `--variables` argument: a JSON object given
/// inline, or `@path` to read it from a file.
pub(crate) fn parse_value_map_arg(raw: &str) -> Result<ValueMap, VnError> {
    let text = match raw.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).map_err(map_cli_script_read)?,
        None => raw.to_string(),
    };
    serde_json::from_str(&text).map_err(map_cli_values_invalid)
}
