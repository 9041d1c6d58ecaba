use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{TestCase, VnToolError, TESTCASE_SCHEMA_V1};

pub const TESTCASE_FILE: &str = "testcase.json";

pub fn read_script(example_dir: &Path, script_file: &str) -> Result<String, VnToolError> {
    let path = example_dir.join(script_file);
    fs::read_to_string(&path).map_err(|source| VnToolError::ReadFile { path, source })
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, VnToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| VnToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase = serde_json::from_str(&raw).map_err(|source| VnToolError::ParseCase {
        path: case_path.to_path_buf(),
        source,
    })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(VnToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}

/// Every `testcase.json` below `root`, sorted by path.
pub fn discover_cases(root: &Path) -> Result<Vec<PathBuf>, VnToolError> {
    let mut cases = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == TESTCASE_FILE)
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();
    cases.sort();

    if cases.is_empty() {
        return Err(VnToolError::CasesEmpty {
            path: root.to_path_buf(),
        });
    }
    Ok(cases)
}
