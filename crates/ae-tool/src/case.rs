use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ToolError;

pub const TESTCASE_SCHEMA_V1: &str = "ae-testcase.v1";

/// A replayable scenario: an asset bundle, a recorded command log, and the
/// variable state the replay must end in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    /// Path-keyed asset texts, same keying as `ae_api::load_assets_from_map`.
    pub assets: BTreeMap<String, String>,
    /// One encoded command per line.
    pub history: Vec<String>,
    #[serde(default)]
    pub random_seed: Option<u32>,
    /// Expected `key -> data` pairs after replay; keys are store-folded.
    pub expected_variables: BTreeMap<String, String>,
}

pub fn read_test_case(path: &Path) -> Result<TestCase, ToolError> {
    let raw = fs::read_to_string(path).map_err(|source| ToolError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let case: TestCase = serde_json::from_str(&raw).map_err(|source| ToolError::ParseCase {
        path: path.to_path_buf(),
        source,
    })?;
    if case.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(ToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: case.schema_version,
        });
    }
    Ok(case)
}
