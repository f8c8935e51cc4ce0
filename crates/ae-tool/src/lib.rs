mod case;
mod diagnostics;
mod runner;
mod source;

pub use case::{read_test_case, TestCase, TESTCASE_SCHEMA_V1};
pub use diagnostics::{
    validate_assets, validate_dialog, validate_variables, Diagnostic, DiagnosticSource,
};
pub use runner::{assert_case, run_case, RunReport};
pub use source::read_assets_from_dir;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse testcase {path}: {source}")]
    ParseCase {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid testcase schema version \"{found}\", expected \"{expected}\".")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("No asset files under {path}.")]
    AssetsEmpty { path: PathBuf },
    #[error("Engine error: {0}")]
    Engine(#[from] ae_core::AdventureError),
    #[error("Variable \"{key}\" mismatch after replay: expected {expected:?}, actual {actual:?}.")]
    VariableMismatch {
        key: String,
        expected: Option<String>,
        actual: Option<String>,
    },
}
