use std::path::Path;
use std::rc::Rc;

use ae_api::{create_store, load_assets_from_map, CreateStoreOptions};
use ae_core::VariableStore;
use ae_runtime::ManualClock;

use crate::case::{read_test_case, TestCase};
use crate::ToolError;

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub final_variables: VariableStore,
    pub replayed_commands: usize,
}

/// Replays the case's history against its assets and checks every expected
/// variable. Mismatches surface as [`ToolError::VariableMismatch`].
pub fn run_case(case: &TestCase) -> Result<RunReport, ToolError> {
    let assets = load_assets_from_map(&case.assets)?;
    // A manual clock keeps the replayed run free of real-time noise.
    let mut store = create_store(
        assets,
        CreateStoreOptions {
            clock: Some(Rc::new(ManualClock::new())),
            random_seed: case.random_seed.or(Some(1)),
            ..CreateStoreOptions::default()
        },
    );

    store.replay(&case.history)?;

    let final_variables = store.state().variables.clone();
    for (key, expected) in &case.expected_variables {
        let actual = final_variables.entry(key).map(|entry| entry.data.clone());
        if actual.as_deref() != Some(expected.as_str()) {
            return Err(ToolError::VariableMismatch {
                key: key.clone(),
                expected: Some(expected.clone()),
                actual,
            });
        }
    }

    Ok(RunReport {
        final_variables,
        replayed_commands: case.history.len(),
    })
}

pub fn assert_case(path: &Path) -> Result<RunReport, ToolError> {
    let case = read_test_case(path)?;
    run_case(&case)
}
