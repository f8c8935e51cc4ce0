use std::collections::BTreeMap;
use std::rc::Rc;

use ae_core::{AdventureError, Dialog, VariableStore};
use ae_runtime::{Clock, EngineStore, Stage, StoreOptions};

pub const VARS_SUFFIX: &str = ".vars.json";
pub const DIALOG_SUFFIX: &str = ".dialog.json";

/// Parsed asset bundle: one merged variable store plus the dialog registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedAssets {
    pub variables: VariableStore,
    pub dialogs: BTreeMap<String, Dialog>,
}

/// Loads assets from a path-keyed map of file contents. `*.vars.json`
/// documents merge into the variable store (later files win per key);
/// `*.dialog.json` documents register dialogs by their embedded id. Other
/// paths are ignored so bundles can carry sidecar files.
pub fn load_assets_from_map(
    files: &BTreeMap<String, String>,
) -> Result<LoadedAssets, AdventureError> {
    let mut assets = LoadedAssets::default();
    let mut recognized = 0usize;

    for (path, content) in files {
        if path.ends_with(VARS_SUFFIX) {
            recognized += 1;
            let store = VariableStore::deserialize(content).map_err(|error| {
                AdventureError::new(
                    "ASSET_VARIABLES_INVALID",
                    format!("{}: {}", path, error.message),
                )
            })?;
            for (key, entry) in store.iter() {
                assets.variables.set_entry(key, entry.clone());
            }
        } else if path.ends_with(DIALOG_SUFFIX) {
            recognized += 1;
            let dialog = Dialog::from_json(content).map_err(|error| {
                AdventureError::new(
                    "ASSET_DIALOG_INVALID",
                    format!("{}: {}", path, error.message),
                )
            })?;
            if assets.dialogs.contains_key(&dialog.id) {
                return Err(AdventureError::new(
                    "ASSET_DIALOG_DUPLICATE",
                    format!("Dialog id \"{}\" is declared twice.", dialog.id),
                ));
            }
            assets.dialogs.insert(dialog.id.clone(), dialog);
        }
    }

    if recognized == 0 {
        return Err(AdventureError::new(
            "ASSET_BUNDLE_EMPTY",
            format!(
                "No {}/{} files in the bundle.",
                VARS_SUFFIX, DIALOG_SUFFIX
            ),
        ));
    }

    Ok(assets)
}

#[derive(Default)]
pub struct CreateStoreOptions {
    pub stage: Option<Box<dyn Stage>>,
    pub clock: Option<Rc<dyn Clock>>,
    pub track_history: bool,
    pub random_seed: Option<u32>,
}

/// Builds a ready dispatch store over a loaded bundle.
pub fn create_store(assets: LoadedAssets, options: CreateStoreOptions) -> EngineStore {
    EngineStore::new(StoreOptions {
        variables: assets.variables,
        dialogs: assets.dialogs,
        stage: options.stage,
        clock: options.clock,
        track_history: options.track_history,
        random_seed: options.random_seed,
    })
}

/// Replays a recorded command log against a store with tracking disabled.
pub fn replay_history(store: &mut EngineStore, lines: &[String]) -> Result<(), AdventureError> {
    store.replay(lines)
}
