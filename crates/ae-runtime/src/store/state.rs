use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use ae_core::{AdventureError, Dialog, EngineCommand, PresentationOverlay, VariableStore};

use crate::clock::{Clock, SystemClock};
use crate::dialog::{DialogOutput, DialogSession, DialogSessionOptions, NodeView};
use crate::script::{ExecContext, NullStage, Stage};

/// The one shared state object every command runs against: the variable
/// store, the dialog registry, and the session currently playing.
/// Constructed once at startup and threaded through the store explicitly.
pub struct EngineState {
    pub variables: VariableStore,
    pub dialogs: BTreeMap<String, Dialog>,
    pub session: Option<DialogSession>,
    pub overlay: PresentationOverlay,
}

impl EngineState {
    pub fn new(variables: VariableStore, dialogs: BTreeMap<String, Dialog>) -> Self {
        Self {
            variables,
            dialogs,
            session: None,
            overlay: PresentationOverlay::new(),
        }
    }

    pub fn register_dialog(&mut self, dialog: Dialog) {
        self.dialogs.insert(dialog.id.clone(), dialog);
    }
}
