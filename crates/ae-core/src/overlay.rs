use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMarks {
    pub used: bool,
    pub entered: bool,
}

/// Presentation-side bookkeeping (visited nodes, expanded containers) keyed
/// by entity id. Owned by the collaborator rendering the session; the core
/// graph and script trees carry no transient editor state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresentationOverlay {
    marks: BTreeMap<String, EntityMarks>,
}

impl PresentationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_used(&mut self, id: &str) {
        self.marks.entry(id.to_string()).or_default().used = true;
    }

    pub fn mark_entered(&mut self, id: &str) {
        self.marks.entry(id.to_string()).or_default().entered = true;
    }

    pub fn is_used(&self, id: &str) -> bool {
        self.marks.get(id).map(|marks| marks.used).unwrap_or(false)
    }

    pub fn is_entered(&self, id: &str) -> bool {
        self.marks
            .get(id)
            .map(|marks| marks.entered)
            .unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}
