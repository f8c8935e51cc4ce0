pub const SESSION_SNAPSHOT_SCHEMA: &str = "dialog-session.v1";

/// Serialized resume point for a session parked at a response boundary.
/// Mid-script state is never captured; real-time gaps live in the dispatch
/// history instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub schema_version: String,
    pub dialog_id: String,
    pub node_id: String,
    pub rng_state: u32,
    pub prompt_index: Option<usize>,
    pub response_indices: Vec<usize>,
}

impl DialogSession {
    pub fn snapshot(&self) -> Result<SessionSnapshot, AdventureError> {
        if self.closed || self.pending.is_some() {
            return Err(AdventureError::new(
                "SNAPSHOT_NOT_ALLOWED",
                "snapshot() is only allowed while waiting for a response.",
            ));
        }
        let cursor = self.cursor.as_ref().ok_or_else(|| {
            AdventureError::new(
                "SNAPSHOT_NOT_ALLOWED",
                "snapshot() is only allowed while waiting for a response.",
            )
        })?;

        Ok(SessionSnapshot {
            schema_version: SESSION_SNAPSHOT_SCHEMA.to_string(),
            dialog_id: self.dialog.id.clone(),
            node_id: cursor.node_id.clone(),
            rng_state: self.rng_state,
            prompt_index: cursor.prompt,
            response_indices: cursor.responses.clone(),
        })
    }

    pub fn resume(dialog: Dialog, snapshot: SessionSnapshot) -> Result<Self, AdventureError> {
        if snapshot.schema_version != SESSION_SNAPSHOT_SCHEMA {
            return Err(AdventureError::new(
                "SNAPSHOT_SCHEMA",
                format!(
                    "Unsupported snapshot schema \"{}\".",
                    snapshot.schema_version
                ),
            ));
        }
        if snapshot.dialog_id != dialog.id {
            return Err(AdventureError::new(
                "SNAPSHOT_DIALOG_MISMATCH",
                format!(
                    "Snapshot belongs to dialog \"{}\", not \"{}\".",
                    snapshot.dialog_id, dialog.id
                ),
            ));
        }
        let Some(node) = dialog.node(&snapshot.node_id) else {
            return Err(AdventureError::new(
                "SNAPSHOT_NODE_MISSING",
                format!("Snapshot node \"{}\" is not in the graph.", snapshot.node_id),
            ));
        };
        if let Some(prompt_index) = snapshot.prompt_index {
            if prompt_index >= node.prompts.len() {
                return Err(AdventureError::new(
                    "SNAPSHOT_CURSOR_INVALID",
                    "Snapshot prompt index is out of range.",
                ));
            }
        }
        if snapshot
            .response_indices
            .iter()
            .any(|&index| index >= node.responses.len())
        {
            return Err(AdventureError::new(
                "SNAPSHOT_CURSOR_INVALID",
                "Snapshot response index is out of range.",
            ));
        }

        let cursor = NodeCursor {
            node_id: node.id.clone(),
            prompt: snapshot.prompt_index,
            responses: snapshot.response_indices,
        };
        Ok(Self {
            dialog,
            rng_state: snapshot.rng_state,
            cursor: Some(cursor),
            pending: None,
            closed: false,
            on_node_change: None,
        })
    }
}
