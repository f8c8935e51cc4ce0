use serde::{Deserialize, Serialize};

use ae_core::{AdventureError, Dialog, DialogNode, NextNode, VariableStore};

use crate::rng::rng_bounded;
use crate::script::{ExecContext, ScriptExec, ScriptStep};
use crate::text::render_text;

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseView {
    pub index: usize,
    pub text: String,
}

/// Everything the presentation layer needs to draw the current node: the
/// selected prompt (already interpolated) and the filtered responses.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub node_id: String,
    pub speaker: Option<String>,
    pub mood: Option<String>,
    pub prompt_text: Option<String>,
    pub responses: Vec<ResponseView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutput {
    /// A node is current and the session is waiting for `choose`.
    Line(NodeView),
    /// A blocking script effect is in flight; call `next` again after the
    /// duration elapses.
    Suspended { seconds: f64 },
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
struct NodeCursor {
    node_id: String,
    prompt: Option<usize>,
    responses: Vec<usize>,
}

enum PendingWork {
    Enter { node_id: String },
    PromptShow { exec: ScriptExec },
    ResponseAction { exec: Option<ScriptExec>, next: NextNode },
    NextNodeScript { exec: ScriptExec },
}

#[derive(Debug, Clone, Default)]
pub struct DialogSessionOptions {
    pub random_seed: Option<u32>,
}

/// One play-through of a dialog graph. The session owns its own copy of the
/// graph plus the transient cursors; authored dialogs stay untouched in the
/// registry. State machine: Closed -> Open(node) -> ... -> Closed.
pub struct DialogSession {
    dialog: Dialog,
    rng_state: u32,
    cursor: Option<NodeCursor>,
    pending: Option<PendingWork>,
    closed: bool,
    on_node_change: Option<Box<dyn FnMut(&NodeView)>>,
}

impl DialogSession {
    pub fn new(dialog: Dialog, options: DialogSessionOptions) -> Self {
        Self {
            dialog,
            rng_state: options.random_seed.unwrap_or(1),
            cursor: None,
            pending: None,
            closed: false,
            on_node_change: None,
        }
    }

    /// Queues entry into `start_node` (or the graph's default node). Drive
    /// with `next` afterwards.
    pub fn begin(&mut self, start_node: Option<&str>) {
        let node_id = start_node
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.dialog.default_node_id)
            .to_string();
        self.pending = Some(PendingWork::Enter { node_id });
    }

    pub fn set_node_change_handler(&mut self, handler: Box<dyn FnMut(&NodeView)>) {
        self.on_node_change = Some(handler);
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn current_node_id(&self) -> Option<&str> {
        self.cursor.as_ref().map(|cursor| cursor.node_id.as_str())
    }

    /// The current node rendered against `vars`, if the session is at a
    /// response boundary.
    pub fn current_view(&self, vars: &VariableStore) -> Option<NodeView> {
        let cursor = self.cursor.as_ref()?;
        let node = self.dialog.node(&cursor.node_id)?;
        Some(build_view(node, cursor, vars))
    }

    fn close_internal(&mut self) {
        self.cursor = None;
        self.pending = None;
        self.closed = true;
    }
}

impl std::fmt::Debug for DialogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogSession")
            .field("rng_state", &self.rng_state)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

fn build_view(node: &DialogNode, cursor: &NodeCursor, vars: &VariableStore) -> NodeView {
    let prompt = cursor.prompt.and_then(|index| node.prompts.get(index));
    NodeView {
        node_id: cursor.node_id.clone(),
        speaker: prompt.and_then(|prompt| prompt.speaker.clone()),
        mood: prompt.and_then(|prompt| prompt.mood.clone()),
        prompt_text: prompt.map(|prompt| render_text(&prompt.text, vars)),
        responses: cursor
            .responses
            .iter()
            .enumerate()
            .filter_map(|(position, &response_index)| {
                node.responses.get(response_index).map(|response| ResponseView {
                    index: position,
                    text: render_text(&response.text, vars),
                })
            })
            .collect(),
    }
}
