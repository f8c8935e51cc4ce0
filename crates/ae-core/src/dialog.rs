use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::error::AdventureError;
use crate::script::Script;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_script: Option<Script>,
}

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            speaker: None,
            mood: None,
            text: text.into(),
            condition: None,
            show_script: None,
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_show_script(mut self, script: Script) -> Self {
        self.show_script = Some(script);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NextNode {
    #[serde(rename_all = "camelCase")]
    Node { id: String },
    End,
    #[serde(rename_all = "camelCase")]
    Script { script: Script },
}

impl NextNode {
    pub fn node(id: impl Into<String>) -> Self {
        Self::Node { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_script: Option<Script>,
    /// Authored hook for presentation layers that grey out gated responses.
    /// The session itself never runs it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_script: Option<Script>,
    pub next: NextNode,
}

impl Response {
    pub fn new(text: impl Into<String>, next: NextNode) -> Self {
        Self {
            text: text.into(),
            condition: None,
            action_script: None,
            disable_script: None,
            next,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_action_script(mut self, script: Script) -> Self {
        self.action_script = Some(script);
        self
    }

    pub fn with_disable_script(mut self, script: Script) -> Self {
        self.disable_script = Some(script);
        self
    }
}

fn default_pick_count() -> i64 {
    -1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogNode {
    pub id: String,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub responses: Vec<Response>,
    #[serde(default)]
    pub pick_random_valid_prompt: bool,
    /// -1 keeps every passing response; >= 0 randomly down-samples to that
    /// many.
    #[serde(default = "default_pick_count")]
    pub pick_random_response_count: i64,
}

impl DialogNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompts: Vec::new(),
            responses: Vec::new(),
            pick_random_valid_prompt: false,
            pick_random_response_count: -1,
        }
    }

    pub fn add_prompt(&mut self, prompt: Prompt) -> &mut Self {
        self.prompts.push(prompt);
        self
    }

    pub fn add_response(&mut self, response: Response) -> &mut Self {
        self.responses.push(response);
        self
    }

    pub fn pick_random_valid_prompt(&mut self) -> &mut Self {
        self.pick_random_valid_prompt = true;
        self
    }

    pub fn pick_random_responses(&mut self, count: i64) -> &mut Self {
        self.pick_random_response_count = count;
        self
    }
}

fn fold_node_id(id: &str) -> String {
    id.to_uppercase()
}

/// Directed graph of dialog nodes keyed by upper-cased id. Iteration is
/// stable (BTreeMap order) so exports round-trip deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialog {
    pub id: String,
    pub default_node_id: String,
    #[serde(default)]
    nodes: BTreeMap<String, DialogNode>,
    #[serde(default)]
    unique_nodes: u64,
}

impl Dialog {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            default_node_id: String::new(),
            nodes: BTreeMap::new(),
            unique_nodes: 0,
        }
    }

    pub fn unique_id(&mut self) -> String {
        let id = format!("n{}", self.unique_nodes);
        self.unique_nodes += 1;
        id
    }

    pub fn create_node(&mut self, id: &str) -> &mut DialogNode {
        let key = fold_node_id(id);
        self.nodes.insert(key.clone(), DialogNode::new(id));
        self.nodes
            .get_mut(&key)
            .expect("node inserted just above should exist")
    }

    pub fn add_node(&mut self, node: DialogNode) {
        self.nodes.insert(fold_node_id(&node.id), node);
    }

    pub fn remove_node(&mut self, id: &str) {
        self.nodes.remove(&fold_node_id(id));
    }

    pub fn node(&self, id: &str) -> Option<&DialogNode> {
        self.nodes.get(&fold_node_id(id))
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut DialogNode> {
        self.nodes.get_mut(&fold_node_id(id))
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(&fold_node_id(id))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DialogNode> {
        self.nodes.values()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("dialog should serialize")
    }

    pub fn from_json(text: &str) -> Result<Self, AdventureError> {
        let mut dialog: Self = serde_json::from_str(text).map_err(|error| {
            AdventureError::new(
                "DIALOG_PARSE",
                format!("Dialog document is not valid JSON: {}", error),
            )
        })?;
        // Hand-authored documents may key the node map however they like;
        // the embedded node id is authoritative.
        let nodes = std::mem::take(&mut dialog.nodes);
        for (_, node) in nodes {
            dialog.nodes.insert(fold_node_id(&node.id), node);
        }
        Ok(dialog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_dialog() -> Dialog {
        let mut dialog = Dialog::new("intro");
        dialog.default_node_id = "start".to_string();
        dialog
            .create_node("start")
            .add_prompt(Prompt::new("Hello.").with_speaker("guard"))
            .add_response(Response::new("Bye.", NextNode::End))
            .add_response(Response::new("Onward.", NextNode::node("next")));
        dialog
            .create_node("next")
            .add_prompt(Prompt::new("You again."));
        dialog
    }

    #[test]
    fn node_ids_fold_case() {
        let dialog = two_node_dialog();
        assert!(dialog.contains_node("START"));
        assert!(dialog.contains_node("Start"));
        assert_eq!(
            dialog.node("start").map(|node| node.id.as_str()),
            dialog.node("START").map(|node| node.id.as_str()),
        );
    }

    #[test]
    fn create_node_replaces_case_colliding_node() {
        let mut dialog = Dialog::new("d");
        dialog.create_node("a").add_prompt(Prompt::new("one"));
        dialog.create_node("A");
        assert_eq!(dialog.num_nodes(), 1);
        assert!(dialog
            .node("a")
            .expect("node should exist")
            .prompts
            .is_empty());
    }

    #[test]
    fn unique_ids_count_up() {
        let mut dialog = Dialog::new("d");
        assert_eq!(dialog.unique_id(), "n0");
        assert_eq!(dialog.unique_id(), "n1");
    }

    #[test]
    fn json_round_trip_preserves_graph() {
        let dialog = two_node_dialog();
        let encoded = dialog.to_json();
        let decoded = Dialog::from_json(&encoded).expect("dialog should parse");
        assert_eq!(decoded, dialog);
        assert_eq!(decoded.to_json(), encoded);
    }

    #[test]
    fn from_json_rekeys_nodes_by_embedded_id() {
        let document = r#"{
            "id": "d",
            "defaultNodeId": "start",
            "nodes": {
                "start": {
                    "id": "start",
                    "prompts": [{ "text": "Hi" }],
                    "responses": [{ "text": "Bye", "next": { "kind": "end" } }]
                }
            }
        }"#;
        let dialog = Dialog::from_json(document).expect("dialog should parse");
        assert!(dialog.contains_node("START"));
        assert_eq!(
            dialog
                .node("start")
                .expect("node should exist")
                .pick_random_response_count,
            -1
        );
    }

    #[test]
    fn from_json_reports_parse_errors() {
        let error = Dialog::from_json("{").expect_err("parse should fail");
        assert_eq!(error.code, "DIALOG_PARSE");
    }

    #[test]
    fn node_iteration_is_stable() {
        let mut dialog = Dialog::new("d");
        dialog.create_node("b");
        dialog.create_node("a");
        dialog.create_node("c");
        let ids: Vec<&str> = dialog.nodes().map(|node| node.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_node_accepts_any_casing() {
        let mut dialog = two_node_dialog();
        dialog.remove_node("NEXT");
        assert!(!dialog.contains_node("next"));
        assert_eq!(dialog.num_nodes(), 1);
    }
}
