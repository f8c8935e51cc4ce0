use serde::{Deserialize, Serialize};

use crate::error::AdventureError;
use crate::variables::VariableKind;

/// Closed set of dispatchable commands. Each serializes to a single JSON
/// document with a `kind` discriminator, one document per history line, so
/// logs stay hand-editable and replayable from plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EngineCommand {
    #[serde(rename_all = "camelCase")]
    SetVariable {
        id: String,
        value: String,
        var_kind: VariableKind,
    },
    /// Replaces the whole variable store from a serialized variable set.
    #[serde(rename_all = "camelCase")]
    LoadVariables { payload: String },
    #[serde(rename_all = "camelCase")]
    OpenDialog {
        dialog: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_node: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SelectResponse { index: usize },
    CloseDialog,
    #[serde(rename_all = "camelCase")]
    Wait { seconds: f64 },
    /// Synthetic history entry capturing the wall-clock gap between enqueues;
    /// never dispatched by callers directly.
    #[serde(rename_all = "camelCase")]
    InternalWait { seconds: f64 },
}

impl EngineCommand {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::SetVariable { .. } => "setVariable",
            Self::LoadVariables { .. } => "loadVariables",
            Self::OpenDialog { .. } => "openDialog",
            Self::SelectResponse { .. } => "selectResponse",
            Self::CloseDialog => "closeDialog",
            Self::Wait { .. } => "wait",
            Self::InternalWait { .. } => "internalWait",
        }
    }

    pub fn encode_line(&self) -> String {
        serde_json::to_string(self).expect("command should serialize")
    }

    pub fn decode_line(line: &str) -> Result<Self, AdventureError> {
        serde_json::from_str(line.trim()).map_err(|error| {
            AdventureError::new(
                "COMMAND_DECODE",
                format!("History line is not a valid command: {}", error),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_round_trip_through_lines() {
        let commands = vec![
            EngineCommand::SetVariable {
                id: "GOLD".to_string(),
                value: "5".to_string(),
                var_kind: VariableKind::Number,
            },
            EngineCommand::OpenDialog {
                dialog: "intro".to_string(),
                start_node: None,
            },
            EngineCommand::SelectResponse { index: 1 },
            EngineCommand::CloseDialog,
            EngineCommand::InternalWait { seconds: 0.25 },
        ];

        for command in commands {
            let line = command.encode_line();
            let decoded = EngineCommand::decode_line(&line).expect("line should decode");
            assert_eq!(decoded, command);
        }
    }

    #[test]
    fn encoded_lines_carry_kind_discriminator() {
        let line = EngineCommand::SelectResponse { index: 0 }.encode_line();
        assert!(line.contains("\"kind\":\"selectResponse\""));
    }

    #[test]
    fn decode_tolerates_surrounding_whitespace() {
        let decoded = EngineCommand::decode_line("  {\"kind\":\"closeDialog\"}\n")
            .expect("line should decode");
        assert_eq!(decoded, EngineCommand::CloseDialog);
    }

    #[test]
    fn decode_reports_malformed_lines() {
        let error = EngineCommand::decode_line("{\"kind\":\"unknown\"}")
            .expect_err("unknown kind should fail");
        assert_eq!(error.code, "COMMAND_DECODE");
    }
}
