use serde::{Deserialize, Serialize};

use crate::condition::Condition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockingType {
    No,
    Yes,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValueSource {
    #[serde(rename_all = "camelCase")]
    Literal { value: String },
    #[serde(rename_all = "camelCase")]
    Variable { variable: String },
}

impl ValueSource {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    pub fn variable(variable: impl Into<String>) -> Self {
        Self::Variable {
            variable: variable.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModifyOp {
    Set,
    Increment,
    Decrement,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReturnValue {
    None,
    #[serde(rename_all = "camelCase")]
    Variable { variable: String },
    #[serde(rename_all = "camelCase")]
    Condition { condition: Condition },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalBranch {
    pub condition: Condition,
    pub blocks: Vec<ScriptBlock>,
}

/// One executable unit of a script. Containers (`If`, `While`) own nested
/// block sequences inline; the `kind` discriminator keeps the whole tree
/// round-trippable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScriptBlock {
    #[serde(rename_all = "camelCase")]
    Wait { seconds: f64 },
    #[serde(rename_all = "camelCase")]
    SetVariable {
        variable: String,
        source: ValueSource,
    },
    #[serde(rename_all = "camelCase")]
    ModifyVariable {
        variable: String,
        op: ModifyOp,
        source: ValueSource,
    },
    #[serde(rename_all = "camelCase")]
    Return { value: ReturnValue },
    #[serde(rename_all = "camelCase")]
    HotspotVisibility { hotspot: String, visible: bool },
    #[serde(rename_all = "camelCase")]
    HotspotFade {
        hotspot: String,
        alpha: f64,
        seconds: f64,
        is_blocking: bool,
    },
    #[serde(rename_all = "camelCase")]
    If {
        then: ConditionalBranch,
        #[serde(default)]
        else_if: Vec<ConditionalBranch>,
        #[serde(default, rename = "else", skip_serializing_if = "Option::is_none")]
        else_blocks: Option<Vec<ScriptBlock>>,
    },
    #[serde(rename_all = "camelCase")]
    While {
        condition: Condition,
        body: Vec<ScriptBlock>,
    },
}

impl ScriptBlock {
    /// Blocking policy per block kind, matching the engine's fixed table:
    /// waits and containers always suspend the caller, plain mutations never
    /// do, and fades defer to their per-instance flag.
    pub fn blocking_type(&self) -> BlockingType {
        match self {
            Self::Wait { .. } | Self::If { .. } | Self::While { .. } => BlockingType::Yes,
            Self::SetVariable { .. }
            | Self::ModifyVariable { .. }
            | Self::Return { .. }
            | Self::HotspotVisibility { .. } => BlockingType::No,
            Self::HotspotFade { .. } => BlockingType::Optional,
        }
    }

    pub fn is_blocking(&self) -> bool {
        match self.blocking_type() {
            BlockingType::Yes => true,
            BlockingType::No => false,
            BlockingType::Optional => match self {
                Self::HotspotFade { is_blocking, .. } => *is_blocking,
                _ => false,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub blocks: Vec<ScriptBlock>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: ScriptBlock) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
