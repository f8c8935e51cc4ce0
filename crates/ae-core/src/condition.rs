use serde::{Deserialize, Serialize};

use crate::variables::{VariableKind, VariableStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }

    pub fn is_ordering(self) -> bool {
        !matches!(self, Self::Eq)
    }

    fn compare_numbers(self, left: f64, right: f64) -> bool {
        match self {
            Self::Eq => left == right,
            Self::Ge => left >= right,
            Self::Le => left <= right,
            Self::Gt => left > right,
            Self::Lt => left < right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Expression {
    #[serde(rename_all = "camelCase")]
    CompareVariables {
        left: String,
        op: ComparisonOp,
        right: String,
    },
    #[serde(rename_all = "camelCase")]
    CompareLiteral {
        variable: String,
        op: ComparisonOp,
        value: String,
    },
}

impl Expression {
    /// Comparison is keyed on the left operand's declared kind. Missing
    /// variables compare as store defaults; ordering operators on string or
    /// bool operands evaluate false and are flagged by the offline validator.
    pub fn evaluate(&self, vars: &VariableStore) -> bool {
        match self {
            Self::CompareVariables { left, op, right } => {
                let kind = vars.kind(left).unwrap_or(VariableKind::String);
                compare_raw(kind, *op, &vars.text(left), &vars.text(right))
            }
            Self::CompareLiteral {
                variable,
                op,
                value,
            } => {
                let kind = vars.kind(variable).unwrap_or(VariableKind::String);
                compare_raw(kind, *op, &vars.text(variable), value)
            }
        }
    }
}

fn compare_raw(kind: VariableKind, op: ComparisonOp, left: &str, right: &str) -> bool {
    match kind {
        VariableKind::Number => {
            let left = left.parse::<f64>().unwrap_or(0.0);
            let right = right.parse::<f64>().unwrap_or(0.0);
            op.compare_numbers(left, right)
        }
        VariableKind::String => match op {
            ComparisonOp::Eq => left == right,
            _ => false,
        },
        VariableKind::Bool => match op {
            ComparisonOp::Eq => {
                left.parse::<bool>().unwrap_or(false) == right.parse::<bool>().unwrap_or(false)
            }
            _ => false,
        },
    }
}

/// AND-list of expressions. An empty group is vacuously true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionGroup {
    pub expressions: Vec<Expression>,
}

impl ConditionGroup {
    pub fn evaluate(&self, vars: &VariableStore) -> bool {
        self.expressions.iter().all(|expr| expr.evaluate(vars))
    }
}

/// OR of AND-groups. A condition with no groups evaluates false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub groups: Vec<ConditionGroup>,
}

impl Condition {
    pub fn single(expression: Expression) -> Self {
        Self {
            groups: vec![ConditionGroup {
                expressions: vec![expression],
            }],
        }
    }

    pub fn evaluate(&self, vars: &VariableStore) -> bool {
        self.groups.iter().any(|group| group.evaluate(vars))
    }
}
