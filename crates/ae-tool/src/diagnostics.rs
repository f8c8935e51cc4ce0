use ae_api::LoadedAssets;
use ae_core::{
    Condition, Dialog, Expression, ModifyOp, Script, ScriptBlock, ValueSource, VariableKind,
    VariableStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSource {
    Variables,
    Dialog,
}

impl DiagnosticSource {
    pub fn name(self) -> &'static str {
        match self {
            Self::Variables => "Variables",
            Self::Dialog => "Dialog",
        }
    }
}

/// One offline validation finding. Diagnostics never block saving or
/// running; the runtime falls back to defaults for everything reported
/// here except arithmetic misuse, which fails loudly when executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub source: DiagnosticSource,
    pub target: String,
    pub message: String,
}

impl Diagnostic {
    fn new(source: DiagnosticSource, target: &str, message: String) -> Self {
        Self {
            source,
            target: target.to_string(),
            message,
        }
    }
}

/// Flags entries whose encoded data does not parse as the declared kind.
pub fn validate_variables(vars: &VariableStore) -> Vec<Diagnostic> {
    let mut findings = Vec::new();
    for (key, entry) in vars.iter() {
        if !entry.parses_as_declared() {
            findings.push(Diagnostic::new(
                DiagnosticSource::Variables,
                key,
                format!(
                    "Value \"{}\" does not parse as {}.",
                    entry.data,
                    entry.kind.name()
                ),
            ));
        }
    }
    findings
}

/// Flags broken references and unspecified comparison semantics in one
/// dialog graph: missing default/target nodes, conditions against
/// undeclared variables, ordering operators on non-numeric operands, and
/// arithmetic blocks whose operands cannot be numeric.
pub fn validate_dialog(dialog: &Dialog, vars: &VariableStore) -> Vec<Diagnostic> {
    let mut findings = Vec::new();

    if !dialog.contains_node(&dialog.default_node_id) {
        findings.push(Diagnostic::new(
            DiagnosticSource::Dialog,
            &dialog.id,
            format!(
                "Default node \"{}\" is not in the graph.",
                dialog.default_node_id
            ),
        ));
    }

    for node in dialog.nodes() {
        let target = format!("{}/{}", dialog.id, node.id);

        for prompt in &node.prompts {
            if let Some(condition) = &prompt.condition {
                check_condition(&mut findings, &target, condition, vars);
            }
            if let Some(script) = &prompt.show_script {
                check_script(&mut findings, &target, script, vars);
            }
        }

        for response in &node.responses {
            if let ae_core::NextNode::Node { id } = &response.next {
                if !id.is_empty() && !dialog.contains_node(id) {
                    findings.push(Diagnostic::new(
                        DiagnosticSource::Dialog,
                        &target,
                        format!("Response \"{}\" points to missing node \"{}\".", response.text, id),
                    ));
                }
            }
            if let Some(condition) = &response.condition {
                check_condition(&mut findings, &target, condition, vars);
            }
            if let Some(script) = &response.action_script {
                check_script(&mut findings, &target, script, vars);
            }
            if let Some(script) = &response.disable_script {
                check_script(&mut findings, &target, script, vars);
            }
            if let ae_core::NextNode::Script { script } = &response.next {
                check_script(&mut findings, &target, script, vars);
            }
        }
    }

    findings
}

pub fn validate_assets(assets: &LoadedAssets) -> Vec<Diagnostic> {
    let mut findings = validate_variables(&assets.variables);
    for dialog in assets.dialogs.values() {
        findings.extend(validate_dialog(dialog, &assets.variables));
    }
    findings
}

fn check_condition(
    findings: &mut Vec<Diagnostic>,
    target: &str,
    condition: &Condition,
    vars: &VariableStore,
) {
    for group in &condition.groups {
        for expression in &group.expressions {
            let (left, op, right_var) = match expression {
                Expression::CompareVariables { left, op, right } => {
                    (left, *op, Some(right.as_str()))
                }
                Expression::CompareLiteral { variable, op, .. } => (variable, *op, None),
            };

            if !vars.has(left) {
                findings.push(Diagnostic::new(
                    DiagnosticSource::Dialog,
                    target,
                    format!("Condition references undeclared variable \"{}\".", left),
                ));
            }
            if let Some(right) = right_var {
                if !vars.has(right) {
                    findings.push(Diagnostic::new(
                        DiagnosticSource::Dialog,
                        target,
                        format!("Condition references undeclared variable \"{}\".", right),
                    ));
                }
            }
            if op.is_ordering() && vars.kind(left).unwrap_or(VariableKind::String) != VariableKind::Number
            {
                findings.push(Diagnostic::new(
                    DiagnosticSource::Dialog,
                    target,
                    format!(
                        "Ordering operator \"{}\" on non-numeric variable \"{}\" has no defined semantics.",
                        op.symbol(),
                        left
                    ),
                ));
            }
        }
    }
}

fn check_script(
    findings: &mut Vec<Diagnostic>,
    target: &str,
    script: &Script,
    vars: &VariableStore,
) {
    check_blocks(findings, target, &script.blocks, vars);
}

fn check_blocks(
    findings: &mut Vec<Diagnostic>,
    target: &str,
    blocks: &[ScriptBlock],
    vars: &VariableStore,
) {
    for block in blocks {
        match block {
            ScriptBlock::ModifyVariable {
                variable,
                op,
                source,
            } if *op != ModifyOp::Set => {
                if vars.kind(variable) == Some(VariableKind::String)
                    || vars.kind(variable) == Some(VariableKind::Bool)
                {
                    findings.push(Diagnostic::new(
                        DiagnosticSource::Dialog,
                        target,
                        format!(
                            "Arithmetic on non-numeric variable \"{}\" will fail at runtime.",
                            variable
                        ),
                    ));
                }
                if let ValueSource::Literal { value } = source {
                    if value.parse::<f64>().is_err() {
                        findings.push(Diagnostic::new(
                            DiagnosticSource::Dialog,
                            target,
                            format!("Arithmetic operand \"{}\" is not numeric.", value),
                        ));
                    }
                }
            }
            ScriptBlock::If {
                then,
                else_if,
                else_blocks,
            } => {
                check_condition(findings, target, &then.condition, vars);
                check_blocks(findings, target, &then.blocks, vars);
                for branch in else_if {
                    check_condition(findings, target, &branch.condition, vars);
                    check_blocks(findings, target, &branch.blocks, vars);
                }
                if let Some(blocks) = else_blocks {
                    check_blocks(findings, target, blocks, vars);
                }
            }
            ScriptBlock::While { condition, body } => {
                check_condition(findings, target, condition, vars);
                check_blocks(findings, target, body, vars);
            }
            ScriptBlock::Return { value } => {
                if let ae_core::ReturnValue::Condition { condition } = value {
                    check_condition(findings, target, condition, vars);
                }
            }
            _ => {}
        }
    }
}
