fn apply_set(vars: &mut VariableStore, target: &str, source: &ValueSource) {
    match source {
        ValueSource::Variable { variable } => {
            let entry = vars.entry(variable).cloned().unwrap_or(VariableEntry {
                kind: VariableKind::String,
                data: String::new(),
            });
            vars.set_entry(target, entry);
        }
        ValueSource::Literal { value } => {
            let kind = vars.kind(target).unwrap_or(VariableKind::String);
            vars.set(target, value, kind);
        }
    }
}

// Missing variables are tolerated as zero (reference errors fail soft);
// present-but-unparseable data is a hard arithmetic failure because writing
// a result derived from garbage would corrupt state.
fn numeric_variable(vars: &VariableStore, key: &str) -> Result<f64, AdventureError> {
    match vars.entry(key) {
        None => Ok(0.0),
        Some(entry) => entry.data.parse::<f64>().map_err(|_| {
            AdventureError::new(
                "SCRIPT_ARITHMETIC",
                format!("Variable \"{}\" is not numeric: \"{}\"", key, entry.data),
            )
        }),
    }
}

fn numeric_source(vars: &VariableStore, source: &ValueSource) -> Result<f64, AdventureError> {
    match source {
        ValueSource::Variable { variable } => numeric_variable(vars, variable),
        ValueSource::Literal { value } => value.parse::<f64>().map_err(|_| {
            AdventureError::new(
                "SCRIPT_ARITHMETIC",
                format!("Literal operand is not numeric: \"{}\"", value),
            )
        }),
    }
}

fn apply_modify(
    vars: &mut VariableStore,
    target: &str,
    op: ModifyOp,
    source: &ValueSource,
) -> Result<(), AdventureError> {
    if op == ModifyOp::Set {
        apply_set(vars, target, source);
        return Ok(());
    }

    let current = numeric_variable(vars, target)?;
    let operand = numeric_source(vars, source)?;
    let result = match op {
        ModifyOp::Set => unreachable!("handled above"),
        ModifyOp::Increment => current + operand,
        ModifyOp::Decrement => current - operand,
        ModifyOp::Multiply => current * operand,
        ModifyOp::Divide => {
            if operand == 0.0 {
                return Err(AdventureError::new(
                    "SCRIPT_DIVIDE_BY_ZERO",
                    format!("Division of \"{}\" by zero.", target),
                ));
            }
            current / operand
        }
    };
    vars.set_number(target, result);
    Ok(())
}

fn resolve_return(value: &ReturnValue, vars: &VariableStore) -> Option<String> {
    match value {
        ReturnValue::None => None,
        ReturnValue::Variable { variable } => Some(vars.text(variable)),
        ReturnValue::Condition { condition } => Some(
            if condition.evaluate(vars) {
                "true"
            } else {
                "false"
            }
            .to_string(),
        ),
    }
}
