#[cfg(test)]
mod tests {
    use super::*;
    use ae_core::{ComparisonOp, Condition, ConditionalBranch, Expression};

    fn set_literal(variable: &str, value: &str) -> ScriptBlock {
        ScriptBlock::SetVariable {
            variable: variable.to_string(),
            source: ValueSource::literal(value),
        }
    }

    fn counter_below(variable: &str, limit: &str) -> Condition {
        Condition::single(Expression::CompareLiteral {
            variable: variable.to_string(),
            op: ComparisonOp::Lt,
            value: limit.to_string(),
        })
    }

    fn increment(variable: &str, amount: &str) -> ScriptBlock {
        ScriptBlock::ModifyVariable {
            variable: variable.to_string(),
            op: ModifyOp::Increment,
            source: ValueSource::literal(amount.to_string()),
        }
    }

    fn run_to_end(script: Script, vars: &mut VariableStore) -> ScriptStep {
        let mut stage = NullStage;
        let mut exec = ScriptExec::new(script);
        loop {
            let mut ctx = ExecContext {
                vars: &mut *vars,
                stage: &mut stage,
            };
            match exec.step(&mut ctx).expect("step should pass") {
                ScriptStep::Suspended { .. } => continue,
                finished @ ScriptStep::Finished { .. } => return finished,
            }
        }
    }

    #[test]
    fn empty_script_finishes_immediately() {
        let mut vars = VariableStore::new();
        let result = run_to_end(Script::new(), &mut vars);
        assert_eq!(result, ScriptStep::Finished { return_value: None });
    }

    #[test]
    fn blocks_execute_in_list_order() {
        let mut vars = VariableStore::new();
        let mut script = Script::new();
        script.push(set_literal("X", "first"));
        script.push(set_literal("X", "second"));
        run_to_end(script, &mut vars);
        assert_eq!(vars.text("X"), "second");
    }

    #[test]
    fn blocks_after_return_never_execute() {
        let mut vars = VariableStore::new();
        vars.set_number("X", 0.0);
        let mut script = Script::new();
        script.push(set_literal("X", "1"));
        script.push(ScriptBlock::Return {
            value: ReturnValue::None,
        });
        script.push(set_literal("X", "2"));
        run_to_end(script, &mut vars);
        assert_eq!(vars.text("X"), "1");
    }

    #[test]
    fn return_aborts_every_enclosing_scope() {
        let mut vars = VariableStore::new();
        vars.set_number("N", 0.0);
        let mut script = Script::new();
        script.push(ScriptBlock::While {
            condition: counter_below("N", "10"),
            body: vec![
                increment("N", "1"),
                ScriptBlock::If {
                    then: ConditionalBranch {
                        condition: counter_below("N", "3"),
                        blocks: vec![],
                    },
                    else_if: vec![],
                    else_blocks: Some(vec![ScriptBlock::Return {
                        value: ReturnValue::Variable {
                            variable: "N".to_string(),
                        },
                    }]),
                },
            ],
        });
        script.push(set_literal("AFTER", "yes"));

        let result = run_to_end(script, &mut vars);
        assert_eq!(
            result,
            ScriptStep::Finished {
                return_value: Some("3".to_string())
            }
        );
        assert_eq!(vars.number("N"), 3.0);
        assert!(!vars.has("AFTER"));
    }

    #[test]
    fn if_runs_exactly_one_branch() {
        let mut vars = VariableStore::new();
        vars.set_number("HP", 5.0);
        let branch_if = |limit: &str, marker: &str| ConditionalBranch {
            condition: counter_below("HP", limit),
            blocks: vec![set_literal("TAKEN", marker)],
        };

        // Primary true: only `then` runs.
        let mut script = Script::new();
        script.push(ScriptBlock::If {
            then: branch_if("10", "then"),
            else_if: vec![branch_if("100", "elseif")],
            else_blocks: Some(vec![set_literal("TAKEN", "else")]),
        });
        run_to_end(script, &mut vars);
        assert_eq!(vars.text("TAKEN"), "then");

        // Primary false, first matching else-if runs.
        vars.remove("TAKEN");
        let mut script = Script::new();
        script.push(ScriptBlock::If {
            then: branch_if("1", "then"),
            else_if: vec![branch_if("2", "elseif0"), branch_if("100", "elseif1")],
            else_blocks: Some(vec![set_literal("TAKEN", "else")]),
        });
        run_to_end(script, &mut vars);
        assert_eq!(vars.text("TAKEN"), "elseif1");

        // Nothing matches and no else: sequence continues after the container.
        vars.remove("TAKEN");
        let mut script = Script::new();
        script.push(ScriptBlock::If {
            then: branch_if("1", "then"),
            else_if: vec![branch_if("2", "elseif")],
            else_blocks: None,
        });
        script.push(set_literal("AFTER", "yes"));
        run_to_end(script, &mut vars);
        assert!(!vars.has("TAKEN"));
        assert_eq!(vars.text("AFTER"), "yes");
    }

    #[test]
    fn while_loops_until_condition_fails() {
        let mut vars = VariableStore::new();
        vars.set_number("COUNTER", 0.0);
        let mut script = Script::new();
        script.push(ScriptBlock::While {
            condition: counter_below("COUNTER", "3"),
            body: vec![increment("COUNTER", "1")],
        });
        run_to_end(script, &mut vars);
        assert_eq!(vars.number("COUNTER"), 3.0);
    }

    #[test]
    fn runaway_loop_hits_the_guard() {
        let mut vars = VariableStore::new();
        vars.set_bool("FLAG", true);
        let always = Condition::single(Expression::CompareLiteral {
            variable: "FLAG".to_string(),
            op: ComparisonOp::Eq,
            value: "true".to_string(),
        });
        let mut script = Script::new();
        script.push(ScriptBlock::While {
            condition: always,
            body: vec![ScriptBlock::HotspotVisibility {
                hotspot: "door".to_string(),
                visible: true,
            }],
        });

        let mut stage = NullStage;
        let mut exec = ScriptExec::new(script);
        let mut ctx = ExecContext {
            vars: &mut vars,
            stage: &mut stage,
        };
        let error = exec.step(&mut ctx).expect_err("guard should trip");
        assert_eq!(error.code, "SCRIPT_GUARD_EXCEEDED");
    }

    #[test]
    fn wait_suspends_then_resumes_where_it_left_off() {
        let mut vars = VariableStore::new();
        let mut stage = NullStage;
        let mut script = Script::new();
        script.push(set_literal("BEFORE", "yes"));
        script.push(ScriptBlock::Wait { seconds: 1.5 });
        script.push(set_literal("AFTER", "yes"));

        let mut exec = ScriptExec::new(script);
        let mut ctx = ExecContext {
            vars: &mut vars,
            stage: &mut stage,
        };
        let first = exec.step(&mut ctx).expect("step should pass");
        assert_eq!(first, ScriptStep::Suspended { seconds: 1.5 });
        assert_eq!(ctx.vars.text("BEFORE"), "yes");
        assert!(!ctx.vars.has("AFTER"));

        let second = exec.step(&mut ctx).expect("step should pass");
        assert_eq!(second, ScriptStep::Finished { return_value: None });
        assert_eq!(ctx.vars.text("AFTER"), "yes");
        assert!(exec.is_finished());
    }

    #[test]
    fn zero_second_wait_does_not_suspend() {
        let mut vars = VariableStore::new();
        let mut script = Script::new();
        script.push(ScriptBlock::Wait { seconds: 0.0 });
        script.push(set_literal("DONE", "yes"));
        let result = run_to_end(script, &mut vars);
        assert_eq!(result, ScriptStep::Finished { return_value: None });
        assert_eq!(vars.text("DONE"), "yes");
    }

    #[test]
    fn hotspot_effects_reach_the_stage() {
        let mut vars = VariableStore::new();
        let mut stage = RecordingStage::default();
        let mut script = Script::new();
        script.push(ScriptBlock::HotspotVisibility {
            hotspot: "door".to_string(),
            visible: false,
        });
        script.push(ScriptBlock::HotspotFade {
            hotspot: "door".to_string(),
            alpha: 0.5,
            seconds: 2.0,
            is_blocking: false,
        });

        let mut exec = ScriptExec::new(script);
        let mut ctx = ExecContext {
            vars: &mut vars,
            stage: &mut stage,
        };
        // Non-blocking fade: the whole script completes in one step.
        let result = exec.step(&mut ctx).expect("step should pass");
        assert_eq!(result, ScriptStep::Finished { return_value: None });
        assert_eq!(
            stage.effects,
            vec![
                StageEffect::Visibility {
                    hotspot: "door".to_string(),
                    visible: false,
                },
                StageEffect::Fade {
                    hotspot: "door".to_string(),
                    alpha: 0.5,
                    seconds: 2.0,
                },
            ]
        );
    }

    #[test]
    fn blocking_fade_suspends_for_its_duration() {
        let mut vars = VariableStore::new();
        let mut stage = RecordingStage::default();
        let mut script = Script::new();
        script.push(ScriptBlock::HotspotFade {
            hotspot: "door".to_string(),
            alpha: 0.0,
            seconds: 0.75,
            is_blocking: true,
        });

        let mut exec = ScriptExec::new(script);
        let mut ctx = ExecContext {
            vars: &mut vars,
            stage: &mut stage,
        };
        let first = exec.step(&mut ctx).expect("step should pass");
        assert_eq!(first, ScriptStep::Suspended { seconds: 0.75 });
        assert_eq!(stage.effects.len(), 1);
    }

    #[test]
    fn set_variable_copies_source_entry() {
        let mut vars = VariableStore::new();
        vars.set_number("SOURCE", 7.0);
        let mut script = Script::new();
        script.push(ScriptBlock::SetVariable {
            variable: "TARGET".to_string(),
            source: ValueSource::variable("SOURCE"),
        });
        run_to_end(script, &mut vars);
        assert_eq!(vars.number("TARGET"), 7.0);
        assert_eq!(vars.kind("TARGET"), Some(VariableKind::Number));
    }

    #[test]
    fn set_variable_literal_keeps_target_kind() {
        let mut vars = VariableStore::new();
        vars.set_number("HP", 1.0);
        let mut script = Script::new();
        script.push(set_literal("HP", "9"));
        run_to_end(script, &mut vars);
        assert_eq!(vars.kind("HP"), Some(VariableKind::Number));
        assert_eq!(vars.number("HP"), 9.0);
    }

    #[test]
    fn modify_variable_arithmetic() {
        let mut vars = VariableStore::new();
        vars.set_number("N", 10.0);
        let mut script = Script::new();
        script.push(increment("N", "5"));
        script.push(ScriptBlock::ModifyVariable {
            variable: "N".to_string(),
            op: ModifyOp::Decrement,
            source: ValueSource::literal("3"),
        });
        script.push(ScriptBlock::ModifyVariable {
            variable: "N".to_string(),
            op: ModifyOp::Multiply,
            source: ValueSource::literal("2"),
        });
        script.push(ScriptBlock::ModifyVariable {
            variable: "N".to_string(),
            op: ModifyOp::Divide,
            source: ValueSource::literal("4"),
        });
        run_to_end(script, &mut vars);
        assert_eq!(vars.number("N"), 6.0);
    }

    #[test]
    fn modify_missing_variable_starts_from_zero() {
        let mut vars = VariableStore::new();
        let mut script = Script::new();
        script.push(increment("FRESH", "4"));
        run_to_end(script, &mut vars);
        assert_eq!(vars.number("FRESH"), 4.0);
    }

    #[test]
    fn non_numeric_operand_fails_the_step() {
        let mut vars = VariableStore::new();
        vars.set_text("NAME", "Ada");
        let mut stage = NullStage;
        let mut script = Script::new();
        script.push(increment("NAME", "1"));

        let mut exec = ScriptExec::new(script);
        let mut ctx = ExecContext {
            vars: &mut vars,
            stage: &mut stage,
        };
        let error = exec.step(&mut ctx).expect_err("arithmetic should fail");
        assert_eq!(error.code, "SCRIPT_ARITHMETIC");
    }

    #[test]
    fn divide_by_zero_fails_the_step() {
        let mut vars = VariableStore::new();
        vars.set_number("N", 8.0);
        let mut stage = NullStage;
        let mut script = Script::new();
        script.push(ScriptBlock::ModifyVariable {
            variable: "N".to_string(),
            op: ModifyOp::Divide,
            source: ValueSource::literal("0"),
        });

        let mut exec = ScriptExec::new(script);
        let mut ctx = ExecContext {
            vars: &mut vars,
            stage: &mut stage,
        };
        let error = exec.step(&mut ctx).expect_err("division should fail");
        assert_eq!(error.code, "SCRIPT_DIVIDE_BY_ZERO");
        assert_eq!(ctx.vars.number("N"), 8.0);
    }

    #[test]
    fn return_variable_and_condition_values() {
        let mut vars = VariableStore::new();
        vars.set_number("GOLD", 30.0);

        let mut script = Script::new();
        script.push(ScriptBlock::Return {
            value: ReturnValue::Variable {
                variable: "GOLD".to_string(),
            },
        });
        assert_eq!(
            run_to_end(script, &mut vars),
            ScriptStep::Finished {
                return_value: Some("30".to_string())
            }
        );

        let mut script = Script::new();
        script.push(ScriptBlock::Return {
            value: ReturnValue::Condition {
                condition: counter_below("GOLD", "100"),
            },
        });
        assert_eq!(
            run_to_end(script, &mut vars),
            ScriptStep::Finished {
                return_value: Some("true".to_string())
            }
        );
    }

    #[test]
    fn nested_while_inside_if_resumes_correctly() {
        let mut vars = VariableStore::new();
        vars.set_number("N", 0.0);
        vars.set_bool("GO", true);
        let mut script = Script::new();
        script.push(ScriptBlock::If {
            then: ConditionalBranch {
                condition: Condition::single(Expression::CompareLiteral {
                    variable: "GO".to_string(),
                    op: ComparisonOp::Eq,
                    value: "true".to_string(),
                }),
                blocks: vec![ScriptBlock::While {
                    condition: counter_below("N", "2"),
                    body: vec![increment("N", "1"), ScriptBlock::Wait { seconds: 0.25 }],
                }],
            },
            else_if: vec![],
            else_blocks: None,
        });
        script.push(set_literal("DONE", "yes"));

        let mut stage = NullStage;
        let mut exec = ScriptExec::new(script);
        let mut suspensions = 0usize;
        loop {
            let mut ctx = ExecContext {
                vars: &mut vars,
                stage: &mut stage,
            };
            match exec.step(&mut ctx).expect("step should pass") {
                ScriptStep::Suspended { .. } => suspensions += 1,
                ScriptStep::Finished { .. } => break,
            }
        }
        assert_eq!(suspensions, 2);
        assert_eq!(vars.number("N"), 2.0);
        assert_eq!(vars.text("DONE"), "yes");
    }
}
