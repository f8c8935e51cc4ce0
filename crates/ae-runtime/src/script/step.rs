impl ScriptExec {
    pub fn step(&mut self, ctx: &mut ExecContext<'_>) -> Result<ScriptStep, AdventureError> {
        if self.finished {
            return Ok(ScriptStep::Finished {
                return_value: self.return_value.clone(),
            });
        }

        let mut guard = 0usize;
        while guard < STEP_GUARD {
            guard += 1;

            let Some(top) = self.frames.last().cloned() else {
                self.finished = true;
                return Ok(ScriptStep::Finished {
                    return_value: self.return_value.clone(),
                });
            };

            let blocks = self.resolve_segment(&top.segment)?;
            if top.index >= blocks.len() {
                self.frames.pop();
                continue;
            }

            let block = blocks[top.index].clone();
            match block {
                ScriptBlock::Wait { seconds } => {
                    self.bump_top();
                    if seconds > 0.0 {
                        return Ok(ScriptStep::Suspended { seconds });
                    }
                }
                ScriptBlock::SetVariable { variable, source } => {
                    apply_set(ctx.vars, &variable, &source);
                    self.bump_top();
                }
                ScriptBlock::ModifyVariable {
                    variable,
                    op,
                    source,
                } => {
                    apply_modify(ctx.vars, &variable, op, &source)?;
                    self.bump_top();
                }
                ScriptBlock::Return { value } => {
                    self.return_value = resolve_return(&value, ctx.vars);
                    // Dropping every frame aborts the remaining siblings in
                    // all enclosing scopes, loops included.
                    self.frames.clear();
                }
                ScriptBlock::HotspotVisibility { hotspot, visible } => {
                    ctx.stage.set_hotspot_visible(&hotspot, visible);
                    self.bump_top();
                }
                ScriptBlock::HotspotFade {
                    hotspot,
                    alpha,
                    seconds,
                    is_blocking,
                } => {
                    ctx.stage.fade_hotspot(&hotspot, alpha, seconds);
                    self.bump_top();
                    if is_blocking && seconds > 0.0 {
                        return Ok(ScriptStep::Suspended { seconds });
                    }
                }
                ScriptBlock::If {
                    then,
                    else_if,
                    else_blocks,
                } => {
                    self.bump_top();
                    let branch = if then.condition.evaluate(ctx.vars) {
                        Some(Branch::Then)
                    } else if let Some(index) = else_if
                        .iter()
                        .position(|candidate| candidate.condition.evaluate(ctx.vars))
                    {
                        Some(Branch::ElseIf(index))
                    } else if else_blocks.is_some() {
                        Some(Branch::Else)
                    } else {
                        None
                    };
                    if let Some(branch) = branch {
                        self.push_branch_frame(&top.segment, top.index, branch);
                    }
                }
                ScriptBlock::While { condition, .. } => {
                    if condition.evaluate(ctx.vars) {
                        self.push_branch_frame(&top.segment, top.index, Branch::Body);
                    } else {
                        self.bump_top();
                    }
                }
            }
        }

        Err(AdventureError::new(
            "SCRIPT_GUARD_EXCEEDED",
            format!("Execution guard exceeded {} iterations.", STEP_GUARD),
        ))
    }
}
