const TRANSITION_GUARD: usize = 1_000;

impl DialogSession {
    /// Drives pending work (node entry, show/action/next-node scripts) to the
    /// next boundary. While a node is current and nothing is pending, the
    /// call echoes the current line.
    pub fn next(&mut self, ctx: &mut ExecContext<'_>) -> Result<DialogOutput, AdventureError> {
        if self.closed {
            return Ok(DialogOutput::Closed);
        }

        let mut guard = 0usize;
        while guard < TRANSITION_GUARD {
            guard += 1;

            match self.pending.take() {
                None => {
                    let Some(view) = self.current_view(ctx.vars) else {
                        self.close_internal();
                        return Ok(DialogOutput::Closed);
                    };
                    return Ok(DialogOutput::Line(view));
                }
                Some(PendingWork::Enter { node_id }) => {
                    if !self.dialog.contains_node(&node_id) {
                        tracing::warn!(
                            dialog = %self.dialog.id,
                            node = %node_id,
                            "transition target missing, closing dialog"
                        );
                        self.close_internal();
                        return Ok(DialogOutput::Closed);
                    }
                    tracing::debug!(dialog = %self.dialog.id, node = %node_id, "entering node");

                    let node = self
                        .dialog
                        .node(&node_id)
                        .expect("node presence checked just above")
                        .clone();
                    let prompt = self.select_prompt(&node, ctx.vars);
                    let responses = self.select_responses(&node, ctx.vars);
                    self.cursor = Some(NodeCursor {
                        node_id: node.id.clone(),
                        prompt,
                        responses,
                    });

                    let show_script = prompt
                        .and_then(|index| node.prompts.get(index))
                        .and_then(|prompt| prompt.show_script.clone());
                    if let Some(script) = show_script {
                        self.pending = Some(PendingWork::PromptShow {
                            exec: ScriptExec::new(script),
                        });
                        continue;
                    }
                    self.notify_node_changed(ctx.vars);
                }
                Some(PendingWork::PromptShow { mut exec }) => match exec.step(ctx)? {
                    ScriptStep::Suspended { seconds } => {
                        self.pending = Some(PendingWork::PromptShow { exec });
                        return Ok(DialogOutput::Suspended { seconds });
                    }
                    ScriptStep::Finished { .. } => {
                        self.notify_node_changed(ctx.vars);
                    }
                },
                Some(PendingWork::ResponseAction { exec, next }) => {
                    if let Some(mut exec) = exec {
                        match exec.step(ctx)? {
                            ScriptStep::Suspended { seconds } => {
                                self.pending = Some(PendingWork::ResponseAction {
                                    exec: Some(exec),
                                    next,
                                });
                                return Ok(DialogOutput::Suspended { seconds });
                            }
                            ScriptStep::Finished { .. } => {}
                        }
                    }
                    match next {
                        NextNode::Node { id } if !id.is_empty() => {
                            self.pending = Some(PendingWork::Enter { node_id: id });
                        }
                        NextNode::Node { .. } | NextNode::End => {
                            self.close_internal();
                            return Ok(DialogOutput::Closed);
                        }
                        NextNode::Script { script } => {
                            self.pending = Some(PendingWork::NextNodeScript {
                                exec: ScriptExec::new(script),
                            });
                        }
                    }
                }
                Some(PendingWork::NextNodeScript { mut exec }) => match exec.step(ctx)? {
                    ScriptStep::Suspended { seconds } => {
                        self.pending = Some(PendingWork::NextNodeScript { exec });
                        return Ok(DialogOutput::Suspended { seconds });
                    }
                    ScriptStep::Finished { return_value } => {
                        match return_value.filter(|value| !value.is_empty()) {
                            Some(node_id) => {
                                self.pending = Some(PendingWork::Enter { node_id });
                            }
                            None => {
                                self.close_internal();
                                return Ok(DialogOutput::Closed);
                            }
                        }
                    }
                },
            }
        }

        Err(AdventureError::new(
            "DIALOG_GUARD_EXCEEDED",
            format!("Transition guard exceeded {} iterations.", TRANSITION_GUARD),
        ))
    }

    /// Selects a response by its position in the *filtered* list shown to
    /// the player, queueing its action and transition for `next` to drive.
    pub fn choose(&mut self, index: usize) -> Result<(), AdventureError> {
        if self.closed {
            return Err(AdventureError::new(
                "DIALOG_CLOSED",
                "Session is already closed.",
            ));
        }
        if self.pending.is_some() {
            return Err(AdventureError::new(
                "DIALOG_BUSY",
                "Session is mid-transition; drive next() to a boundary first.",
            ));
        }
        let cursor = self.cursor.as_ref().ok_or_else(|| {
            AdventureError::new("DIALOG_NO_NODE", "No node is current.")
        })?;
        let response_index = *cursor.responses.get(index).ok_or_else(|| {
            AdventureError::new(
                "DIALOG_RESPONSE_INDEX",
                format!("Response index \"{}\" is out of range.", index),
            )
        })?;
        let node = self.dialog.node(&cursor.node_id).ok_or_else(|| {
            AdventureError::new(
                "DIALOG_NODE_MISSING",
                format!("Current node \"{}\" is no longer in the graph.", cursor.node_id),
            )
        })?;
        let response = node.responses.get(response_index).ok_or_else(|| {
            AdventureError::new(
                "DIALOG_RESPONSE_MISSING",
                "Selected response is no longer on the node.",
            )
        })?;

        self.pending = Some(PendingWork::ResponseAction {
            exec: response.action_script.clone().map(ScriptExec::new),
            next: response.next.clone(),
        });
        self.cursor = None;
        Ok(())
    }

    fn notify_node_changed(&mut self, vars: &VariableStore) {
        let Some(cursor) = self.cursor.clone() else {
            return;
        };
        let Some(node) = self.dialog.node(&cursor.node_id) else {
            return;
        };
        let view = build_view(node, &cursor, vars);
        if let Some(handler) = self.on_node_change.as_mut() {
            handler(&view);
        }
    }
}
