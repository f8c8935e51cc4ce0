impl EngineStore {
    fn begin_command(&mut self, command: EngineCommand) -> Result<(), AdventureError> {
        match command {
            EngineCommand::SetVariable {
                id,
                value,
                var_kind,
            } => {
                self.state.variables.set(&id, &value, var_kind);
            }
            EngineCommand::LoadVariables { payload } => {
                self.state.variables = VariableStore::deserialize(&payload)?;
            }
            EngineCommand::OpenDialog { dialog, start_node } => {
                let dialog = self
                    .state
                    .dialogs
                    .get(&dialog)
                    .ok_or_else(|| {
                        AdventureError::new(
                            "STORE_DIALOG_MISSING",
                            format!("Dialog \"{}\" is not registered.", dialog),
                        )
                    })?
                    .clone();
                let mut session = DialogSession::new(
                    dialog,
                    DialogSessionOptions {
                        random_seed: self.random_seed,
                    },
                );
                session.begin(start_node.as_deref());
                self.state.session = Some(session);
                self.active = Some(ActiveWork::Dialog);
            }
            EngineCommand::SelectResponse { index } => {
                let session = self.state.session.as_mut().ok_or_else(|| {
                    AdventureError::new("STORE_NO_DIALOG", "No dialog session is open.")
                })?;
                session.choose(index)?;
                self.active = Some(ActiveWork::Dialog);
            }
            EngineCommand::CloseDialog => {
                self.state.session = None;
            }
            EngineCommand::Wait { seconds } | EngineCommand::InternalWait { seconds } => {
                if seconds > 0.0 {
                    self.active = Some(ActiveWork::Wait {
                        seconds,
                        reported: false,
                    });
                }
            }
        }
        Ok(())
    }
}
