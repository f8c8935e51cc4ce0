impl EngineStore {
    /// Re-dispatches a recorded history with tracking disabled, fast-
    /// forwarding every suspension. With the same seed and assets this
    /// reproduces the original run's final variable state.
    pub fn replay(&mut self, lines: &[String]) -> Result<(), AdventureError> {
        let previous = self.track_history;
        self.track_history = false;
        let result = self.replay_lines(lines);
        self.track_history = previous;
        result
    }

    fn replay_lines(&mut self, lines: &[String]) -> Result<(), AdventureError> {
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let command = EngineCommand::decode_line(line)?;
            let mut status = self.dispatch(command)?;
            while let StoreStatus::Suspended { .. } = status {
                status = self.resume()?;
            }
        }
        Ok(())
    }
}
