impl DialogSession {
    /// First valid prompt in authored order, or a uniform draw over all
    /// valid prompts when the node opts into random selection. None when no
    /// prompt passes; callers render an empty line.
    fn select_prompt(&mut self, node: &DialogNode, vars: &VariableStore) -> Option<usize> {
        let mut valid = Vec::new();
        for (index, prompt) in node.prompts.iter().enumerate() {
            let passes = prompt
                .condition
                .as_ref()
                .map(|condition| condition.evaluate(vars))
                .unwrap_or(true);
            if !passes {
                continue;
            }
            if !node.pick_random_valid_prompt {
                return Some(index);
            }
            valid.push(index);
        }

        if valid.is_empty() {
            return None;
        }
        let pick = rng_bounded(&mut self.rng_state, valid.len() as u32) as usize;
        Some(valid[pick])
    }

    /// Filters responses by condition. When the node caps the count, a
    /// uniformly random survivor is removed until the cap is met; the
    /// remove-until-count order matters for seeded reproducibility.
    fn select_responses(&mut self, node: &DialogNode, vars: &VariableStore) -> Vec<usize> {
        let mut passing: Vec<usize> = node
            .responses
            .iter()
            .enumerate()
            .filter(|(_, response)| {
                response
                    .condition
                    .as_ref()
                    .map(|condition| condition.evaluate(vars))
                    .unwrap_or(true)
            })
            .map(|(index, _)| index)
            .collect();

        if node.pick_random_response_count >= 0 {
            let target = node.pick_random_response_count as usize;
            while passing.len() > target {
                let pick = rng_bounded(&mut self.rng_state, passing.len() as u32) as usize;
                passing.remove(pick);
            }
        }

        passing
    }
}
