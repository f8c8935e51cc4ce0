#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreStatus {
    Idle,
    /// The active command is parked on a real-time suspension; call
    /// `resume()` once the duration has elapsed.
    Suspended { seconds: f64 },
}

enum ActiveWork {
    Wait { seconds: f64, reported: bool },
    Dialog,
}

pub struct StoreOptions {
    pub variables: VariableStore,
    pub dialogs: BTreeMap<String, Dialog>,
    pub stage: Option<Box<dyn Stage>>,
    pub clock: Option<Rc<dyn Clock>>,
    pub track_history: bool,
    pub random_seed: Option<u32>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            variables: VariableStore::new(),
            dialogs: BTreeMap::new(),
            stage: None,
            clock: None,
            track_history: true,
            random_seed: None,
        }
    }
}

/// Single-flight sequential command processor over one [`EngineState`].
/// Reentrant dispatches enqueue behind the drain already in progress, so
/// exactly one drain loop ever runs; every executed command lands in the
/// history log before it runs.
pub struct EngineStore {
    state: EngineState,
    stage: Box<dyn Stage>,
    queue: VecDeque<EngineCommand>,
    history: Vec<String>,
    track_history: bool,
    processing: bool,
    active: Option<ActiveWork>,
    pending_suspension: Option<f64>,
    clock: Rc<dyn Clock>,
    last_enqueue: f64,
    random_seed: Option<u32>,
}

impl EngineStore {
    pub fn new(options: StoreOptions) -> Self {
        let clock = options
            .clock
            .unwrap_or_else(|| Rc::new(SystemClock::new()));
        let last_enqueue = clock.now_seconds();
        Self {
            state: EngineState::new(options.variables, options.dialogs),
            stage: options.stage.unwrap_or_else(|| Box::new(NullStage)),
            queue: VecDeque::new(),
            history: Vec::new(),
            track_history: options.track_history,
            processing: false,
            active: None,
            pending_suspension: None,
            clock,
            last_enqueue,
            random_seed: options.random_seed,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EngineState {
        &mut self.state
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn set_track_history(&mut self, track: bool) {
        self.track_history = track;
    }

    /// The rendered view of the current dialog line, if a session is parked
    /// at a response boundary.
    pub fn current_line(&self) -> Option<NodeView> {
        self.state
            .session
            .as_ref()
            .and_then(|session| session.current_view(&self.state.variables))
    }

    pub fn dispatch(&mut self, command: EngineCommand) -> Result<StoreStatus, AdventureError> {
        if self.processing {
            // Reentrant dispatch: enqueue behind the drain in progress.
            if self.track_history {
                self.insert_time_delta();
            }
            self.queue.push_back(command);
            return Ok(self.status());
        }

        if self.queue.is_empty() && self.track_history {
            self.insert_time_delta();
        }
        self.processing = true;
        self.queue.push_back(command);
        self.drain()
    }

    /// Continues the drain after a suspension. A no-op when idle.
    pub fn resume(&mut self) -> Result<StoreStatus, AdventureError> {
        if !self.processing {
            return Ok(StoreStatus::Idle);
        }
        self.pending_suspension = None;
        self.drain()
    }

    fn status(&self) -> StoreStatus {
        match self.pending_suspension {
            Some(seconds) => StoreStatus::Suspended { seconds },
            None => StoreStatus::Idle,
        }
    }

    fn insert_time_delta(&mut self) {
        let now = self.clock.now_seconds();
        let delta = (now - self.last_enqueue).max(0.0);
        self.last_enqueue = now;
        self.history
            .push(EngineCommand::InternalWait { seconds: delta }.encode_line());
    }

    fn drain(&mut self) -> Result<StoreStatus, AdventureError> {
        loop {
            if let Some(work) = self.active.take() {
                match self.step_active(work) {
                    Ok(Some(seconds)) => {
                        self.pending_suspension = Some(seconds);
                        return Ok(StoreStatus::Suspended { seconds });
                    }
                    Ok(None) => {}
                    Err(error) => {
                        self.abort_drain();
                        return Err(error);
                    }
                }
            }

            let Some(command) = self.queue.pop_front() else {
                self.processing = false;
                self.pending_suspension = None;
                return Ok(StoreStatus::Idle);
            };

            if self.track_history {
                self.history.push(command.encode_line());
            }
            tracing::debug!(command = command.kind_name(), "running command");
            if let Err(error) = self.begin_command(command) {
                self.abort_drain();
                return Err(error);
            }
        }
    }

    fn abort_drain(&mut self) {
        self.queue.clear();
        self.active = None;
        self.pending_suspension = None;
        self.processing = false;
    }

    fn step_active(&mut self, work: ActiveWork) -> Result<Option<f64>, AdventureError> {
        match work {
            ActiveWork::Wait { seconds, reported } => {
                if reported {
                    // The host called resume(), so the duration has elapsed.
                    return Ok(None);
                }
                self.active = Some(ActiveWork::Wait {
                    seconds,
                    reported: true,
                });
                Ok(Some(seconds))
            }
            ActiveWork::Dialog => {
                let state = &mut self.state;
                let Some(session) = state.session.as_mut() else {
                    return Ok(None);
                };
                let mut ctx = ExecContext {
                    vars: &mut state.variables,
                    stage: self.stage.as_mut(),
                };
                match session.next(&mut ctx)? {
                    DialogOutput::Suspended { seconds } => {
                        self.active = Some(ActiveWork::Dialog);
                        Ok(Some(seconds))
                    }
                    DialogOutput::Line(view) => {
                        state.overlay.mark_entered(&view.node_id);
                        Ok(None)
                    }
                    DialogOutput::Closed => {
                        // The transition ended the dialog; the teardown runs
                        // as its own queued command so history captures it.
                        self.queue.push_back(EngineCommand::CloseDialog);
                        Ok(None)
                    }
                }
            }
        }
    }
}
