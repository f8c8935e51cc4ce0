pub(crate) const STEP_GUARD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Then,
    ElseIf(usize),
    Else,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SegmentStep {
    block: usize,
    branch: Branch,
}

#[derive(Debug, Clone)]
struct Frame {
    segment: Vec<SegmentStep>,
    index: usize,
}

/// Mutable world handed to one execution step: the shared variable store and
/// the presentation collaborator.
pub struct ExecContext<'a> {
    pub vars: &'a mut VariableStore,
    pub stage: &'a mut dyn Stage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    /// Execution yielded for a real-time duration; call `step` again once it
    /// has elapsed.
    Suspended { seconds: f64 },
    Finished { return_value: Option<String> },
}

/// One resumable execution of a script tree. Frames address nested block
/// sequences by the path of (block index, branch) pairs that reach them, so
/// container re-entry needs no per-branch identifiers in the data model.
///
/// Loop re-evaluation hinges on when the owner index is bumped: `If` bumps
/// before pushing the branch frame, `While` bumps only when its condition
/// fails, so a finished loop body naturally lands back on the `While` block.
#[derive(Debug, Clone)]
pub struct ScriptExec {
    script: Script,
    frames: Vec<Frame>,
    return_value: Option<String>,
    finished: bool,
}

impl ScriptExec {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            frames: vec![Frame {
                segment: Vec::new(),
                index: 0,
            }],
            return_value: None,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn return_value(&self) -> Option<&str> {
        self.return_value.as_deref()
    }

    fn resolve_segment(&self, segment: &[SegmentStep]) -> Result<&[ScriptBlock], AdventureError> {
        let mut blocks: &[ScriptBlock] = &self.script.blocks;
        for step in segment {
            let block = blocks.get(step.block).ok_or_else(|| {
                AdventureError::new(
                    "SCRIPT_SEGMENT",
                    format!("Block index {} is out of range.", step.block),
                )
            })?;
            blocks = match (block, step.branch) {
                (ScriptBlock::If { then, .. }, Branch::Then) => &then.blocks,
                (ScriptBlock::If { else_if, .. }, Branch::ElseIf(index)) => {
                    &else_if
                        .get(index)
                        .ok_or_else(|| {
                            AdventureError::new(
                                "SCRIPT_SEGMENT",
                                format!("ElseIf branch {} is out of range.", index),
                            )
                        })?
                        .blocks
                }
                (ScriptBlock::If { else_blocks, .. }, Branch::Else) => {
                    else_blocks.as_deref().ok_or_else(|| {
                        AdventureError::new("SCRIPT_SEGMENT", "Else branch is absent.")
                    })?
                }
                (ScriptBlock::While { body, .. }, Branch::Body) => body,
                _ => {
                    return Err(AdventureError::new(
                        "SCRIPT_SEGMENT",
                        "Segment step does not address a container branch.",
                    ))
                }
            };
        }
        Ok(blocks)
    }

    fn bump_top(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.index += 1;
        }
    }

    fn push_branch_frame(&mut self, parent_segment: &[SegmentStep], block: usize, branch: Branch) {
        let mut segment = parent_segment.to_vec();
        segment.push(SegmentStep { block, branch });
        self.frames.push(Frame { segment, index: 0 });
    }
}
