pub mod clock;
pub mod dialog;
mod rng;
pub mod script;
pub mod store;
pub mod text;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dialog::{
    DialogOutput, DialogSession, DialogSessionOptions, NodeView, ResponseView, SessionSnapshot,
    SESSION_SNAPSHOT_SCHEMA,
};
pub use script::{
    ExecContext, NullStage, RecordingStage, ScriptExec, ScriptStep, Stage, StageEffect,
};
pub use store::{EngineState, EngineStore, StoreOptions, StoreStatus};
pub use text::render_text;
