pub mod command;
pub mod condition;
pub mod dialog;
pub mod error;
pub mod overlay;
pub mod script;
pub mod variables;

pub use command::EngineCommand;
pub use condition::{ComparisonOp, Condition, ConditionGroup, Expression};
pub use dialog::{Dialog, DialogNode, NextNode, Prompt, Response};
pub use error::AdventureError;
pub use overlay::{EntityMarks, PresentationOverlay};
pub use script::{
    BlockingType, ConditionalBranch, ModifyOp, ReturnValue, Script, ScriptBlock, ValueSource,
};
pub use variables::{format_number, VariableEntry, VariableKind, VariableStore};
