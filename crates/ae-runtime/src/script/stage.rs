use ae_core::{
    AdventureError, ModifyOp, ReturnValue, Script, ScriptBlock, ValueSource, VariableEntry,
    VariableKind, VariableStore,
};

/// Presentation collaborator receiving hotspot side effects. The engine only
/// sequences these calls; rendering and tweening happen on the host side.
pub trait Stage {
    fn set_hotspot_visible(&mut self, hotspot: &str, visible: bool);
    fn fade_hotspot(&mut self, hotspot: &str, alpha: f64, seconds: f64);
}

#[derive(Debug, Default)]
pub struct NullStage;

impl Stage for NullStage {
    fn set_hotspot_visible(&mut self, _hotspot: &str, _visible: bool) {}
    fn fade_hotspot(&mut self, _hotspot: &str, _alpha: f64, _seconds: f64) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageEffect {
    Visibility {
        hotspot: String,
        visible: bool,
    },
    Fade {
        hotspot: String,
        alpha: f64,
        seconds: f64,
    },
}

/// Captures effects in order; used by tests and the replay tooling.
#[derive(Debug, Default)]
pub struct RecordingStage {
    pub effects: Vec<StageEffect>,
}

impl Stage for RecordingStage {
    fn set_hotspot_visible(&mut self, hotspot: &str, visible: bool) {
        self.effects.push(StageEffect::Visibility {
            hotspot: hotspot.to_string(),
            visible,
        });
    }

    fn fade_hotspot(&mut self, hotspot: &str, alpha: f64, seconds: f64) {
        self.effects.push(StageEffect::Fade {
            hotspot: hotspot.to_string(),
            alpha,
            seconds,
        });
    }
}
