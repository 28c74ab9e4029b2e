pub mod alert;
pub mod detection;
pub mod history;
pub mod prediction;

pub use alert::{Alert, AlertKind, AlertReport, AlertRule, AlertState};
pub use detection::{
    is_pest_free, latest_detection, DetectionRecord, Environment, Growth, GrowthStage,
    PEST_SENTINEL, UNKNOWN_STAGE,
};
pub use history::{
    HistoryEntry, PestTransition, PestTransitionKind, StageTransition, TransitionDirection,
};
pub use prediction::Prediction;
