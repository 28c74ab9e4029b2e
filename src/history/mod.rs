pub mod config;
pub mod filter;
pub mod reconcile;

pub use config::StageDurations;
pub use filter::{newest_first, HistoryFilter};
pub use reconcile::reconcile_history;
