mod engine;
mod sources;
mod spec;

pub use engine::{tick_interval, Outcome, SessionStatus, StageRunner};
pub use sources::StageTimers;
pub use spec::TimerSpec;
