use std::time::Duration;

/// Everything that can happen to a running session.
///
/// Tick and timeout events carry the index of the stage whose timer produced
/// them. An event tagged with any other stage is stale and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One tick quantum of the current stage has passed.
    Tick { stage: usize },
    /// The countdown for `stage` reached zero.
    Timeout { stage: usize },
    /// Plain quit (`q`, `Esc`). Stops the loop, reported as success.
    Quit,
    /// User cancellation (`Ctrl+C`). Stops the loop, reported as failure.
    Interrupt,
    /// Terminal size changed.
    Resize { width: u16, height: u16 },
}

/// What the driving loop must do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    /// (Re)start the ticker and the countdown for a new stage.
    StartStage {
        stage: usize,
        duration: Duration,
        interval: Duration,
    },
    /// Stop both timers and leave the loop.
    Stop,
}
