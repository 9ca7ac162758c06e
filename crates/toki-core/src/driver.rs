//! Session event loop.
//!
//! One loop owns the runner. Timer tasks and the input reader push events
//! into a single unbounded queue; the loop handles them strictly in arrival
//! order and repaints after each one.

use std::io;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::error::Result;
use crate::events::{Command, Event};
use crate::timer::{Outcome, StageRunner, StageTimers};

/// Anything that can show a frame.
pub trait Screen {
    /// Replace the previous frame with `frame`. An empty frame clears it.
    fn draw(&mut self, frame: &str) -> io::Result<()>;
}

/// Run `runner` until it stops.
///
/// `tx` is handed to the stage timers; other producers (keyboard, resize)
/// should hold clones of the same sender. Returns the runner's outcome.
///
/// # Errors
///
/// [`crate::CoreError::Interrupted`] when the user cancelled, or an IO error
/// from the screen.
pub async fn drive<S: Screen>(
    runner: &mut StageRunner,
    screen: &mut S,
    tx: UnboundedSender<Event>,
    mut rx: UnboundedReceiver<Event>,
) -> Result<Outcome> {
    let mut timers = StageTimers::new(tx);
    screen.draw(&runner.view())?;
    apply(runner.init(), &mut timers);

    while let Some(event) = rx.recv().await {
        let stop = apply(runner.handle(event), &mut timers);
        screen.draw(&runner.view())?;
        if stop {
            break;
        }
    }

    timers.stop();
    runner.finish()
}

/// Returns true when the loop must exit.
fn apply(command: Command, timers: &mut StageTimers) -> bool {
    match command {
        Command::None => false,
        Command::StartStage {
            stage,
            duration,
            interval,
        } => {
            timers.start(stage, duration, interval);
            false
        }
        Command::Stop => {
            timers.stop();
            true
        }
    }
}
