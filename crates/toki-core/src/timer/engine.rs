//! Stage runner state machine.
//!
//! The runner owns one session and reacts to typed [`Event`]s. It never
//! touches a clock source for timing: elapsed time is accumulated from ticks,
//! and stage ends are announced by the countdown timer as `Timeout` events.
//! The caller applies the returned [`Command`] (see `driver`).
//!
//! ## State Transitions
//!
//! ```text
//! Running --Timeout(last stage)--> CompletedNaturally
//! Running --Interrupt-----------> Interrupted
//! Running --Quit----------------> Running (stopped)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut runner = StageRunner::new(spec, DisplayOptions::default());
//! let cmd = runner.init();          // StartStage for stage 0
//! let cmd = runner.handle(event);   // apply to timers
//! let frame = runner.view();
//! ```

use std::time::Duration;

use chrono::{DateTime, Local};

use super::spec::TimerSpec;
use crate::error::{CoreError, Result};
use crate::events::{Command, Event};
use crate::view::{self, DisplayOptions, DEFAULT_BAR_WIDTH};

const FAST_TICK: Duration = Duration::from_millis(100);
const SLOW_TICK: Duration = Duration::from_secs(1);
const FAST_TICK_LIMIT: Duration = Duration::from_secs(60);

/// Terminal state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    CompletedNaturally,
    Interrupted,
}

/// How a session ended, when it did not end in an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The last stage timed out.
    Completed,
    /// The user quit early.
    Quit,
}

/// Tick cadence for a stage of the given length.
pub fn tick_interval(stage: Duration) -> Duration {
    if stage < FAST_TICK_LIMIT {
        FAST_TICK
    } else {
        SLOW_TICK
    }
}

/// Drives one session through its stages.
#[derive(Debug, Clone)]
pub struct StageRunner {
    spec: TimerSpec,
    stage_index: usize,
    /// Time accumulated from ticks within the current stage.
    elapsed: Duration,
    /// Wall-clock start of the current stage; display only.
    stage_started_at: DateTime<Local>,
    status: SessionStatus,
    /// Set once the loop must stop; covers plain quit as well.
    stopped: bool,
    interval: Duration,
    display: DisplayOptions,
    bar_width: u16,
    viewport_height: u16,
    clock: fn() -> DateTime<Local>,
}

impl StageRunner {
    /// Create a session positioned at the first stage.
    pub fn new(spec: TimerSpec, display: DisplayOptions) -> Self {
        Self::with_clock(spec, display, Local::now)
    }

    /// Like [`StageRunner::new`] with an explicit wall clock.
    pub fn with_clock(
        spec: TimerSpec,
        display: DisplayOptions,
        clock: fn() -> DateTime<Local>,
    ) -> Self {
        let first = spec.get(0).unwrap_or_default();
        Self {
            spec,
            stage_index: 0,
            elapsed: Duration::ZERO,
            stage_started_at: clock(),
            status: SessionStatus::Running,
            stopped: false,
            interval: tick_interval(first),
            display,
            bar_width: DEFAULT_BAR_WIDTH,
            viewport_height: 0,
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn spec(&self) -> &TimerSpec {
        &self.spec
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// True once the driving loop should stop.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Tick cadence of the current stage.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn stage_started_at(&self) -> DateTime<Local> {
        self.stage_started_at
    }

    pub fn stage_duration(&self) -> Duration {
        self.spec.get(self.stage_index).unwrap_or_default()
    }

    pub fn remaining(&self) -> Duration {
        self.stage_duration().saturating_sub(self.elapsed)
    }

    pub fn display(&self) -> &DisplayOptions {
        &self.display
    }

    pub fn bar_width(&self) -> u16 {
        self.bar_width
    }

    pub fn viewport_height(&self) -> u16 {
        self.viewport_height
    }

    /// Whole-percent progress within the current stage, truncated.
    pub fn percent(&self) -> u64 {
        let stage_ms = self.stage_duration().as_millis();
        if stage_ms == 0 {
            return 0;
        }
        let pct = self.elapsed.as_millis() * 100 / stage_ms;
        pct.min(100) as u64
    }

    /// Progress within the current stage as a fraction in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.percent() as f64 / 100.0
    }

    /// Current frame; empty once stopped.
    pub fn view(&self) -> String {
        view::render(self)
    }

    /// Final result for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Interrupted`] if the user cancelled.
    pub fn finish(&self) -> Result<Outcome> {
        match self.status {
            SessionStatus::Interrupted => Err(CoreError::Interrupted),
            SessionStatus::CompletedNaturally => Ok(Outcome::Completed),
            SessionStatus::Running => Ok(Outcome::Quit),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Command that starts the timers for the first stage.
    pub fn init(&self) -> Command {
        self.start_command()
    }

    /// Apply one event. Once stopped, every event is a no-op.
    pub fn handle(&mut self, event: Event) -> Command {
        if self.stopped {
            return Command::None;
        }

        match event {
            Event::Tick { stage } if stage == self.stage_index => {
                self.elapsed = (self.elapsed + self.interval).min(self.stage_duration());
                Command::None
            }
            Event::Timeout { stage } if stage == self.stage_index => self.on_timeout(),
            Event::Tick { .. } | Event::Timeout { .. } => {
                tracing::trace!(?event, current = self.stage_index, "ignoring stale timer event");
                Command::None
            }
            Event::Quit => {
                tracing::info!(stage = self.stage_index, "session quit");
                self.stopped = true;
                Command::Stop
            }
            Event::Interrupt => {
                tracing::info!(stage = self.stage_index, "session interrupted");
                self.status = SessionStatus::Interrupted;
                self.stopped = true;
                Command::Stop
            }
            Event::Resize { width, height } => {
                self.bar_width = self.display.bar_width(width);
                self.viewport_height = height;
                Command::None
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn on_timeout(&mut self) -> Command {
        if self.spec.is_last(self.stage_index) {
            tracing::info!(stages = self.spec.len(), "session completed");
            self.status = SessionStatus::CompletedNaturally;
            self.stopped = true;
            return Command::Stop;
        }

        self.stage_index += 1;
        self.elapsed = Duration::ZERO;
        self.stage_started_at = (self.clock)();
        self.interval = tick_interval(self.stage_duration());
        tracing::debug!(
            stage = self.stage_index,
            duration_ms = self.stage_duration().as_millis() as u64,
            interval_ms = self.interval.as_millis() as u64,
            "advanced to next stage"
        );
        self.start_command()
    }

    fn start_command(&self) -> Command {
        Command::StartStage {
            stage: self.stage_index,
            duration: self.stage_duration(),
            interval: self.interval,
        }
    }
}
