//! The two event sources behind a running stage.
//!
//! The ticker fires every `interval` and only drives progress; the countdown
//! fires once when the stage length has passed. They run as separate tokio
//! tasks and both feed the session's event queue.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::events::Event;

/// Ticker and countdown for the current stage.
///
/// Starting a stage aborts the previous stage's tasks. Dropping the value
/// aborts whatever is still running.
#[derive(Debug)]
pub struct StageTimers {
    tx: UnboundedSender<Event>,
    ticker: Option<JoinHandle<()>>,
    countdown: Option<JoinHandle<()>>,
}

impl StageTimers {
    pub fn new(tx: UnboundedSender<Event>) -> Self {
        Self {
            tx,
            ticker: None,
            countdown: None,
        }
    }

    /// Spawn both timers for `stage`. Must be called inside a tokio runtime.
    pub fn start(&mut self, stage: usize, duration: Duration, interval: Duration) {
        self.stop();
        tracing::trace!(stage, ?duration, ?interval, "starting stage timers");

        let tx = self.tx.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if tx.send(Event::Tick { stage }).is_err() {
                    break;
                }
            }
        }));

        let tx = self.tx.clone();
        self.countdown = Some(tokio::spawn(async move {
            time::sleep(duration).await;
            let _ = tx.send(Event::Timeout { stage });
        }));
    }

    /// Abort both timers. Nothing is sent after this returns.
    pub fn stop(&mut self) {
        for handle in [self.ticker.take(), self.countdown.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
    }

    #[cfg(test)]
    fn is_running(&self) -> bool {
        self.ticker.is_some() || self.countdown.is_some()
    }
}

impl Drop for StageTimers {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn ticks_then_one_timeout() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = StageTimers::new(tx);
        timers.start(0, Duration::from_millis(250), Duration::from_millis(100));

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            seen.push(event);
            if matches!(event, Event::Timeout { .. }) {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                Event::Tick { stage: 0 },
                Event::Tick { stage: 0 },
                Event::Timeout { stage: 0 },
            ]
        );

        timers.stop();
        assert!(!timers.is_running());
        time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_stage() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = StageTimers::new(tx);
        timers.start(0, Duration::from_secs(10), Duration::from_secs(1));
        timers.start(1, Duration::from_millis(150), Duration::from_millis(100));

        assert_eq!(rx.recv().await, Some(Event::Tick { stage: 1 }));
        assert_eq!(rx.recv().await, Some(Event::Timeout { stage: 1 }));
        timers.stop();
        time::sleep(Duration::from_secs(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_length_stage_times_out_immediately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = StageTimers::new(tx);
        timers.start(3, Duration::ZERO, Duration::from_millis(100));
        assert_eq!(rx.recv().await, Some(Event::Timeout { stage: 3 }));
    }
}
