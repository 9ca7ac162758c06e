//! # toki core library
//!
//! Business logic for the `toki` countdown timer: a timer argument is parsed
//! into an ordered list of stages, and a stage runner walks through them one
//! at a time while a ticker and a countdown feed it events.
//!
//! ## Key Components
//!
//! - [`parse_timer_spec`]: Duration sequencer
//! - [`StageRunner`]: Session state machine
//! - [`StageTimers`]: Ticker and countdown sources
//! - [`drive`]: Event loop tying the two together over a [`Screen`]
//! - [`Config`]: Application configuration management

pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod sequencer;
pub mod timer;
pub mod view;

pub use config::Config;
pub use driver::{drive, Screen};
pub use error::{ConfigError, CoreError, Result};
pub use events::{Command, Event};
pub use sequencer::parse_timer_spec;
pub use timer::{tick_interval, Outcome, SessionStatus, StageRunner, StageTimers, TimerSpec};
pub use view::{finished_message, DisplayOptions, TimeFormat};
