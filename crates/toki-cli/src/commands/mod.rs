pub mod completions;
pub mod config;
pub mod man;
pub mod timer;
