//! File-based logging.
//!
//! The terminal is in raw mode while a timer runs, so logs never go to the
//! screen. Set `TOKI_LOG` to an env-filter directive (`debug`,
//! `toki_core=trace`, ...) to write them to `~/.config/toki/toki.log`, or to
//! `TOKI_LOG_FILE` if set.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TOKI_LOG";
pub const LOG_FILE_ENV: &str = "TOKI_LOG_FILE";

/// Initialize logging if `TOKI_LOG` is set. Otherwise a no-op.
pub fn init() {
    let Ok(directive) = std::env::var(LOG_ENV) else {
        return;
    };

    let path = match log_path() {
        Some(path) => path,
        None => {
            eprintln!("toki: cannot determine log file location, logging disabled");
            return;
        }
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("toki: failed to open log file {}: {e}", path.display());
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    tracing::info!(log_file = %path.display(), "toki logging initialized");
}

fn log_path() -> Option<PathBuf> {
    match std::env::var_os(LOG_FILE_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => toki_core::config::config_dir().ok().map(|dir| dir.join("toki.log")),
    }
}
