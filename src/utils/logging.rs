//! Logger setup plus logging macros gated by a module-level `ENABLE_LOGS`
//! flag, so noisy modules can be silenced without touching `RUST_LOG`.
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_error, log_info, log_warn};
//!
//! log_info!("only printed while ENABLE_LOGS is true");
//! ```

use log::LevelFilter;

/// Environment flag that raises the default level to `Debug`.
pub const DEBUG_ENV_VAR: &str = "WHEELSPIN_DEBUG";

pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV_VAR)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn default_level() -> LevelFilter {
    if debug_enabled() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes `env_logger`. `RUST_LOG` still overrides the default level.
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(default_level())
        .parse_default_env()
        .try_init();
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
