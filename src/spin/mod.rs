#[cfg(feature = "app")]
pub mod commands;
pub mod engine;
pub mod state;

pub use engine::{spin, SpinOutcome, EXTRA_SPINS};
pub use state::{PendingSpin, SpinState, SpinStatus};
