mod db;
mod persistence;
mod render;
mod settings;
mod spin;
mod utils;
mod wheels;

#[cfg(feature = "app")]
mod app;

#[cfg(feature = "app")]
pub(crate) use app::AppState;
#[cfg(feature = "app")]
pub use app::run;

pub use db::{Database, KvEntry};
pub use persistence::{KeyValueStore, MemoryStore, PersistedCollection, Persister};
pub use render::{layout_wheel, WheelGeometry, WheelLayout};
pub use settings::{SettingsStore, SpinSettings};
pub use spin::{SpinOutcome, SpinState, SpinStatus};
pub use utils::logging::init_logging;
pub use wheels::{
    CollectionSnapshot, CollectionState, CollectionStore, NoopObserver, Segment, SpinPlan,
    SpinResolution, StateObserver, Wheel, WheelController,
};
