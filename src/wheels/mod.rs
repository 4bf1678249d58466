#[cfg(feature = "app")]
pub mod commands;
pub mod controller;
pub mod models;
pub mod store;

pub use controller::{
    CollectionSnapshot, NoopObserver, SpinPlan, SpinResolution, StateObserver, WheelController,
};
pub use models::{CollectionState, Segment, Wheel};
pub use store::CollectionStore;
