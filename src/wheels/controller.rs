use std::sync::Arc;

use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    persistence::{self, KeyValueStore, Persister},
    render::{self, WheelGeometry, WheelLayout},
    spin::{self, PendingSpin, SpinState},
};

use super::{
    models::{new_id, CollectionState, Segment},
    store::CollectionStore,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSnapshot {
    pub state: CollectionState,
    pub spin: SpinState,
}

/// What the presentation layer needs to animate a spin. The animation must
/// end with a call to [`WheelController::complete_spin`] carrying `token`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpinPlan {
    pub token: String,
    pub wheel_id: String,
    pub segment_id: String,
    pub index: usize,
    pub target_rotation: f64,
    pub duration_ms: u64,
}

impl From<&PendingSpin> for SpinPlan {
    fn from(pending: &PendingSpin) -> Self {
        Self {
            token: pending.token.clone(),
            wheel_id: pending.wheel_id.clone(),
            segment_id: pending.segment_id.clone(),
            index: pending.index,
            target_rotation: pending.target_rotation,
            duration_ms: pending.duration_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpinResolution {
    /// The recorded winner, or `None` when the completion was stale or the
    /// winner no longer exists on the active wheel.
    pub winner: Option<Segment>,
    pub snapshot: CollectionSnapshot,
}

/// Receives state changes, e.g. to forward them to the web view.
pub trait StateObserver: Send + Sync + 'static {
    fn collection_changed(&self, _snapshot: &CollectionSnapshot) {}

    fn spin_started(&self, _plan: &SpinPlan) {}

    fn spin_finished(&self, _resolution: &SpinResolution) {}
}

pub struct NoopObserver;

impl StateObserver for NoopObserver {}

struct ControllerState {
    store: CollectionStore,
    spin: SpinState,
    rng: StdRng,
}

impl ControllerState {
    fn snapshot(&self) -> CollectionSnapshot {
        CollectionSnapshot {
            state: self.store.state().clone(),
            spin: self.spin.clone(),
        }
    }
}

/// Owns the wheel collection and the spin state machine. Clones share the
/// same state; every operation runs to completion before the next starts.
#[derive(Clone)]
pub struct WheelController {
    state: Arc<Mutex<ControllerState>>,
    persister: Persister,
    observer: Arc<dyn StateObserver>,
}

impl WheelController {
    pub fn new(
        store: CollectionStore,
        persister: Persister,
        observer: Arc<dyn StateObserver>,
    ) -> Self {
        Self::with_rng(store, persister, observer, StdRng::from_entropy())
    }

    pub fn with_rng(
        store: CollectionStore,
        persister: Persister,
        observer: Arc<dyn StateObserver>,
        rng: StdRng,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControllerState {
                store,
                spin: SpinState::new(),
                rng,
            })),
            persister,
            observer,
        }
    }

    /// Loads the stored collection (or defaults) and starts saving into the
    /// same store. Must be called from within a Tokio runtime.
    pub async fn load<S: KeyValueStore>(storage: S, observer: Arc<dyn StateObserver>) -> Self {
        let store = persistence::load_collection(&storage).await;
        Self::new(store, Persister::spawn(storage), observer)
    }

    pub async fn get_snapshot(&self) -> CollectionSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn create_wheel(&self) -> CollectionSnapshot {
        self.apply(|store| {
            store.create_wheel();
            true
        })
        .await
    }

    pub async fn delete_wheel(&self, wheel_id: &str) -> CollectionSnapshot {
        self.apply(|store| store.delete_wheel(wheel_id)).await
    }

    pub async fn rename_wheel(&self, wheel_id: &str, name: String) -> CollectionSnapshot {
        self.apply(|store| store.rename_wheel(wheel_id, name)).await
    }

    pub async fn set_active_wheel(&self, wheel_id: &str) -> CollectionSnapshot {
        self.apply(|store| store.set_active_wheel(wheel_id)).await
    }

    pub async fn add_segment(&self, wheel_id: &str) -> CollectionSnapshot {
        self.apply(|store| store.add_segment(wheel_id).is_some())
            .await
    }

    pub async fn update_segment_label(
        &self,
        wheel_id: &str,
        segment_id: &str,
        label: String,
    ) -> CollectionSnapshot {
        self.apply(|store| store.update_segment_label(wheel_id, segment_id, label))
            .await
    }

    pub async fn delete_segment(&self, wheel_id: &str, segment_id: &str) -> CollectionSnapshot {
        self.apply(|store| store.delete_segment(wheel_id, segment_id))
            .await
    }

    /// Draws a winner on the active wheel and enters the spinning state.
    /// Returns `None` while another spin is still in flight.
    pub async fn spin(&self, duration_ms: u64) -> Option<SpinPlan> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.spin.is_spinning() {
            log_info!("Ignoring spin request; a spin is already in flight");
            return None;
        }

        let wheel = state.store.active_wheel()?;
        let outcome = spin::spin(&wheel.segments, &mut state.rng)?;
        let pending = PendingSpin {
            token: new_id(),
            wheel_id: wheel.id.clone(),
            segment_id: outcome.segment_id,
            index: outcome.index,
            target_rotation: outcome.target_rotation,
            duration_ms,
            started_at: Utc::now(),
        };

        state.store.clear_selection();
        let plan = SpinPlan::from(&pending);
        state.spin.begin(pending);

        // Observers run under the lock so events leave in state order.
        self.observer.spin_started(&plan);
        self.observer.collection_changed(&state.snapshot());
        Some(plan)
    }

    /// Ends the spin identified by `token` and records its winner.
    ///
    /// The winner is recorded only if the spun wheel is still active and
    /// still holds the winning segment; otherwise the result is dropped and
    /// nothing is selected. Unknown tokens change nothing.
    pub async fn complete_spin(&self, token: &str) -> SpinResolution {
        let mut guard = self.state.lock().await;
        let Some(pending) = guard.spin.finish(token) else {
            log_warn!("Ignoring completion for unknown spin {token}");
            return SpinResolution {
                winner: None,
                snapshot: guard.snapshot(),
            };
        };

        let still_active = guard.store.active_wheel_id() == Some(pending.wheel_id.as_str());
        let winner = if still_active && guard.store.record_spin_result(&pending.segment_id) {
            guard
                .store
                .active_wheel()
                .and_then(|wheel| wheel.segment(&pending.segment_id))
                .cloned()
        } else {
            log_info!(
                "Dropping stale result of spin {}: winning segment no longer on the active wheel",
                pending.token
            );
            None
        };

        let resolution = SpinResolution {
            winner,
            snapshot: guard.snapshot(),
        };
        self.observer.spin_finished(&resolution);
        self.observer.collection_changed(&resolution.snapshot);
        resolution
    }

    /// Renderer input for a wheel (the active one by default). Only the
    /// active wheel carries a highlighted winner.
    pub async fn layout(
        &self,
        wheel_id: Option<&str>,
        rotation: f64,
        geometry: &WheelGeometry,
    ) -> Option<WheelLayout> {
        let guard = self.state.lock().await;
        let store = &guard.store;
        let wheel = match wheel_id {
            Some(wheel_id) => store.wheel(wheel_id)?,
            None => store.active_wheel()?,
        };
        let selected = if store.active_wheel_id() == Some(wheel.id.as_str()) {
            store.selected_segment_id()
        } else {
            None
        };

        Some(render::layout_wheel(&wheel.segments, selected, rotation, geometry))
    }

    /// Waits for every save scheduled so far.
    pub async fn flush(&self) {
        self.persister.flush().await;
    }

    pub async fn shutdown(&self) {
        self.persister.shutdown().await;
    }

    async fn apply<F>(&self, op: F) -> CollectionSnapshot
    where
        F: FnOnce(&mut CollectionStore) -> bool,
    {
        let mut guard = self.state.lock().await;
        let changed = op(&mut guard.store);
        let snapshot = guard.snapshot();
        if changed {
            self.persister.schedule(&guard.store.persisted());
            self.observer.collection_changed(&snapshot);
        }
        snapshot
    }
}
