use std::sync::{Arc, Mutex, PoisonError};

use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use super::{KeyValueStore, PersistedCollection, COLLECTION_KEY};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone)]
struct PendingSave {
    revision: u64,
    payload: String,
}

struct PersisterInner {
    latest_tx: watch::Sender<Option<PendingSave>>,
    settled_rx: watch::Receiver<u64>,
    cancel_token: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

/// Background writer for the collection snapshot.
///
/// `schedule` never blocks and never fails: the newest snapshot replaces any
/// snapshot still waiting to be written, and the save task writes whatever is
/// newest when it gets to it. Write errors are logged and dropped; the next
/// scheduled save simply tries again with fresher data.
#[derive(Clone)]
pub struct Persister {
    inner: Arc<PersisterInner>,
}

impl Persister {
    /// Starts the save task. Must be called from within a Tokio runtime.
    pub fn spawn<S: KeyValueStore>(store: S) -> Self {
        let (latest_tx, latest_rx) = watch::channel(None);
        let (settled_tx, settled_rx) = watch::channel(0u64);
        let cancel_token = CancellationToken::new();

        let handle = tokio::spawn(save_loop(
            store,
            latest_rx,
            settled_tx,
            cancel_token.clone(),
        ));

        Self {
            inner: Arc::new(PersisterInner {
                latest_tx,
                settled_rx,
                cancel_token,
                handle: Mutex::new(Some(handle)),
            }),
        }
    }

    pub fn schedule(&self, persisted: &PersistedCollection) {
        let payload = match persisted.encode() {
            Ok(payload) => payload,
            Err(err) => {
                log_error!("Dropping save, snapshot did not serialize: {err:#}");
                return;
            }
        };

        self.inner.latest_tx.send_modify(|slot| {
            let revision = slot.as_ref().map_or(0, |pending| pending.revision) + 1;
            *slot = Some(PendingSave { revision, payload });
        });
    }

    /// Waits until every snapshot scheduled so far has been written or has
    /// failed to write.
    pub async fn flush(&self) {
        let target = self.latest_revision();
        let mut settled_rx = self.inner.settled_rx.clone();
        // An error here means the save task is gone; nothing left to wait for.
        let _ = settled_rx.wait_for(|settled| *settled >= target).await;
    }

    /// Writes any pending snapshot and stops the save task.
    pub async fn shutdown(&self) {
        self.inner.cancel_token.cancel();
        let handle = self
            .inner
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                log_error!("Save task failed to join: {err}");
            }
        }
    }

    fn latest_revision(&self) -> u64 {
        self.inner
            .latest_tx
            .borrow()
            .as_ref()
            .map_or(0, |pending| pending.revision)
    }
}

async fn save_loop<S: KeyValueStore>(
    store: S,
    mut latest_rx: watch::Receiver<Option<PendingSave>>,
    settled_tx: watch::Sender<u64>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            changed = latest_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let pending = latest_rx.borrow_and_update().clone();
                if let Some(pending) = pending {
                    write_snapshot(&store, pending, &settled_tx).await;
                }
            }
            _ = cancel_token.cancelled() => {
                let pending = latest_rx.borrow_and_update().clone();
                if let Some(pending) = pending {
                    if pending.revision > *settled_tx.borrow() {
                        write_snapshot(&store, pending, &settled_tx).await;
                    }
                }
                log_info!("Save task shutting down");
                break;
            }
        }
    }
}

async fn write_snapshot<S: KeyValueStore>(
    store: &S,
    pending: PendingSave,
    settled_tx: &watch::Sender<u64>,
) {
    match store.set(COLLECTION_KEY, pending.payload).await {
        Ok(()) => log::debug!("Saved wheel collection (revision {})", pending.revision),
        Err(err) => log_error!(
            "Failed to save wheel collection (revision {}): {err:#}",
            pending.revision
        ),
    }
    settled_tx.send_replace(pending.revision);
}
