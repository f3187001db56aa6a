use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::{debug, info, warn};
use rocket::tokio::sync::mpsc::{self, error::TrySendError};

use crate::models::snapshot::QueueSnapshot;

pub type ObserverId = u64;

struct Registry {
    observers: Mutex<HashMap<ObserverId, mpsc::Sender<QueueSnapshot>>>,
    next_id: AtomicU64,
    buffer: usize,
}

impl Registry {
    fn observers(&self) -> MutexGuard<'_, HashMap<ObserverId, mpsc::Sender<QueueSnapshot>>> {
        // a panic elsewhere must not take the whole fan-out down with it
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: ObserverId) {
        let mut observers = self.observers();
        if observers.remove(&id).is_some() {
            info!("[-] observer #{} left ({} remaining)", id, observers.len());
        }
    }
}

/// Fans queue snapshots out to every connected display.
///
/// Each observer gets its own bounded channel. Publishing never waits: an
/// observer whose channel is closed or full is logged and dropped, and the
/// rest still receive the snapshot.
#[derive(Clone)]
pub struct Notifier {
    registry: Arc<Registry>,
}

/// Receiving end of one observer. Deregisters itself when dropped.
pub struct Subscription {
    id: ObserverId,
    rx: mpsc::Receiver<QueueSnapshot>,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Next snapshot, or `None` once the notifier has dropped this observer.
    pub async fn recv(&mut self) -> Option<QueueSnapshot> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<QueueSnapshot> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl Notifier {
    pub fn new(buffer: usize) -> Self {
        Notifier {
            registry: Arc::new(Registry {
                observers: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                buffer: buffer.max(1),
            }),
        }
    }

    /// Registers an observer with `initial` already waiting in its channel.
    ///
    /// Callers pass the state at subscribe time and must hold the queue lock
    /// across this call so no mutation slips in before it.
    pub fn subscribe(&self, initial: QueueSnapshot) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.registry.buffer);

        // fresh channel with capacity >= 1, the first send always fits
        let _ = tx.try_send(initial);

        let mut observers = self.registry.observers();
        observers.insert(id, tx);
        info!("[+] observer #{} joined ({} connected)", id, observers.len());
        drop(observers);

        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Idempotent; unknown ids are ignored.
    pub fn unsubscribe(&self, id: ObserverId) {
        self.registry.remove(id);
    }

    /// Sends `snapshot` to every registered observer and returns how many took it.
    pub fn publish(&self, snapshot: &QueueSnapshot) -> usize {
        let mut observers = self.registry.observers();
        let mut dropped = Vec::new();

        for (id, tx) in observers.iter() {
            match tx.try_send(snapshot.clone()) {
                Ok(()) => {}
                Err(TrySendError::Closed(_)) => {
                    warn!("[!] observer #{} is gone, dropping it", id);
                    dropped.push(*id);
                }
                Err(TrySendError::Full(_)) => {
                    warn!("[!] observer #{} is not keeping up, dropping it", id);
                    dropped.push(*id);
                }
            }
        }

        for id in &dropped {
            observers.remove(id);
        }

        let delivered = observers.len();
        debug!(
            "[-] published snapshot to {} observer(s), dropped {}",
            delivered,
            dropped.len()
        );
        delivered
    }

    pub fn observer_count(&self) -> usize {
        self.registry.observers().len()
    }
}
