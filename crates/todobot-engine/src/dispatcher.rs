//! Per-user event dispatch.
//!
//! Events for the same user must be applied strictly in arrival order: two
//! interleaved free-text messages would otherwise race on the draft fields.
//! The dispatcher gives every user a lazily created queue and worker task, so
//! one user's in-flight network call never blocks another user's events,
//! while each user's own events are serialized end to end.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use todobot_core::{InboundEvent, Outbound, UserId};
use tokio::sync::{Mutex, mpsc};

use crate::engine::DialogEngine;

/// Delivery half of the event source: takes outbound actions back to the
/// user. Implementations own the transport (chat API, console, test buffer).
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, user_id: UserId, action: Outbound);
}

/// Fans inbound events out to per-user workers.
pub struct Dispatcher {
    engine: Arc<DialogEngine>,
    sink: Arc<dyn EventSink>,
    workers: Mutex<HashMap<UserId, mpsc::UnboundedSender<InboundEvent>>>,
}

impl Dispatcher {
    pub fn new(engine: Arc<DialogEngine>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            engine,
            sink,
            workers: Mutex::new(HashMap::new()),
        }
    }

    /// Enqueues one event for its user's worker, spawning the worker on
    /// first contact. Returns immediately; handling happens asynchronously.
    pub async fn submit(&self, event: InboundEvent) {
        let user_id = event.user_id();
        let mut workers = self.workers.lock().await;
        let sender = workers
            .entry(user_id)
            .or_insert_with(|| spawn_worker(user_id, self.engine.clone(), self.sink.clone()));

        if let Err(mpsc::error::SendError(event)) = sender.send(event) {
            // The worker can only be gone if its task panicked; start a new
            // one and hand it the event so the user is not locked out.
            tracing::error!(%user_id, "worker queue closed, respawning");
            let sender = spawn_worker(user_id, self.engine.clone(), self.sink.clone());
            if sender.send(event).is_err() {
                tracing::error!(%user_id, "fresh worker rejected the event, dropping it");
            }
            workers.insert(user_id, sender);
        }
    }
}

fn spawn_worker(
    user_id: UserId,
    engine: Arc<DialogEngine>,
    sink: Arc<dyn EventSink>,
) -> mpsc::UnboundedSender<InboundEvent> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<InboundEvent>();

    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            if let Some(action) = engine.handle(event).await {
                sink.deliver(user_id, action).await;
            }
        }
        tracing::debug!(%user_id, "worker shut down");
    });

    sender
}
