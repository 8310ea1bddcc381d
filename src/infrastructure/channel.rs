//! Event subscription seam. `listen` registers a handler for one named
//! channel and returns a disposer; the bridge owns the disposers and runs
//! them at teardown.

use crate::infrastructure::error::InfraError;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub type EventHandler = Arc<dyn Fn(serde_json::Value) + Send + Sync>;
pub type Unlisten = Box<dyn FnOnce() + Send>;

#[async_trait]
pub trait EventChannel: Send + Sync {
    async fn listen(&self, event: &str, handler: EventHandler) -> Result<Unlisten, InfraError>;
}

type ListenerMap = HashMap<String, Vec<(u64, EventHandler)>>;

/// In-process event channel. Hosts bridging a real backend implement
/// `EventChannel` over their own transport; this one backs tests and
/// headless embedding.
#[derive(Default)]
pub struct LocalEventChannel {
    listeners: Arc<Mutex<ListenerMap>>,
    next_token: AtomicU64,
}

impl LocalEventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit<P: Serialize>(&self, event: &str, payload: &P) {
        let value = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%error, event, "failed to encode event payload");
                return;
            }
        };
        let handlers: Vec<EventHandler> = {
            let Ok(listeners) = self.listeners.lock() else {
                return;
            };
            listeners
                .get(event)
                .map(|entries| entries.iter().map(|(_, handler)| handler.clone()).collect())
                .unwrap_or_default()
        };
        // Invoked outside the lock so a handler may unlisten.
        for handler in handlers {
            handler(value.clone());
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .map(|listeners| listeners.get(event).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

#[async_trait]
impl EventChannel for LocalEventChannel {
    async fn listen(&self, event: &str, handler: EventHandler) -> Result<Unlisten, InfraError> {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        {
            let mut listeners = self
                .listeners
                .lock()
                .map_err(|_| InfraError::Channel("listener registry poisoned".to_string()))?;
            listeners
                .entry(event.to_string())
                .or_default()
                .push((token, handler));
        }

        let listeners = Arc::clone(&self.listeners);
        let event = event.to_string();
        Ok(Box::new(move || {
            if let Ok(mut listeners) = listeners.lock() {
                if let Some(entries) = listeners.get_mut(&event) {
                    entries.retain(|(entry_token, _)| *entry_token != token);
                }
            }
        }))
    }
}
