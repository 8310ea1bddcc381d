use crate::application::reducer::{AppAction, AppState, reduce};
use tokio::sync::watch;

/// Single-writer state cell. All mutation goes through `dispatch`, which
/// applies the reducer under the watch channel's internal lock, so actions
/// are folded into the state strictly in dispatch order.
pub struct AppStore {
    tx: watch::Sender<AppState>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        self.tx.send_modify(|state| *state = reduce(state, action));
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.tx.borrow().clone()
    }

    /// Observation handle for presentation layers. Receivers see every
    /// state change without being able to mutate anything.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}
