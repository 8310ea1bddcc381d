//! Reconciles backend events into the store. The bridge performs the
//! initial load, registers one listener per event channel and owns their
//! disposers. Teardown can race an in-flight registration; the disposal
//! flag guarantees no listener survives `shutdown`.

use crate::application::reducer::{AppAction, local_notice, notice_from_payload};
use crate::application::store::AppStore;
use crate::domain::models::{AppErrorAction, AppErrorKind, AppErrorNotice, AppErrorPayload};
use crate::infrastructure::backend::TimerBackend;
use crate::infrastructure::channel::{EventChannel, EventHandler, Unlisten};
use crate::infrastructure::events::{
    APP_ERROR_EVENT, CHECK_IN_REQUIRED_EVENT, CHECK_IN_TIMEOUT_EVENT, CheckInRequiredPayload,
    CheckInTimeoutPayload, STEP_CHANGED_EVENT, StepChangedPayload, TIMER_PAUSED_EVENT,
    TIMER_RESUMED_EVENT, TIMER_STOPPED_EVENT, TIMER_TICK_EVENT, TimerTickPayload,
};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::{Duration, sleep};

const NOTICE_DISMISS_MS: u64 = 5_000;
const NOTICE_DISMISS_WITH_ACTION_MS: u64 = 8_000;

pub const INITIAL_LOAD_ERROR_TITLE: &str = "初期データの読み込みに失敗しました";

pub struct EventBridge {
    store: Arc<AppStore>,
    backend: Arc<dyn TimerBackend>,
    channel: Arc<dyn EventChannel>,
    disposed: Arc<AtomicBool>,
    unlisteners: Mutex<Vec<Unlisten>>,
}

impl EventBridge {
    pub fn new(
        store: Arc<AppStore>,
        backend: Arc<dyn TimerBackend>,
        channel: Arc<dyn EventChannel>,
    ) -> Self {
        Self {
            store,
            backend,
            channel,
            disposed: Arc::new(AtomicBool::new(false)),
            unlisteners: Mutex::new(Vec::new()),
        }
    }

    /// Initial load and listener registration run concurrently; neither
    /// failure crashes the bridge.
    pub async fn start(&self) {
        tokio::join!(self.load_initial_state(), self.register_listeners());
    }

    async fn load_initial_state(&self) {
        let backend = &self.backend;
        let loaded = tokio::try_join!(
            backend.get_timer_state(),
            backend.load_routines(),
            backend.load_settings(),
        );
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }
        match loaded {
            Ok((timer_state, routines, settings)) => {
                self.store.dispatch(AppAction::Initialize {
                    timer_state,
                    routines,
                    settings,
                });
            }
            Err(error) => {
                tracing::error!(%error, "failed to load initial state");
                publish_notice(
                    &self.store,
                    local_notice(
                        AppErrorKind::Data,
                        INITIAL_LOAD_ERROR_TITLE,
                        Some(AppErrorAction::ReloadData),
                    ),
                );
            }
        }
    }

    async fn register_listeners(&self) {
        let registrations: Vec<(&'static str, EventHandler)> = vec![
            (
                TIMER_TICK_EVENT,
                parsed_handler(TIMER_TICK_EVENT, &self.store, |payload: TimerTickPayload| {
                    AppAction::TimerTick {
                        remaining_seconds: payload.remaining_seconds,
                    }
                }),
            ),
            (
                STEP_CHANGED_EVENT,
                parsed_handler(
                    STEP_CHANGED_EVENT,
                    &self.store,
                    |payload: StepChangedPayload| AppAction::StepChanged {
                        step: payload.step,
                        step_index: payload.step_index,
                    },
                ),
            ),
            (
                CHECK_IN_REQUIRED_EVENT,
                parsed_handler(
                    CHECK_IN_REQUIRED_EVENT,
                    &self.store,
                    |payload: CheckInRequiredPayload| AppAction::CheckInRequired {
                        check_in: payload.check_in,
                        step: payload.step,
                    },
                ),
            ),
            (
                CHECK_IN_TIMEOUT_EVENT,
                parsed_handler(
                    CHECK_IN_TIMEOUT_EVENT,
                    &self.store,
                    |payload: CheckInTimeoutPayload| AppAction::CheckInTimeout {
                        step_id: payload.step_id,
                    },
                ),
            ),
            (
                TIMER_PAUSED_EVENT,
                unit_handler(&self.store, AppAction::TimerPaused),
            ),
            (
                TIMER_RESUMED_EVENT,
                unit_handler(&self.store, AppAction::TimerResumed),
            ),
            (
                TIMER_STOPPED_EVENT,
                unit_handler(&self.store, AppAction::TimerStopped),
            ),
            (APP_ERROR_EVENT, error_handler(&self.store)),
        ];

        let mut registered = Vec::new();
        for (event, handler) in registrations {
            match self.channel.listen(event, handler).await {
                Ok(unlisten) => registered.push(unlisten),
                Err(error) => {
                    tracing::error!(%error, event, "failed to register event listener");
                }
            }
        }

        // Teardown may have started while a listen() was in flight; anything
        // registered after disposal is unregistered right away.
        let keep = {
            let Ok(mut guard) = self.unlisteners.lock() else {
                for unlisten in registered {
                    unlisten();
                }
                return;
            };
            if self.disposed.load(Ordering::SeqCst) {
                false
            } else {
                guard.extend(registered.drain(..));
                true
            }
        };
        if !keep {
            for unlisten in registered {
                unlisten();
            }
        }
    }

    /// Stops further dispatch and releases every registered listener.
    pub fn shutdown(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        let drained: Vec<Unlisten> = {
            let Ok(mut guard) = self.unlisteners.lock() else {
                return;
            };
            guard.drain(..).collect()
        };
        for unlisten in drained {
            unlisten();
        }
    }
}

/// Publishes a notice and schedules its expiry. At most one notice is
/// active; a replacement cancels the old expiry implicitly because the id
/// no longer matches when the timer fires.
pub fn publish_notice(store: &Arc<AppStore>, notice: AppErrorNotice) {
    let notice_id = notice.id.clone();
    let has_action = notice.action.is_some();
    store.dispatch(AppAction::AppError(notice));

    let store = Arc::clone(store);
    let delay = if has_action {
        NOTICE_DISMISS_WITH_ACTION_MS
    } else {
        NOTICE_DISMISS_MS
    };
    let expiry = sleep(Duration::from_millis(delay));
    tokio::spawn(async move {
        expiry.await;
        let still_active = store
            .state()
            .app_error
            .is_some_and(|active| active.id == notice_id);
        if still_active {
            store.dispatch(AppAction::ClearAppError);
        }
    });
}

fn parsed_handler<T, F>(event: &'static str, store: &Arc<AppStore>, to_action: F) -> EventHandler
where
    T: DeserializeOwned,
    F: Fn(T) -> AppAction + Send + Sync + 'static,
{
    let store = Arc::clone(store);
    Arc::new(move |value| match serde_json::from_value::<T>(value) {
        Ok(payload) => store.dispatch(to_action(payload)),
        Err(error) => {
            tracing::warn!(%error, event, "failed to decode event payload");
        }
    })
}

fn unit_handler(store: &Arc<AppStore>, action: AppAction) -> EventHandler {
    let store = Arc::clone(store);
    Arc::new(move |_value| store.dispatch(action.clone()))
}

fn error_handler(store: &Arc<AppStore>) -> EventHandler {
    let store = Arc::clone(store);
    Arc::new(
        move |value| match serde_json::from_value::<AppErrorPayload>(value) {
            Ok(payload) => publish_notice(&store, notice_from_payload(payload)),
            Err(error) => {
                tracing::warn!(%error, event = APP_ERROR_EVENT, "failed to decode event payload");
            }
        },
    )
}
