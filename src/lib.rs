//! Client core of the McCall routine timer: domain model, routine-editing
//! engine, app-state reducer and the event bridge that reconciles backend
//! events into one consistent state tree. The backend process owns the
//! countdown and persistence; hosts connect it through [`TimerBackend`] and
//! [`EventChannel`].

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::commands::AppCommands;
pub use application::editor;
pub use application::format;
pub use application::reducer::{AppAction, AppState, AppView, reduce};
pub use application::store::AppStore;
pub use domain::models::{
    AppErrorAction, AppErrorKind, AppErrorNotice, AppErrorPayload, AppSettings, CheckInChoice,
    CheckInConfig, CheckInMode, CheckInResponse, CheckInResult, RepeatMode, Routine, Session,
    SessionStats, SessionTotals, SoundOverride, SoundScheme, SoundSetting, Step, StepRun,
    StepRunResult, TimerState,
};
pub use infrastructure::backend::TimerBackend;
pub use infrastructure::bridge::EventBridge;
pub use infrastructure::channel::{EventChannel, EventHandler, LocalEventChannel, Unlisten};
pub use infrastructure::error::InfraError;
pub use infrastructure::storage::JsonDataStore;
