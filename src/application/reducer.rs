//! The app-state reducer. Backend events and user actions are expressed as
//! `AppAction` values and folded into `AppState` by `reduce`, a pure total
//! function: every mutation in the client funnels through it.

use crate::application::next_id;
use crate::domain::models::{
    AppErrorAction, AppErrorKind, AppErrorNotice, AppErrorPayload, AppSettings, CheckInConfig,
    CheckInMode, Routine, Step, TimerState,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppView {
    Timer,
    Editor,
    Stats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub current_view: AppView,
    pub timer_state: TimerState,
    pub routines: Vec<Routine>,
    /// The active routine is a weak reference: only the id is stored and it
    /// is re-resolved against `routines` on every read, so edits to the
    /// routine list can never leave a stale snapshot behind.
    pub current_routine_id: Option<String>,
    pub global_mute: bool,
    pub settings: AppSettings,
    pub app_error: Option<AppErrorNotice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            current_view: AppView::Timer,
            timer_state: TimerState::default(),
            routines: Vec::new(),
            current_routine_id: None,
            global_mute: false,
            settings: AppSettings::default(),
            app_error: None,
        }
    }
}

impl AppState {
    pub fn current_routine(&self) -> Option<&Routine> {
        let id = self.current_routine_id.as_deref()?;
        self.routines.iter().find(|routine| routine.id == id)
    }
}

#[derive(Debug, Clone)]
pub enum AppAction {
    Initialize {
        timer_state: TimerState,
        routines: Vec<Routine>,
        settings: AppSettings,
    },
    SetCurrentView(AppView),
    SetCurrentRoutine(Option<String>),
    UpsertRoutine(Routine),
    TimerTick {
        remaining_seconds: u32,
    },
    StepChanged {
        step: Step,
        step_index: u32,
    },
    CheckInRequired {
        check_in: CheckInConfig,
        step: Step,
    },
    CheckInTimeout {
        step_id: String,
    },
    CheckInCleared,
    TimerPaused,
    TimerResumed,
    TimerStopped,
    AppError(AppErrorNotice),
    ClearAppError,
}

fn resolve_routine_id(routines: &[Routine], routine_id: Option<&str>) -> Option<String> {
    let routine_id = routine_id?;
    routines
        .iter()
        .find(|routine| routine.id == routine_id)
        .map(|routine| routine.id.clone())
}

fn routine_id_containing_step(routines: &[Routine], step_id: &str) -> Option<String> {
    routines
        .iter()
        .find(|routine| routine.steps.iter().any(|step| step.id == step_id))
        .map(|routine| routine.id.clone())
}

fn upsert_routine(routines: &[Routine], routine: Routine) -> Vec<Routine> {
    let mut next = routines.to_vec();
    match next.iter_mut().find(|item| item.id == routine.id) {
        Some(existing) => *existing = routine,
        None => next.push(routine),
    }
    next
}

pub fn reduce(state: &AppState, action: AppAction) -> AppState {
    match action {
        AppAction::Initialize {
            timer_state,
            routines,
            settings,
        } => {
            let session_routine_id = timer_state
                .current_session
                .as_ref()
                .map(|session| session.routine_id.clone());
            let current_routine_id =
                resolve_routine_id(&routines, session_routine_id.as_deref());
            AppState {
                timer_state,
                routines,
                settings,
                current_routine_id,
                ..state.clone()
            }
        }
        AppAction::SetCurrentView(view) => AppState {
            current_view: view,
            ..state.clone()
        },
        AppAction::SetCurrentRoutine(routine_id) => AppState {
            current_routine_id: resolve_routine_id(&state.routines, routine_id.as_deref()),
            ..state.clone()
        },
        AppAction::UpsertRoutine(routine) => {
            let adopted = if state.current_routine_id.is_none() && state.routines.is_empty() {
                Some(routine.id.clone())
            } else {
                state.current_routine_id.clone()
            };
            AppState {
                routines: upsert_routine(&state.routines, routine),
                current_routine_id: adopted,
                ..state.clone()
            }
        }
        AppAction::TimerTick { remaining_seconds } => AppState {
            timer_state: TimerState {
                is_running: true,
                remaining_seconds,
                ..state.timer_state.clone()
            },
            ..state.clone()
        },
        AppAction::StepChanged { step, step_index } => {
            let matched = routine_id_containing_step(&state.routines, &step.id);
            AppState {
                current_routine_id: matched.or_else(|| state.current_routine_id.clone()),
                timer_state: TimerState {
                    is_running: true,
                    is_paused: false,
                    current_step_index: step_index,
                    awaiting_check_in: None,
                    awaiting_check_in_step: None,
                    ..state.timer_state.clone()
                },
                ..state.clone()
            }
        }
        AppAction::CheckInRequired { check_in, step } => {
            // A gate blocks progress, so the backend pauses and we mirror
            // that; a prompt leaves the pause flag as it was.
            let is_paused = if check_in.mode == CheckInMode::Gate {
                true
            } else {
                state.timer_state.is_paused
            };
            AppState {
                timer_state: TimerState {
                    is_running: true,
                    is_paused,
                    awaiting_check_in: Some(check_in),
                    awaiting_check_in_step: Some(step),
                    ..state.timer_state.clone()
                },
                ..state.clone()
            }
        }
        // Only one check-in can be pending at a time, so the timed-out
        // step id is not matched against the pending one.
        AppAction::CheckInTimeout { step_id: _ } | AppAction::CheckInCleared => AppState {
            timer_state: TimerState {
                awaiting_check_in: None,
                awaiting_check_in_step: None,
                ..state.timer_state.clone()
            },
            ..state.clone()
        },
        AppAction::TimerPaused => AppState {
            timer_state: TimerState {
                is_running: true,
                is_paused: true,
                ..state.timer_state.clone()
            },
            ..state.clone()
        },
        AppAction::TimerResumed => AppState {
            timer_state: TimerState {
                is_running: true,
                is_paused: false,
                ..state.timer_state.clone()
            },
            ..state.clone()
        },
        AppAction::TimerStopped => AppState {
            timer_state: TimerState::default(),
            ..state.clone()
        },
        AppAction::AppError(notice) => AppState {
            app_error: Some(notice),
            ..state.clone()
        },
        AppAction::ClearAppError => AppState {
            app_error: None,
            ..state.clone()
        },
    }
}

pub fn resolve_error_action(
    kind: AppErrorKind,
    recoverable: bool,
) -> Option<AppErrorAction> {
    if !recoverable {
        return None;
    }
    match kind {
        AppErrorKind::Timer => Some(AppErrorAction::ResetTimer),
        AppErrorKind::Data | AppErrorKind::System => Some(AppErrorAction::ReloadData),
        AppErrorKind::Audio => None,
    }
}

pub fn notice_from_payload(payload: AppErrorPayload) -> AppErrorNotice {
    AppErrorNotice {
        id: next_id("error"),
        title: payload.message,
        body: payload.detail,
        kind: payload.kind,
        action: resolve_error_action(payload.kind, payload.recoverable),
    }
}

pub fn local_notice(
    kind: AppErrorKind,
    title: impl Into<String>,
    action: Option<AppErrorAction>,
) -> AppErrorNotice {
    AppErrorNotice {
        id: next_id("error"),
        title: title.into(),
        body: None,
        kind,
        action,
    }
}
