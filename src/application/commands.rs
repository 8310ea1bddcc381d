//! Backend command invocations. Failures are caught here, logged, and never
//! mutate the store: the UI stays on its last known-good state and the user
//! retries through the same control.

use crate::application::reducer::AppAction;
use crate::application::store::AppStore;
use crate::domain::models::{AppSettings, CheckInResponse, Routine, SessionStats};
use crate::infrastructure::backend::TimerBackend;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct AppCommands {
    backend: Arc<dyn TimerBackend>,
    store: Arc<AppStore>,
}

impl AppCommands {
    pub fn new(backend: Arc<dyn TimerBackend>, store: Arc<AppStore>) -> Self {
        Self { backend, store }
    }

    pub async fn start_routine(&self, routine_id: &str) {
        if let Err(error) = self.backend.start_routine(routine_id).await {
            tracing::error!(%error, routine_id, "start_routine failed");
        }
    }

    pub async fn pause_timer(&self) {
        if let Err(error) = self.backend.pause_timer().await {
            tracing::error!(%error, "pause_timer failed");
        }
    }

    pub async fn resume_timer(&self) {
        if let Err(error) = self.backend.resume_timer().await {
            tracing::error!(%error, "resume_timer failed");
        }
    }

    pub async fn skip_step(&self) {
        if let Err(error) = self.backend.skip_step().await {
            tracing::error!(%error, "skip_step failed");
        }
    }

    pub async fn stop_timer(&self) {
        if let Err(error) = self.backend.stop_timer().await {
            tracing::error!(%error, "stop_timer failed");
        }
    }

    /// Commits an edited routine: the store adopts it immediately, then the
    /// backend persists it. A persistence failure is logged only; the
    /// committed value stays visible and saving again retries.
    pub async fn save_routine(&self, routine: Routine) {
        self.store.dispatch(AppAction::UpsertRoutine(routine.clone()));
        if let Err(error) = self.backend.save_routine(&routine).await {
            tracing::error!(%error, routine_id = %routine.id, "save_routine failed");
        }
    }

    pub async fn save_settings(&self, settings: AppSettings) {
        if let Err(error) = self.backend.save_settings(&settings).await {
            tracing::error!(%error, "save_settings failed");
        }
    }

    /// Answers a pending prompt-mode check-in. The gate variant is cleared
    /// by the backend's step-changed event instead.
    pub async fn respond_to_check_in(&self, response: CheckInResponse) {
        match self.backend.respond_to_check_in(&response).await {
            Ok(()) => self.store.dispatch(AppAction::CheckInCleared),
            Err(error) => {
                tracing::error!(%error, step_id = %response.step_id, "respond_to_check_in failed");
            }
        }
    }

    pub async fn session_stats(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Option<SessionStats> {
        match self.backend.get_session_stats(from, to).await {
            Ok(stats) => Some(stats),
            Err(error) => {
                tracing::error!(%error, "get_session_stats failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::editor::create_routine;
    use crate::domain::models::{
        CheckInChoice, CheckInConfig, CheckInMode, SoundOverride, Step, TimerState,
    };
    use crate::infrastructure::error::InfraError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        fail_commands: bool,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingBackend {
        fn failing() -> Self {
            Self {
                fail_commands: true,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: &str) -> Result<(), InfraError> {
            self.calls
                .lock()
                .expect("calls lock")
                .push(call.to_string());
            if self.fail_commands {
                return Err(InfraError::Backend(format!("{call} failed")));
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl TimerBackend for RecordingBackend {
        async fn get_timer_state(&self) -> Result<TimerState, InfraError> {
            Ok(TimerState::default())
        }

        async fn load_routines(&self) -> Result<Vec<Routine>, InfraError> {
            Ok(Vec::new())
        }

        async fn load_settings(&self) -> Result<AppSettings, InfraError> {
            Ok(AppSettings::default())
        }

        async fn save_routine(&self, _routine: &Routine) -> Result<(), InfraError> {
            self.record("save_routine")
        }

        async fn save_settings(&self, _settings: &AppSettings) -> Result<(), InfraError> {
            self.record("save_settings")
        }

        async fn get_session_stats(
            &self,
            _from: DateTime<Utc>,
            _to: DateTime<Utc>,
        ) -> Result<SessionStats, InfraError> {
            self.record("get_session_stats")?;
            Ok(SessionStats {
                sessions_count: 2,
                ..SessionStats::default()
            })
        }

        async fn start_routine(&self, _routine_id: &str) -> Result<(), InfraError> {
            self.record("start_routine")
        }

        async fn pause_timer(&self) -> Result<(), InfraError> {
            self.record("pause_timer")
        }

        async fn resume_timer(&self) -> Result<(), InfraError> {
            self.record("resume_timer")
        }

        async fn skip_step(&self) -> Result<(), InfraError> {
            self.record("skip_step")
        }

        async fn stop_timer(&self) -> Result<(), InfraError> {
            self.record("stop_timer")
        }

        async fn respond_to_check_in(
            &self,
            _response: &CheckInResponse,
        ) -> Result<(), InfraError> {
            self.record("respond_to_check_in")
        }
    }

    fn commands_with(
        backend: RecordingBackend,
    ) -> (Arc<RecordingBackend>, Arc<AppStore>, AppCommands) {
        let backend = Arc::new(backend);
        let store = Arc::new(AppStore::new());
        let commands = AppCommands::new(
            Arc::clone(&backend) as Arc<dyn TimerBackend>,
            Arc::clone(&store),
        );
        (backend, store, commands)
    }

    fn pending_prompt_action() -> AppAction {
        AppAction::CheckInRequired {
            check_in: CheckInConfig {
                mode: CheckInMode::Prompt,
                prompt_timeout_seconds: Some(15),
                ..CheckInConfig::off()
            },
            step: Step {
                id: "step-1".to_string(),
                order: 0,
                label: "集中".to_string(),
                duration_seconds: 300,
                instruction: String::new(),
                sound_override: SoundOverride::Inherit,
                count_as_break: false,
                check_in: CheckInConfig::off(),
            },
        }
    }

    #[tokio::test]
    async fn control_commands_reach_backend_without_touching_state() {
        let (backend, store, commands) = commands_with(RecordingBackend::default());
        let before = store.state();

        commands.start_routine("routine-1").await;
        commands.pause_timer().await;
        commands.resume_timer().await;
        commands.skip_step().await;
        commands.stop_timer().await;

        assert_eq!(
            backend.calls(),
            vec![
                "start_routine",
                "pause_timer",
                "resume_timer",
                "skip_step",
                "stop_timer"
            ]
        );
        assert_eq!(store.state(), before);
    }

    #[tokio::test]
    async fn command_failure_leaves_state_untouched() {
        let (_backend, store, commands) = commands_with(RecordingBackend::failing());
        let before = store.state();

        commands.pause_timer().await;
        commands.stop_timer().await;

        assert_eq!(store.state(), before);
        assert!(store.state().app_error.is_none());
    }

    #[tokio::test]
    async fn save_routine_upserts_even_when_persistence_fails() {
        let (_backend, store, commands) = commands_with(RecordingBackend::failing());
        let routine = create_routine();

        commands.save_routine(routine.clone()).await;

        let state = store.state();
        assert_eq!(state.routines.len(), 1);
        assert_eq!(state.routines[0].id, routine.id);
    }

    #[tokio::test]
    async fn successful_check_in_response_clears_pending_prompt() {
        let (_backend, store, commands) = commands_with(RecordingBackend::default());
        store.dispatch(pending_prompt_action());

        commands
            .respond_to_check_in(CheckInResponse {
                step_id: "step-1".to_string(),
                choice: CheckInChoice::Done,
                responded_at: Some(Utc::now().to_rfc3339()),
                response_time_ms: Some(1_800),
            })
            .await;

        assert!(store.state().timer_state.awaiting_check_in.is_none());
    }

    #[tokio::test]
    async fn failed_check_in_response_keeps_prompt_pending() {
        let (_backend, store, commands) = commands_with(RecordingBackend::failing());
        store.dispatch(pending_prompt_action());

        commands
            .respond_to_check_in(CheckInResponse {
                step_id: "step-1".to_string(),
                choice: CheckInChoice::Skip,
                responded_at: None,
                response_time_ms: None,
            })
            .await;

        assert!(store.state().timer_state.awaiting_check_in.is_some());
    }

    #[tokio::test]
    async fn session_stats_returns_none_on_failure() {
        let (_backend, _store, commands) = commands_with(RecordingBackend::failing());
        let stats = commands.session_stats(Utc::now(), Utc::now()).await;
        assert!(stats.is_none());

        let (_backend, _store, commands) = commands_with(RecordingBackend::default());
        let stats = commands.session_stats(Utc::now(), Utc::now()).await;
        assert_eq!(stats.map(|s| s.sessions_count), Some(2));
    }
}
