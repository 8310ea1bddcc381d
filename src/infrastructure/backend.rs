use crate::domain::models::{
    AppSettings, CheckInResponse, Routine, SessionStats, TimerState,
};
use crate::infrastructure::error::InfraError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Command surface of the backend process. The backend owns the countdown,
/// persistence and notification delivery; the client core talks to it only
/// through this trait, so tests and headless hosts can substitute their own
/// implementation.
#[async_trait]
pub trait TimerBackend: Send + Sync {
    async fn get_timer_state(&self) -> Result<TimerState, InfraError>;

    async fn load_routines(&self) -> Result<Vec<Routine>, InfraError>;

    async fn load_settings(&self) -> Result<AppSettings, InfraError>;

    async fn save_routine(&self, routine: &Routine) -> Result<(), InfraError>;

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), InfraError>;

    async fn get_session_stats(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<SessionStats, InfraError>;

    async fn start_routine(&self, routine_id: &str) -> Result<(), InfraError>;

    async fn pause_timer(&self) -> Result<(), InfraError>;

    async fn resume_timer(&self) -> Result<(), InfraError>;

    async fn skip_step(&self) -> Result<(), InfraError>;

    async fn stop_timer(&self) -> Result<(), InfraError>;

    async fn respond_to_check_in(&self, response: &CheckInResponse) -> Result<(), InfraError>;
}
