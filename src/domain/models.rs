use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RepeatMode {
    #[serde(rename = "infinite")]
    Infinite,
    #[serde(rename = "count")]
    Count { value: u32 },
    #[serde(rename = "duration")]
    Duration {
        #[serde(rename = "totalSeconds")]
        total_seconds: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundSetting {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundOverride {
    Inherit,
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundScheme {
    Default,
    EndDifferent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInMode {
    Off,
    Prompt,
    Gate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInChoice {
    Done,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepRunResult {
    Completed,
    Skipped,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppErrorKind {
    System,
    Data,
    Timer,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppErrorAction {
    ReloadData,
    ResetTimer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub name: String,
    pub steps: Vec<Step>,
    pub repeat_mode: RepeatMode,
    pub auto_advance: bool,
    pub notifications: bool,
    pub sound_default: SoundSetting,
    pub sound_scheme: SoundScheme,
}

impl Routine {
    pub fn validate(&self) -> Result<(), String> {
        validate_non_empty(&self.id, "routine.id")?;
        validate_non_empty(&self.name, "routine.name")?;
        if self.steps.is_empty() {
            return Err("routine must have at least one step".to_string());
        }
        for step in &self.steps {
            step.validate()?;
        }
        if !self.steps_normalized() {
            return Err("step order must match its index".to_string());
        }
        match self.repeat_mode {
            RepeatMode::Count { value } if value == 0 => {
                Err("repeat count must be at least 1".to_string())
            }
            RepeatMode::Duration { total_seconds } if total_seconds == 0 => {
                Err("repeat duration must be at least 1 second".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Whether every step's `order` equals its position in `steps`.
    pub fn steps_normalized(&self) -> bool {
        self.steps
            .iter()
            .enumerate()
            .all(|(index, step)| step.order as usize == index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub order: u32,
    pub label: String,
    pub duration_seconds: u32,
    pub instruction: String,
    pub sound_override: SoundOverride,
    pub count_as_break: bool,
    pub check_in: CheckInConfig,
}

impl Step {
    pub fn validate(&self) -> Result<(), String> {
        validate_non_empty(&self.id, "step.id")?;
        if self.duration_seconds == 0 {
            return Err("step duration must be at least 1 second".to_string());
        }
        self.check_in.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInConfig {
    pub mode: CheckInMode,
    pub prompt_title: Option<String>,
    pub prompt_body: Option<String>,
    pub prompt_timeout_seconds: Option<u32>,
}

impl CheckInConfig {
    pub fn off() -> Self {
        Self {
            mode: CheckInMode::Off,
            prompt_title: None,
            prompt_body: None,
            prompt_timeout_seconds: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(timeout) = self.prompt_timeout_seconds {
            if timeout == 0 {
                return Err("check-in timeout must be at least 1 second".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub routine_id: String,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub step_runs: Vec<StepRun>,
    pub totals: SessionTotals,
    pub muted_during_session: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRun {
    pub step_id: String,
    pub planned_duration_seconds: u32,
    pub actual_duration_seconds: u32,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub result: StepRunResult,
    pub check_in_result: Option<CheckInResult>,
    pub sound_played: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResult {
    pub mode: CheckInMode,
    pub responded_at: Option<String>,
    pub choice: Option<CheckInChoice>,
    #[serde(rename = "responseTimeMs")]
    pub response_time_ms: Option<u64>,
    pub timed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub step_id: String,
    pub choice: CheckInChoice,
    pub responded_at: Option<String>,
    #[serde(rename = "responseTimeMs")]
    pub response_time_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTotals {
    pub total_seconds: u32,
    pub work_seconds: u32,
    pub break_seconds: u32,
    pub cycles_count: u32,
    pub check_in_done_count: u32,
    pub check_in_skip_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub sessions_count: u32,
    pub cycles_count: u32,
    pub total_seconds: u32,
    pub work_seconds: u32,
    pub break_seconds: u32,
    pub check_in_done_count: u32,
    pub check_in_skip_count: u32,
    pub mute_rate: f32,
}

/// Mirror of the backend's timer state. The backend is the timing authority;
/// the client replaces this wholesale on `initialize`, patches it on events
/// and resets it on `timer-stopped`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub is_running: bool,
    pub is_paused: bool,
    pub current_session: Option<Session>,
    pub current_step_index: u32,
    pub remaining_seconds: u32,
    pub awaiting_check_in: Option<CheckInConfig>,
    pub awaiting_check_in_step: Option<Step>,
}

impl TimerState {
    /// `awaiting_check_in` and `awaiting_check_in_step` are set and cleared
    /// together; a half-set pair indicates a reducer bug.
    pub fn awaiting_pair_consistent(&self) -> bool {
        self.awaiting_check_in.is_some() == self.awaiting_check_in_step.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub notifications_enabled: bool,
    pub sound_default: SoundSetting,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            sound_default: SoundSetting::On,
        }
    }
}

/// Raw error event emitted by the backend. The kind and recoverability are
/// server-assigned; the client only derives the recovery action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppErrorPayload {
    pub kind: AppErrorKind,
    pub message: String,
    pub detail: Option<String>,
    pub recoverable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppErrorNotice {
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    pub kind: AppErrorKind,
    pub action: Option<AppErrorAction>,
}

fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field_name} must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_step() -> Step {
        Step {
            id: "step-1".to_string(),
            order: 0,
            label: "集中".to_string(),
            duration_seconds: 300,
            instruction: "Focus".to_string(),
            sound_override: SoundOverride::Inherit,
            count_as_break: false,
            check_in: CheckInConfig::off(),
        }
    }

    fn sample_routine() -> Routine {
        Routine {
            id: "routine-1".to_string(),
            name: "朝のルーチン".to_string(),
            steps: vec![sample_step()],
            repeat_mode: RepeatMode::Infinite,
            auto_advance: true,
            notifications: true,
            sound_default: SoundSetting::On,
            sound_scheme: SoundScheme::Default,
        }
    }

    #[test]
    fn routine_validate_accepts_valid_routine() {
        assert!(sample_routine().validate().is_ok());
    }

    #[test]
    fn routine_validate_rejects_empty_steps() {
        let mut routine = sample_routine();
        routine.steps.clear();
        assert_eq!(
            routine.validate(),
            Err("routine must have at least one step".to_string())
        );
    }

    #[test]
    fn routine_validate_rejects_zero_duration_step() {
        let mut routine = sample_routine();
        routine.steps[0].duration_seconds = 0;
        assert_eq!(
            routine.validate(),
            Err("step duration must be at least 1 second".to_string())
        );
    }

    #[test]
    fn routine_validate_rejects_zero_repeat_count() {
        let mut routine = sample_routine();
        routine.repeat_mode = RepeatMode::Count { value: 0 };
        assert_eq!(
            routine.validate(),
            Err("repeat count must be at least 1".to_string())
        );
    }

    #[test]
    fn routine_validate_rejects_unnormalized_orders() {
        let mut routine = sample_routine();
        routine.steps[0].order = 3;
        assert!(routine.validate().is_err());
        assert!(!routine.steps_normalized());
    }

    #[test]
    fn timer_state_default_is_stopped() {
        let state = TimerState::default();
        assert!(!state.is_running);
        assert!(!state.is_paused);
        assert_eq!(state.current_step_index, 0);
        assert_eq!(state.remaining_seconds, 0);
        assert!(state.current_session.is_none());
        assert!(state.awaiting_pair_consistent());
    }

    #[test]
    fn wire_format_uses_camel_case_and_tagged_repeat_mode() {
        let routine = Routine {
            repeat_mode: RepeatMode::Duration { total_seconds: 1500 },
            ..sample_routine()
        };
        let value = serde_json::to_value(&routine).expect("serialize routine");

        assert_eq!(value["repeatMode"]["type"], "duration");
        assert_eq!(value["repeatMode"]["totalSeconds"], 1500);
        assert_eq!(value["soundDefault"], "on");
        assert_eq!(value["soundScheme"], "default");
        assert_eq!(value["steps"][0]["durationSeconds"], 300);
        assert_eq!(value["steps"][0]["countAsBreak"], false);
        assert_eq!(value["steps"][0]["checkIn"]["mode"], "off");
    }

    #[test]
    fn error_action_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(AppErrorAction::ReloadData).expect("serialize"),
            serde_json::json!("reload-data")
        );
        assert_eq!(
            serde_json::to_value(AppErrorAction::ResetTimer).expect("serialize"),
            serde_json::json!("reset-timer")
        );
    }
}
