//! Names and payloads of the backend's event channels. The wire format is
//! camelCase JSON, matching what the backend emits.

use crate::domain::models::{CheckInConfig, Step};
use serde::{Deserialize, Serialize};

pub const TIMER_TICK_EVENT: &str = "timer-tick";
pub const STEP_CHANGED_EVENT: &str = "step-changed";
pub const CHECK_IN_REQUIRED_EVENT: &str = "check-in-required";
pub const CHECK_IN_TIMEOUT_EVENT: &str = "check-in-timeout";
pub const TIMER_PAUSED_EVENT: &str = "timer-paused";
pub const TIMER_RESUMED_EVENT: &str = "timer-resumed";
pub const TIMER_STOPPED_EVENT: &str = "timer-stopped";
pub const APP_ERROR_EVENT: &str = "app-error";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerTickPayload {
    pub remaining_seconds: u32,
    pub step_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepChangedPayload {
    pub step: Step,
    pub step_index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequiredPayload {
    pub check_in: CheckInConfig,
    pub step: Step,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInTimeoutPayload {
    pub step_id: String,
}
