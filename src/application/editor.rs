//! Pure routine-editing transformations. Every operation takes the current
//! value and returns a new one; committing a draft goes through the same
//! `upsert-routine` action channel as every other state change.

use crate::application::next_id;
use crate::domain::models::{
    CheckInConfig, CheckInMode, RepeatMode, Routine, SoundOverride, SoundScheme, SoundSetting,
    Step,
};

pub const DEFAULT_STEP_DURATION_SECONDS: u32 = 300;
pub const DEFAULT_PROMPT_TIMEOUT_SECONDS: u32 = 15;
pub const DUPLICATE_NAME_SUFFIX: &str = "（コピー）";

pub fn create_step(order: usize) -> Step {
    Step {
        id: next_id("step"),
        order: order as u32,
        label: format!("ステップ {}", order + 1),
        duration_seconds: DEFAULT_STEP_DURATION_SECONDS,
        instruction: String::new(),
        sound_override: SoundOverride::Inherit,
        count_as_break: false,
        check_in: CheckInConfig::off(),
    }
}

pub fn create_routine() -> Routine {
    Routine {
        id: next_id("routine"),
        name: "新しいルーチン".to_string(),
        steps: vec![create_step(0)],
        repeat_mode: RepeatMode::Infinite,
        auto_advance: true,
        notifications: true,
        sound_default: SoundSetting::On,
        sound_scheme: SoundScheme::Default,
    }
}

/// Reassigns `order` to the array index. Required after every insert,
/// remove or reorder.
pub fn normalize_steps(steps: &mut [Step]) {
    for (index, step) in steps.iter_mut().enumerate() {
        step.order = index as u32;
    }
}

pub fn add_step(routine: &Routine) -> Routine {
    let mut next = routine.clone();
    next.steps.push(create_step(next.steps.len()));
    normalize_steps(&mut next.steps);
    next
}

pub fn remove_step(routine: &Routine, step_id: &str) -> Routine {
    let mut next = routine.clone();
    next.steps.retain(|step| step.id != step_id);
    normalize_steps(&mut next.steps);
    next
}

pub fn move_step(routine: &Routine, from_index: usize, to_index: usize) -> Routine {
    let mut next = routine.clone();
    if from_index >= next.steps.len() || to_index >= next.steps.len() {
        return next;
    }
    let step = next.steps.remove(from_index);
    next.steps.insert(to_index, step);
    normalize_steps(&mut next.steps);
    next
}

#[derive(Debug, Clone, Default)]
pub struct StepPatch {
    pub label: Option<String>,
    pub duration_seconds: Option<u32>,
    pub instruction: Option<String>,
    pub sound_override: Option<SoundOverride>,
    pub count_as_break: Option<bool>,
    pub check_in: Option<CheckInConfig>,
}

pub fn update_step(routine: &Routine, step_id: &str, patch: StepPatch) -> Routine {
    let mut next = routine.clone();
    if let Some(step) = next.steps.iter_mut().find(|step| step.id == step_id) {
        if let Some(label) = patch.label {
            step.label = label;
        }
        if let Some(duration_seconds) = patch.duration_seconds {
            step.duration_seconds = duration_seconds;
        }
        if let Some(instruction) = patch.instruction {
            step.instruction = instruction;
        }
        if let Some(sound_override) = patch.sound_override {
            step.sound_override = sound_override;
        }
        if let Some(count_as_break) = patch.count_as_break {
            step.count_as_break = count_as_break;
        }
        if let Some(check_in) = patch.check_in {
            step.check_in = check_in;
        }
    }
    next
}

#[derive(Debug, Clone, Default)]
pub struct RoutinePatch {
    pub name: Option<String>,
    pub repeat_mode: Option<RepeatMode>,
    pub auto_advance: Option<bool>,
    pub notifications: Option<bool>,
    pub sound_default: Option<SoundSetting>,
    pub sound_scheme: Option<SoundScheme>,
}

pub fn update_routine(routine: &Routine, patch: RoutinePatch) -> Routine {
    let mut next = routine.clone();
    if let Some(name) = patch.name {
        next.name = name;
    }
    if let Some(repeat_mode) = patch.repeat_mode {
        next.repeat_mode = repeat_mode;
    }
    if let Some(auto_advance) = patch.auto_advance {
        next.auto_advance = auto_advance;
    }
    if let Some(notifications) = patch.notifications {
        next.notifications = notifications;
    }
    if let Some(sound_default) = patch.sound_default {
        next.sound_default = sound_default;
    }
    if let Some(sound_scheme) = patch.sound_scheme {
        next.sound_scheme = sound_scheme;
    }
    next
}

pub fn duplicate_routine(routine: &Routine) -> Routine {
    let mut next = routine.clone();
    next.id = next_id("routine");
    next.name = format!("{}{DUPLICATE_NAME_SUFFIX}", routine.name);
    for step in &mut next.steps {
        step.id = next_id("step");
    }
    normalize_steps(&mut next.steps);
    next
}

/// Check-in mode transition: switching into `prompt` keeps an existing
/// timeout or installs the default; `gate` and `off` carry no timeout.
pub fn set_check_in_mode(check_in: &CheckInConfig, mode: CheckInMode) -> CheckInConfig {
    let mut next = check_in.clone();
    next.mode = mode;
    next.prompt_timeout_seconds = match mode {
        CheckInMode::Prompt => Some(
            check_in
                .prompt_timeout_seconds
                .unwrap_or(DEFAULT_PROMPT_TIMEOUT_SECONDS),
        ),
        CheckInMode::Gate | CheckInMode::Off => None,
    };
    next
}

/// Form-field coercion: parse as a number, fall back when it is not finite,
/// otherwise round and clamp to a minimum of 1.
pub fn coerce_positive(raw: &str, fallback: u32) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => (value.round() as u32).max(1),
        _ => fallback,
    }
}

/// Duration fields are edited in minutes but stored in seconds.
pub fn minutes_field_to_seconds(raw: &str, fallback_minutes: u32) -> u32 {
    coerce_positive(raw, fallback_minutes).saturating_mul(60)
}

/// Editor-local draft plus the focused step. Focus is a pure UI concern and
/// never leaves the editor; the committed value is only the routine.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub draft: Routine,
    pub focused_step_id: Option<String>,
}

impl EditorState {
    pub fn new(draft: Routine) -> Self {
        let focused_step_id = draft.steps.first().map(|step| step.id.clone());
        Self {
            draft,
            focused_step_id,
        }
    }

    pub fn add_step(&mut self) {
        self.draft = add_step(&self.draft);
        self.focused_step_id = self.draft.steps.last().map(|step| step.id.clone());
    }

    /// Removes a step. When the removed step held focus, focus moves to the
    /// step now occupying its index, else the previous one, else the first
    /// step, else nothing.
    pub fn remove_step(&mut self, step_id: &str) {
        let removed_index = self.draft.steps.iter().position(|step| step.id == step_id);
        let had_focus = self.focused_step_id.as_deref() == Some(step_id);
        self.draft = remove_step(&self.draft, step_id);

        if let (Some(removed_index), true) = (removed_index, had_focus) {
            let steps = &self.draft.steps;
            self.focused_step_id = steps
                .get(removed_index)
                .or_else(|| removed_index.checked_sub(1).and_then(|index| steps.get(index)))
                .or_else(|| steps.first())
                .map(|step| step.id.clone());
        }
    }

    pub fn move_step(&mut self, from_index: usize, to_index: usize) {
        self.draft = move_step(&self.draft, from_index, to_index);
    }

    pub fn update_step(&mut self, step_id: &str, patch: StepPatch) {
        self.draft = update_step(&self.draft, step_id, patch);
    }

    pub fn update_routine(&mut self, patch: RoutinePatch) {
        self.draft = update_routine(&self.draft, patch);
    }
}
