//! JSON file store matching the backend's on-disk layout: routines.json,
//! settings.json and sessions.json under one data directory. The live app
//! persists through the backend; this store backs fixtures and headless
//! embedding.

use crate::domain::models::{AppSettings, Routine, Session};
use crate::infrastructure::error::InfraError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const ROUTINES_JSON: &str = "routines.json";
const SETTINGS_JSON: &str = "settings.json";
const SESSIONS_JSON: &str = "sessions.json";

#[derive(Debug, Clone)]
pub struct JsonDataStore {
    base_dir: PathBuf,
    routines_path: PathBuf,
    settings_path: PathBuf,
    sessions_path: PathBuf,
}

impl JsonDataStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, InfraError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        let store = Self {
            routines_path: base_dir.join(ROUTINES_JSON),
            settings_path: base_dir.join(SETTINGS_JSON),
            sessions_path: base_dir.join(SESSIONS_JSON),
            base_dir,
        };

        if !store.routines_path.exists() {
            store.write_json(&store.routines_path, &Vec::<Routine>::new())?;
        }
        if !store.sessions_path.exists() {
            store.write_json(&store.sessions_path, &Vec::<Session>::new())?;
        }
        Ok(store)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn load_routines(&self) -> Result<Vec<Routine>, InfraError> {
        if !self.routines_path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.routines_path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Insert-or-replace by id, mirroring the `upsert-routine` action.
    pub fn save_routine(&self, routine: Routine) -> Result<(), InfraError> {
        let mut routines = self.load_routines()?;
        match routines.iter_mut().find(|item| item.id == routine.id) {
            Some(existing) => *existing = routine,
            None => routines.push(routine),
        }
        self.save_routines(&routines)
    }

    pub fn save_routines(&self, routines: &[Routine]) -> Result<(), InfraError> {
        self.write_json(&self.routines_path, &routines)
    }

    /// Defaults apply when the settings file has never been written.
    pub fn load_settings(&self) -> Result<AppSettings, InfraError> {
        if !self.settings_path.exists() {
            return Ok(AppSettings::default());
        }
        let contents = fs::read_to_string(&self.settings_path)?;
        if contents.trim().is_empty() {
            return Ok(AppSettings::default());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<(), InfraError> {
        self.write_json(&self.settings_path, settings)
    }

    pub fn load_sessions(&self) -> Result<Vec<Session>, InfraError> {
        if !self.sessions_path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.sessions_path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn append_session(&self, session: Session) -> Result<(), InfraError> {
        let mut sessions = self.load_sessions()?;
        sessions.push(session);
        self.write_json(&self.sessions_path, &sessions)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), InfraError> {
        let formatted = serde_json::to_string_pretty(value)?;
        fs::write(path, format!("{formatted}\n"))?;
        Ok(())
    }
}
