//! Module Record Module
//!
//! Load state of a single named code module.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Module State ==
/// `NotLoaded -> Loading -> Loaded`, falling back to `NotLoaded` when a load
/// fails. `Loaded` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleState {
    NotLoaded,
    Loading,
    Loaded,
}

// == Module Record ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleRecord {
    pub name: String,
    pub state: ModuleState,
    /// Number of times a loader has been invoked for this name
    pub load_attempts: u32,
    /// Duration of the load that succeeded
    pub load_time_ms: Option<u64>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl ModuleRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ModuleState::NotLoaded,
            load_attempts: 0,
            load_time_ms: None,
            loaded_at: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state == ModuleState::Loaded
    }
}
