//! Quiz configuration: JSON file with defaults when absent.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings the quiz core reads at session start. A running session keeps the
/// values it was created with even if the file changes underneath it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Whole-session time budget in seconds (not per question).
    pub total_quiz_time: u32,
    pub show_timer: bool,
    /// Force-submit with recorded answers when the clock hits zero.
    pub auto_submit: bool,
    pub questions_per_quiz: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            total_quiz_time: 300,
            show_timer: true,
            auto_submit: true,
            questions_per_quiz: 5,
        }
    }
}

impl QuizConfig {
    /// Load from `path`, falling back to defaults when the file is missing or
    /// unreadable. A malformed file is logged, not fatal.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("invalid config at {:?}, using defaults: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Db(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(self).map_err(|e| AppError::Db(e.to_string()))?;
        std::fs::write(path, raw).map_err(|e| AppError::Db(e.to_string()))?;
        Ok(())
    }
}

fn app_data_dir() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("com.nickdu.quizdesk")
}

pub fn default_db_path() -> PathBuf {
    app_data_dir().join("quiz.db")
}

pub fn default_config_path() -> PathBuf {
    app_data_dir().join("quiz_config.json")
}
