//! High score persistence
//!
//! A single best-run record, stored as a small JSON file alongside the
//! executable.

use std::fs;

use serde::{Deserialize, Serialize};

/// Default location of the high score file
pub const HIGH_SCORE_FILE: &str = "highscore.json";

/// The best final score across runs
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run; true when it beats the stored best
    pub fn update(&mut self, final_score: u32) -> bool {
        if final_score > self.best {
            self.best = final_score;
            true
        } else {
            false
        }
    }

    /// Load the stored record, starting fresh when the file is missing
    /// or unreadable
    pub fn load(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(record) => {
                    log::info!("loaded high score from {}", path);
                    record
                }
                Err(e) => {
                    log::warn!("high score file {} unreadable: {}", path, e);
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("no high score file, starting fresh");
                Self::new()
            }
        }
    }

    /// Write the record back; failures are logged, not fatal
    pub fn save(&self, path: &str) {
        if let Ok(json) = serde_json::to_string(self) {
            match fs::write(path, json) {
                Ok(()) => log::info!("high score saved ({})", self.best),
                Err(e) => log::warn!("could not save high score to {}: {}", path, e),
            }
        }
    }
}
