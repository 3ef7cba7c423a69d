//! Personal best record
//!
//! One record `{score, name, maxLevel}` persisted as JSON.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, StoreError};

/// Longest accepted player name (characters)
pub const MAX_NAME_LEN: usize = 10;

/// Name recorded when the player leaves the field blank
pub const ANONYMOUS: &str = "Anonymous";

/// Stored best run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreData {
    pub score: i64,
    pub name: String,
    /// Highest level ever reached
    pub max_level: u32,
}

impl Default for HighScoreData {
    fn default() -> Self {
        Self {
            score: 0,
            name: "None".to_string(),
            max_level: 1,
        }
    }
}

impl HighScoreData {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "highScore";

    /// Load the stored record, falling back to the default when it is
    /// missing or unreadable
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match persistence::load_json::<Self>(store, Self::STORAGE_KEY) {
            Ok(Some(data)) => {
                log::info!("Loaded high score {} by {}", data.score, data.name);
                data
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(err) => {
                log::warn!("Ignoring stored high score: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        persistence::save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("High score saved ({} by {})", self.score, self.name);
        Ok(())
    }

    /// Whether a finished run beats the stored best
    pub fn is_new_high_score(&self, score: i64) -> bool {
        score > self.score
    }

    /// Replace the record with a confirmed new best
    pub fn record(&mut self, score: i64, name: &str, level: u32) {
        self.score = score;
        self.name = sanitize_name(name);
        self.max_level = self.max_level.max(level);
    }
}

/// Trim, default blank names and cap the length
pub fn sanitize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ANONYMOUS.to_string();
    }
    trimmed.chars().take(MAX_NAME_LEN).collect()
}
