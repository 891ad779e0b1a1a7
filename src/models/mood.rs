use serde::Deserialize;
use serde_json::Value;

use super::journal::{display_text, is_blank};

/// Body of `POST /api/mood`.
#[derive(Debug, Default, Deserialize)]
pub struct MoodRequest {
    #[serde(default)]
    pub mood: Option<Value>,
}

impl MoodRequest {
    /// Echo message for a non-blank mood, `None` when the mood is missing.
    pub fn reply(&self) -> Option<String> {
        if is_blank(self.mood.as_ref()) {
            return None;
        }

        let mood = display_text(self.mood.as_ref()?);

        Some(format!("Mood received: {}. Stay strong, Supun.", mood))
    }
}
