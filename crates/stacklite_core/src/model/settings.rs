//! User preferences and the transient ask-question draft.

use serde::{Deserialize, Serialize};

/// Preferences persisted under the `userSettings` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub theme: String,
    pub notifications: bool,
    pub email_updates: bool,
    pub language: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            notifications: true,
            email_updates: false,
            language: "en".to_string(),
        }
    }
}

/// Transient draft persisted under the `askQuestion_draft` key.
///
/// Written by the additive auto-save path; cleared when the question is
/// committed or the draft is discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl QuestionDraft {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.tags.is_empty()
    }
}
