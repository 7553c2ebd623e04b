use super::store::Store;
use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fixed auto-save slots, one per editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutoSaveKey {
    MaterialSummary,
    Script,
    Qa,
    Ppt,
}

impl AutoSaveKey {
    pub fn as_str(self) -> &'static str {
        match self {
            AutoSaveKey::MaterialSummary => "prepnote_autosave_summary",
            AutoSaveKey::Script => "prepnote_autosave_script",
            AutoSaveKey::Qa => "prepnote_autosave_qa",
            AutoSaveKey::Ppt => "prepnote_autosave_ppt",
        }
    }
}

/// Stored value plus the time it was saved (milliseconds since the epoch)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSaveEntry<T> {
    pub timestamp: i64,
    pub data: T,
}

impl<T> AutoSaveEntry<T> {
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Timestamped auto-save over a `Store`
///
/// Save and clear failures are logged, never surfaced. Entries that fail to
/// parse are removed and reported as absent.
#[derive(Clone)]
pub struct AutoSave {
    store: Arc<dyn Store>,
}

impl AutoSave {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn save<T: Serialize>(&self, key: AutoSaveKey, data: &T) {
        self.save_at(key, data, Utc::now());
    }

    pub fn save_at<T: Serialize>(&self, key: AutoSaveKey, data: &T, now: DateTime<Utc>) {
        let entry = AutoSaveEntry {
            timestamp: now.timestamp_millis(),
            data,
        };
        let written = serde_json::to_string(&entry)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(key.as_str(), &json));

        match written {
            Ok(()) => debug!("Auto-saved {}", key.as_str()),
            Err(e) => warn!("Auto-save failed for {}: {}", key.as_str(), e),
        }
    }

    pub fn load<T: DeserializeOwned>(&self, key: AutoSaveKey) -> Option<AutoSaveEntry<T>> {
        let raw = match self.store.get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to load auto-save {}: {}", key.as_str(), e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Discarding corrupt auto-save {}: {}", key.as_str(), e);
                self.clear(key);
                None
            }
        }
    }

    pub fn clear(&self, key: AutoSaveKey) {
        if let Err(e) = self.store.remove(key.as_str()) {
            warn!("Failed to clear auto-save {}: {}", key.as_str(), e);
        }
    }
}

/// Human-readable age of a saved entry
///
/// Under a minute: "just now"; under an hour: "N min ago"; under a day:
/// "N h ago"; otherwise the calendar date ("Mar 4").
pub fn format_saved_at(saved: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(saved);

    if diff.num_seconds() < 60 {
        "just now".to_string()
    } else if diff.num_minutes() < 60 {
        format!("{} min ago", diff.num_minutes())
    } else if diff.num_hours() < 24 {
        format!("{} h ago", diff.num_hours())
    } else {
        format!("{} {}", saved.format("%b"), saved.day())
    }
}

/// In-progress summary editor contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub edited_text: String,
}

impl SummaryDraft {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.extracted_text.is_empty() && self.edited_text.is_empty()
    }
}

/// Store key for the summary editor draft
pub const SUMMARY_DRAFT_KEY: &str = "prepnote_summary_draft";

/// Auto-save / restore policy for the summary editor
///
/// - every edit is persisted with `save`
/// - on the next visit `restore` offers a non-empty draft to `confirm`;
///   declining or a corrupt record removes it
/// - `discard` clears it after an explicit reset or a successful save
#[derive(Clone)]
pub struct SummaryDraftKeeper {
    store: Arc<dyn Store>,
}

impl SummaryDraftKeeper {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn save(&self, draft: &SummaryDraft) -> Result<()> {
        let json = serde_json::to_string(draft)?;
        self.store.set(SUMMARY_DRAFT_KEY, &json)
    }

    pub fn restore<F>(&self, confirm: F) -> Option<SummaryDraft>
    where
        F: FnOnce(&SummaryDraft) -> bool,
    {
        let raw = match self.store.get(SUMMARY_DRAFT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read summary draft: {}", e);
                return None;
            }
        };

        let draft: SummaryDraft = match serde_json::from_str(&raw) {
            Ok(draft) => draft,
            Err(e) => {
                warn!("Discarding corrupt summary draft: {}", e);
                self.discard();
                return None;
            }
        };

        if draft.is_empty() {
            return None;
        }

        if confirm(&draft) {
            debug!("Restored summary draft \"{}\"", draft.title);
            Some(draft)
        } else {
            self.discard();
            None
        }
    }

    pub fn discard(&self) {
        if let Err(e) = self.store.remove(SUMMARY_DRAFT_KEY) {
            warn!("Failed to remove summary draft: {}", e);
        }
    }
}
