use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Script a rehearsal is performed against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Presentation title
    pub title: String,

    /// One text block per speaker, in speaking order
    pub blocks: Vec<String>,

    /// Identifier of a saved script this was loaded from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
}

impl Script {
    pub fn new(title: impl Into<String>, blocks: Vec<String>) -> Self {
        Self {
            title: title.into(),
            blocks,
            script_id: None,
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn has_content(&self) -> bool {
        self.blocks.iter().any(|b| !b.trim().is_empty())
    }

    pub fn speaker_count(&self) -> usize {
        self.blocks.len()
    }
}

/// Quantitative feedback for a finished rehearsal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RehearsalResult {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,

    /// Speaking pace score (0-100)
    pub speed_score: u8,

    /// Filler / repeated word score (0-100)
    pub repeat_word_score: u8,

    /// How close the rehearsal landed to its target (0-100)
    pub time_accuracy_score: u8,

    /// Rounded mean of the three sub-scores
    pub overall_score: u8,

    pub feedback_text: String,
    pub elapsed_seconds: u64,
    pub created_at: DateTime<Utc>,
}

impl RehearsalResult {
    pub fn overall(speed: u8, repeat_words: u8, time_accuracy: u8) -> u8 {
        let sum = u32::from(speed) + u32::from(repeat_words) + u32::from(time_accuracy);
        (f64::from(sum) / 3.0).round() as u8
    }
}

/// Short random identifier for rehearsal records
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..9].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_requires_non_blank_content() {
        assert!(!Script::new("Talk", vec![]).has_content());
        assert!(!Script::new("Talk", vec!["   ".into(), "".into()]).has_content());
        assert!(Script::new("Talk", vec!["".into(), "Hello".into()]).has_content());
        assert!(!Script::new("  ", vec!["Hello".into()]).has_title());
    }

    #[test]
    fn overall_is_rounded_mean() {
        assert_eq!(RehearsalResult::overall(80, 80, 80), 80);
        assert_eq!(RehearsalResult::overall(75, 80, 86), 80); // 80.33
        assert_eq!(RehearsalResult::overall(94, 94, 99), 96); // 95.67
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = RehearsalResult {
            id: "abc".into(),
            title: "Quarterly review".into(),
            script_id: None,
            speed_score: 90,
            repeat_word_score: 85,
            time_accuracy_score: 95,
            overall_score: 90,
            feedback_text: "ok".into(),
            elapsed_seconds: 240,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"speedScore\":90"));
        assert!(json.contains("\"overallScore\":90"));
        assert!(!json.contains("scriptId"));
    }
}
