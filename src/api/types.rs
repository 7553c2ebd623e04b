use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

/// Reading level the summary is written for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Elementary,
    Middle,
    High,
    #[default]
    College,
    Office,
}

/// Account category chosen at sign-up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Elementary,
    Middle,
    High,
    #[default]
    University,
    Worker,
}

impl From<UserType> for Audience {
    fn from(user_type: UserType) -> Self {
        match user_type {
            UserType::Elementary => Audience::Elementary,
            UserType::Middle => Audience::Middle,
            UserType::High => Audience::High,
            UserType::Worker => Audience::Office,
            UserType::University => Audience::College,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Friendly,
    Energetic,
}

// ============================================================================
// Text extraction
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

// ============================================================================
// Summaries
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryOptions {
    pub length: SummaryLength,
    pub audience: Audience,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSummaryRequest {
    pub title: String,
    pub text: String,
    pub options: SummaryOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSummaryResponse {
    pub summary_id: String,
    pub summary: String,
    #[serde(default)]
    pub outline: Vec<String>,
}

// ============================================================================
// Scripts
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOptions {
    pub tone: Tone,
    pub speaker_count: u32,
    pub target_minutes: u32,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            tone: Tone::Formal,
            speaker_count: 1,
            target_minutes: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScriptRequest {
    pub title: String,
    pub summary_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<Vec<String>>,
    pub options: ScriptOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScriptResponse {
    pub script_id: String,
    /// One block per speaker
    pub content: Vec<String>,
}
