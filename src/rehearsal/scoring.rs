use super::result::{new_record_id, RehearsalResult, Script};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::ops::RangeInclusive;
use tokio::time::{sleep, Duration};
use tracing::info;

/// Speaking pace band produced by the mock scorer
pub const SPEED_BAND: RangeInclusive<u8> = 75..=94;

/// Repeated/filler word band produced by the mock scorer
pub const REPEAT_WORD_BAND: RangeInclusive<u8> = 80..=94;

/// Time accuracy band produced by the mock scorer
pub const TIME_ACCURACY_BAND: RangeInclusive<u8> = 85..=99;

/// Sub-scores at or above this contribute a strength clause
const STRENGTH_CUTOFF: u8 = 80;

/// Converts a finished recording into feedback metrics
///
/// Implementations:
/// - `MockScoringService`: delayed pseudo-random scores in fixed bands
/// - a real analysis backend can be substituted without touching the session
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn analyze(&self, script: &Script, elapsed_secs: u64) -> Result<RehearsalResult>;
}

/// Placeholder scorer that waits a fixed delay and returns banded random scores
pub struct MockScoringService {
    /// Simulated analysis delay
    delay: Duration,
}

impl MockScoringService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Scorer with no delay
    pub fn instant() -> Self {
        Self { delay: Duration::ZERO }
    }
}

impl Default for MockScoringService {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

#[async_trait]
impl ScoringService for MockScoringService {
    async fn analyze(&self, script: &Script, elapsed_secs: u64) -> Result<RehearsalResult> {
        info!(
            "Analyzing rehearsal \"{}\" ({}s recorded)",
            script.title, elapsed_secs
        );

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let (speed, repeat_words, time_accuracy) = {
            let mut rng = rand::thread_rng();
            (
                rng.gen_range(SPEED_BAND),
                rng.gen_range(REPEAT_WORD_BAND),
                rng.gen_range(TIME_ACCURACY_BAND),
            )
        };

        Ok(build_result(script, elapsed_secs, speed, repeat_words, time_accuracy))
    }
}

/// Assemble a result record from the three sub-scores
pub fn build_result(
    script: &Script,
    elapsed_secs: u64,
    speed: u8,
    repeat_words: u8,
    time_accuracy: u8,
) -> RehearsalResult {
    let overall = RehearsalResult::overall(speed, repeat_words, time_accuracy);
    let title = if script.has_title() {
        script.title.clone()
    } else {
        "Presentation rehearsal".to_string()
    };

    RehearsalResult {
        id: new_record_id(),
        title,
        script_id: script.script_id.clone(),
        speed_score: speed,
        repeat_word_score: repeat_words,
        time_accuracy_score: time_accuracy,
        overall_score: overall,
        feedback_text: compose_feedback(overall, speed, repeat_words, time_accuracy),
        elapsed_seconds: elapsed_secs,
        created_at: Utc::now(),
    }
}

/// Templated feedback assembled from score thresholds
pub fn compose_feedback(overall: u8, speed: u8, repeat_words: u8, time_accuracy: u8) -> String {
    let verdict = match overall {
        85.. => "an excellent presentation",
        70..=84 => "a good presentation",
        _ => "a presentation with room to improve",
    };

    let clauses = [
        (
            speed,
            "You kept a comfortable speaking pace",
            "Try to control your speaking pace a little more",
        ),
        (
            repeat_words,
            "Filler and repeated words were kept to a minimum",
            "Cut down on fillers such as \"um\", \"uh\" and \"so\"",
        ),
        (
            time_accuracy,
            "Your timing matched the target well",
            "Pay closer attention to how you divide your time",
        ),
    ];

    let mut strengths = vec![
        "- The structure of the talk is clear and logical".to_string(),
        "- The key points come across well".to_string(),
    ];
    let mut improvements = Vec::new();

    for (score, strength, improvement) in clauses {
        if score >= STRENGTH_CUTOFF {
            strengths.push(format!("- {}", strength));
        } else {
            improvements.push(format!("- {}", improvement));
        }
    }

    if improvements.is_empty() {
        improvements.push("- Nothing major; keep practicing to stay consistent".to_string());
    }

    format!(
        "[Overall feedback]\n\nOverall this was {}.\n\nStrengths:\n{}\n\nTo improve:\n{}\n\nNext time:\n- Practice more to build confidence\n- Keep eye contact with the audience\n- Rehearse emphasizing your core message",
        verdict,
        strengths.join("\n"),
        improvements.join("\n")
    )
}
