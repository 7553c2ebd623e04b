use super::config::RehearsalConfig;
use super::result::{RehearsalResult, Script};
use super::thresholds::{FiredFlags, ThresholdEvent, ThresholdTracker};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Lifecycle stage of a rehearsal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Setup,
    Recording,
    Analyzing,
    Complete,
}

/// What a single tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub elapsed_secs: u64,
    /// Cues crossed on this tick, in severity order
    pub crossed: Vec<ThresholdEvent>,
    /// Set when the tick hit the recording ceiling and moved the session to Analyzing
    pub scoring: Option<ScoringTicket>,
}

/// Hand-off to the scoring service, stamped with the session generation it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringTicket {
    pub generation: u64,
    pub script: Script,
    pub elapsed_secs: u64,
}

/// Point-in-time view of a session, for rendering layers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub title: String,
    pub state: SessionState,
    pub paused: bool,
    pub elapsed_seconds: u64,
    pub clock: String,
    pub target_seconds: u64,
    pub warning_seconds: u64,
    pub exceeded_after_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u64>,
    pub progress_percent: u8,
    pub fired: FiredFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RehearsalResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring_error: Option<String>,
}

/// Rehearsal timer and lifecycle state machine
///
/// Every transition is an explicit method call that returns the resulting state.
/// Calls that are not valid from the current state leave the session untouched.
/// The session holds no timer of its own; see `RehearsalRunner` for the driver.
#[derive(Debug, Clone)]
pub struct RehearsalSession {
    config: RehearsalConfig,
    script: Script,
    state: SessionState,
    paused: bool,
    elapsed_secs: u64,
    thresholds: ThresholdTracker,
    result: Option<RehearsalResult>,
    scoring_error: Option<String>,
    generation: u64,
}

impl RehearsalSession {
    pub fn new(config: RehearsalConfig, script: Script) -> Self {
        let thresholds = ThresholdTracker::new(
            config.warning_secs(),
            config.target_secs(),
            config.exceeded_after_secs(),
        );

        Self {
            config,
            script,
            state: SessionState::Setup,
            paused: false,
            elapsed_secs: 0,
            thresholds,
            result: None,
            scoring_error: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &RehearsalConfig {
        &self.config
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True while the tick source should be running
    pub fn is_ticking(&self) -> bool {
        self.state == SessionState::Recording && !self.paused
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn fired(&self) -> FiredFlags {
        self.thresholds.fired()
    }

    pub fn result(&self) -> Option<&RehearsalResult> {
        self.result.as_ref()
    }

    pub fn scoring_error(&self) -> Option<&str> {
        self.scoring_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `start` would be accepted
    pub fn can_start(&self) -> bool {
        self.state == SessionState::Setup && self.script.has_title() && self.script.has_content()
    }

    /// Setup -> Recording
    pub fn start(&mut self) -> SessionState {
        if self.state != SessionState::Setup {
            warn!("Rehearsal already started (state: {:?})", self.state);
            return self.state;
        }
        if !self.can_start() {
            warn!("Rehearsal start rejected: title and script content are required");
            return self.state;
        }

        self.generation += 1;
        self.elapsed_secs = 0;
        self.paused = false;
        self.thresholds.clear();
        self.state = SessionState::Recording;

        info!(
            "Rehearsal started: \"{}\" (target {}s, {} speaker block(s))",
            self.script.title,
            self.config.target_secs(),
            self.script.speaker_count()
        );

        self.state
    }

    pub fn pause(&mut self) -> SessionState {
        if !self.is_ticking() {
            warn!("Pause ignored: rehearsal is not actively recording");
            return self.state;
        }

        self.paused = true;
        info!("Rehearsal paused at {}s", self.elapsed_secs);
        self.state
    }

    pub fn resume(&mut self) -> SessionState {
        if self.state != SessionState::Recording || !self.paused {
            warn!("Resume ignored: rehearsal is not paused");
            return self.state;
        }

        self.paused = false;
        info!("Rehearsal resumed at {}s", self.elapsed_secs);
        self.state
    }

    /// Advance the clock by one second and evaluate thresholds
    ///
    /// Ticks arriving while not actively recording are ignored.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_ticking() {
            return TickOutcome {
                elapsed_secs: self.elapsed_secs,
                ..TickOutcome::default()
            };
        }

        self.elapsed_secs += 1;
        let crossed = self.thresholds.evaluate(self.elapsed_secs);

        for event in &crossed {
            info!("Threshold crossed at {}s: {:?}", self.elapsed_secs, event);
        }

        let scoring = if self.elapsed_secs >= self.config.max_recording_secs {
            info!(
                "Recording ceiling of {}s reached, finishing automatically",
                self.config.max_recording_secs
            );
            self.finish()
        } else {
            None
        };

        TickOutcome {
            elapsed_secs: self.elapsed_secs,
            crossed,
            scoring,
        }
    }

    /// Recording -> Analyzing
    ///
    /// Returns the scoring hand-off, or `None` if the session was not recording
    /// (including a repeated call while already analyzing).
    pub fn finish(&mut self) -> Option<ScoringTicket> {
        if self.state != SessionState::Recording {
            warn!("Finish ignored: rehearsal is {:?}", self.state);
            return None;
        }

        self.state = SessionState::Analyzing;
        self.paused = false;
        self.scoring_error = None;

        info!("Rehearsal finished at {}s, analyzing", self.elapsed_secs);

        Some(ScoringTicket {
            generation: self.generation,
            script: self.script.clone(),
            elapsed_secs: self.elapsed_secs,
        })
    }

    /// Analyzing -> Complete
    ///
    /// Results from an earlier generation (the session was reset since the
    /// ticket was issued) are discarded and `false` is returned.
    pub fn complete(&mut self, generation: u64, result: RehearsalResult) -> bool {
        if generation != self.generation || self.state != SessionState::Analyzing {
            info!(
                "Discarding stale rehearsal result (ticket generation {}, current {}, state {:?})",
                generation, self.generation, self.state
            );
            return false;
        }

        info!("Rehearsal analysis complete: overall score {}", result.overall_score);
        self.result = Some(result);
        self.state = SessionState::Complete;
        true
    }

    /// Record a failed analysis; the session stays in Analyzing until reset
    pub fn fail(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if generation != self.generation || self.state != SessionState::Analyzing {
            return false;
        }
        self.scoring_error = Some(message.into());
        true
    }

    /// Any -> Setup, zeroing all mutable fields
    pub fn reset(&mut self) -> SessionState {
        debug!("Resetting rehearsal from {:?}", self.state);

        self.generation += 1;
        self.state = SessionState::Setup;
        self.paused = false;
        self.elapsed_secs = 0;
        self.thresholds.clear();
        self.result = None;
        self.scoring_error = None;

        info!("Rehearsal reset");
        self.state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            title: self.script.title.clone(),
            state: self.state,
            paused: self.paused,
            elapsed_seconds: self.elapsed_secs,
            clock: format_clock(self.elapsed_secs),
            target_seconds: self.config.target_secs(),
            warning_seconds: self.config.warning_secs(),
            exceeded_after_seconds: self.config.exceeded_after_secs(),
            remaining_seconds: self.remaining_secs(),
            progress_percent: self.progress_percent(),
            fired: self.fired(),
            result: self.result.clone(),
            scoring_error: self.scoring_error.clone(),
        }
    }

    /// Progress toward the target, capped at 100
    pub fn progress_percent(&self) -> u8 {
        let target = self.config.target_secs().max(1);
        (self.elapsed_secs.min(target) * 100 / target) as u8
    }

    /// Seconds left before the target, if it has not been reached
    pub fn remaining_secs(&self) -> Option<u64> {
        self.config.target_secs().checked_sub(self.elapsed_secs).filter(|r| *r > 0)
    }
}

/// Format seconds as `MM:SS`, or `HH:MM:SS` past an hour
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
