use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Shortest target a rehearsal may be configured with
pub const MIN_TARGET_MINUTES: u32 = 1;

/// Longest target a rehearsal may be configured with
pub const MAX_TARGET_MINUTES: u32 = 120;

/// Allowance past the target before the "exceeded" cue fires
pub const GRACE_SECS: u64 = 30;

/// Recording is force-finished once elapsed time reaches this ceiling
pub const MAX_RECORDING_SECS: u64 = 600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RehearsalConfigError {
    #[error("target minutes must be between 1 and 120, got {0}")]
    TargetOutOfRange(u32),

    #[error("tick interval must be non-zero")]
    ZeroTickInterval,

    #[error("grace period must be at least one second")]
    ZeroGrace,

    #[error("recording ceiling must be at least one second")]
    ZeroCeiling,
}

/// Configuration for a single rehearsal session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RehearsalConfig {
    /// User-chosen goal duration in minutes (1..=120)
    pub target_minutes: u32,

    /// Seconds past the target before the "exceeded" cue
    /// Default: 30
    pub grace_secs: u64,

    /// Hard ceiling on recorded seconds
    /// Default: 600 (10 minutes)
    pub max_recording_secs: u64,

    /// Gap between consecutive pulses of a multi-pulse cue
    pub pulse_spacing: Duration,

    /// Period of the recording tick
    pub tick_interval: Duration,
}

impl Default for RehearsalConfig {
    fn default() -> Self {
        Self {
            target_minutes: 5,
            grace_secs: GRACE_SECS,
            max_recording_secs: MAX_RECORDING_SECS,
            pulse_spacing: Duration::from_millis(200),
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl RehearsalConfig {
    /// Default configuration with the given target
    pub fn with_target_minutes(target_minutes: u32) -> Self {
        Self {
            target_minutes,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), RehearsalConfigError> {
        if !(MIN_TARGET_MINUTES..=MAX_TARGET_MINUTES).contains(&self.target_minutes) {
            return Err(RehearsalConfigError::TargetOutOfRange(self.target_minutes));
        }
        if self.tick_interval.is_zero() {
            return Err(RehearsalConfigError::ZeroTickInterval);
        }
        if self.grace_secs == 0 {
            return Err(RehearsalConfigError::ZeroGrace);
        }
        if self.max_recording_secs == 0 {
            return Err(RehearsalConfigError::ZeroCeiling);
        }
        Ok(())
    }

    pub fn target_secs(&self) -> u64 {
        u64::from(self.target_minutes) * 60
    }

    /// 90% of the target. Whole seconds since the target is a multiple of 60.
    pub fn warning_secs(&self) -> u64 {
        self.target_secs() * 9 / 10
    }

    /// The "exceeded" cue fires once elapsed time is strictly greater than this
    pub fn exceeded_after_secs(&self) -> u64 {
        self.target_secs() + self.grace_secs
    }
}
