//! Rehearsal timer and session state machine
//!
//! This module provides:
//! - `RehearsalSession`: Setup -> Recording -> Analyzing -> Complete lifecycle,
//!   elapsed-time bookkeeping and one-shot threshold cues
//! - `RehearsalRunner`: real-time driver owning the 1 Hz tick task
//! - `NotificationSink`: cue emitter seam
//! - `ScoringService`: analysis seam, with a banded mock implementation

mod config;
mod notify;
mod result;
mod runner;
mod scoring;
mod session;
mod thresholds;

pub use config::{
    RehearsalConfig, RehearsalConfigError, GRACE_SECS, MAX_RECORDING_SECS, MAX_TARGET_MINUTES,
    MIN_TARGET_MINUTES,
};
pub use notify::{emit_cue, ChannelSink, NotificationSink, Pulse, TracingSink};
pub use result::{RehearsalResult, Script};
pub use runner::RehearsalRunner;
pub use scoring::{
    build_result, compose_feedback, MockScoringService, ScoringService, REPEAT_WORD_BAND,
    SPEED_BAND, TIME_ACCURACY_BAND,
};
pub use session::{
    format_clock, RehearsalSession, ScoringTicket, SessionSnapshot, SessionState, TickOutcome,
};
pub use thresholds::{FiredFlags, ThresholdEvent, ThresholdTracker};
