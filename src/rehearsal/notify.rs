use super::thresholds::ThresholdEvent;
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// A single cue pulse delivered to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pulse {
    pub event: ThresholdEvent,
    /// 0-based index within the cue
    pub index: u8,
    /// Elapsed seconds at the tick that crossed the threshold
    pub elapsed_secs: u64,
}

/// Audio/visual cue emitter
///
/// Implementations:
/// - `TracingSink`: logs each pulse (headless default)
/// - `ChannelSink`: forwards pulses to a receiver (UI bridge, tests)
pub trait NotificationSink: Send + Sync {
    fn pulse(&self, pulse: Pulse) -> Result<()>;
}

/// Logs pulses through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn pulse(&self, pulse: Pulse) -> Result<()> {
        info!(
            "Cue {:?} pulse {}/{} at {}s",
            pulse.event,
            pulse.index + 1,
            pulse.event.pulses(),
            pulse.elapsed_secs
        );
        Ok(())
    }
}

/// Forwards pulses over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Pulse>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Pulse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn pulse(&self, pulse: Pulse) -> Result<()> {
        self.tx
            .send(pulse)
            .map_err(|_| anyhow::anyhow!("Notification receiver dropped"))
    }
}

/// Emit all pulses for a crossed threshold
///
/// The first pulse is delivered before returning; the remainder follow on a
/// spawned task, `spacing` apart, whose handle is returned so the caller can
/// cancel pending pulses. Sink failures are logged and swallowed.
pub fn emit_cue(
    sink: &Arc<dyn NotificationSink>,
    event: ThresholdEvent,
    elapsed_secs: u64,
    spacing: Duration,
) -> Option<JoinHandle<()>> {
    let count = event.pulses();

    deliver(sink.as_ref(), Pulse { event, index: 0, elapsed_secs });

    if count < 2 {
        return None;
    }

    let sink = Arc::clone(sink);
    Some(tokio::spawn(async move {
        for index in 1..count {
            tokio::time::sleep(spacing).await;
            deliver(sink.as_ref(), Pulse { event, index, elapsed_secs });
        }
    }))
}

fn deliver(sink: &dyn NotificationSink, pulse: Pulse) {
    if let Err(e) = sink.pulse(pulse) {
        warn!("Failed to deliver {:?} pulse {}: {}", pulse.event, pulse.index, e);
    }
}
