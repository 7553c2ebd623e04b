use serde::{Deserialize, Serialize};

/// A one-shot cue raised when elapsed time crosses a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThresholdEvent {
    /// 90% of the target has elapsed
    Warning,
    /// The target has been reached
    TargetReached,
    /// The target plus grace period has been exceeded
    Exceeded,
}

impl ThresholdEvent {
    /// Number of notification pulses emitted for this cue
    pub fn pulses(self) -> u8 {
        match self {
            ThresholdEvent::Warning => 1,
            ThresholdEvent::TargetReached => 2,
            ThresholdEvent::Exceeded => 3,
        }
    }
}

/// Which cues have already fired in this session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiredFlags {
    pub warning: bool,
    pub target_reached: bool,
    pub exceeded: bool,
}

impl FiredFlags {
    pub fn any(&self) -> bool {
        self.warning || self.target_reached || self.exceeded
    }
}

/// Evaluates threshold crossings for one session
#[derive(Debug, Clone)]
pub struct ThresholdTracker {
    warning_secs: u64,
    target_secs: u64,
    exceeded_after_secs: u64,
    fired: FiredFlags,
}

impl ThresholdTracker {
    pub fn new(warning_secs: u64, target_secs: u64, exceeded_after_secs: u64) -> Self {
        debug_assert!(warning_secs < target_secs && target_secs < exceeded_after_secs);
        Self {
            warning_secs,
            target_secs,
            exceeded_after_secs,
            fired: FiredFlags::default(),
        }
    }

    pub fn fired(&self) -> FiredFlags {
        self.fired
    }

    pub fn clear(&mut self) {
        self.fired = FiredFlags::default();
    }

    /// Returns the cues newly crossed at `elapsed`, in severity order
    pub fn evaluate(&mut self, elapsed: u64) -> Vec<ThresholdEvent> {
        let mut crossed = Vec::new();

        if elapsed >= self.warning_secs && elapsed < self.target_secs && !self.fired.warning {
            self.fired.warning = true;
            crossed.push(ThresholdEvent::Warning);
        }

        if elapsed >= self.target_secs && !self.fired.target_reached {
            self.fired.target_reached = true;
            crossed.push(ThresholdEvent::TargetReached);
        }

        if elapsed > self.exceeded_after_secs && !self.fired.exceeded {
            self.fired.exceeded = true;
            crossed.push(ThresholdEvent::Exceeded);
        }

        crossed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ThresholdTracker {
        ThresholdTracker::new(270, 300, 330)
    }

    #[test]
    fn warning_fires_once_at_ninety_percent() {
        let mut t = tracker();
        assert!(t.evaluate(269).is_empty());
        assert_eq!(t.evaluate(270), vec![ThresholdEvent::Warning]);
        assert!(t.evaluate(271).is_empty());
        assert!(t.fired().warning);
    }

    #[test]
    fn exceeded_requires_strictly_greater_than_grace() {
        let mut t = tracker();
        t.evaluate(300);
        assert!(t.evaluate(330).is_empty());
        assert_eq!(t.evaluate(331), vec![ThresholdEvent::Exceeded]);
    }

    #[test]
    fn jumping_past_target_skips_warning() {
        let mut t = tracker();
        assert_eq!(t.evaluate(300), vec![ThresholdEvent::TargetReached]);
        assert!(!t.fired().warning);
    }

    #[test]
    fn clear_rearms_every_cue() {
        let mut t = tracker();
        t.evaluate(270);
        t.evaluate(331);
        assert!(t.fired().any());

        t.clear();
        assert_eq!(t.fired(), FiredFlags::default());
        assert_eq!(t.evaluate(270), vec![ThresholdEvent::Warning]);
    }

    #[test]
    fn pulse_counts_escalate() {
        assert_eq!(ThresholdEvent::Warning.pulses(), 1);
        assert_eq!(ThresholdEvent::TargetReached.pulses(), 2);
        assert_eq!(ThresholdEvent::Exceeded.pulses(), 3);
    }
}
