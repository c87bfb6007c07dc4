//! Threshold comparison with a cooldown latch.

use std::time::{Duration, Instant};

/// Outcome of evaluating one loudness value against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    Fire,
    Suppressed,
    BelowThreshold,
}

impl AlertDecision {
    pub fn label(self) -> &'static str {
        match self {
            AlertDecision::Fire => "fire",
            AlertDecision::Suppressed => "suppressed",
            AlertDecision::BelowThreshold => "below_threshold",
        }
    }
}

/// Decides when a loudness value should raise an alert.
///
/// An evaluation fires only when the value is strictly above the threshold
/// and the cooldown has strictly elapsed since the last firing. Values seen
/// during the cooldown are reported as suppressed and never fire
/// retroactively once it expires.
#[derive(Debug, Clone)]
pub struct ThresholdMonitor {
    threshold: f32,
    cooldown: Duration,
    last_fired_at: Option<Instant>,
}

impl ThresholdMonitor {
    pub fn new(threshold: f32, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            last_fired_at: None,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Decide for one value. Mutates only the last-fired timestamp, and only
    /// on a firing.
    pub fn evaluate(&mut self, value: f32, now: Instant) -> AlertDecision {
        if value <= self.threshold {
            return AlertDecision::BelowThreshold;
        }
        if let Some(last) = self.last_fired_at {
            // duration_since saturates to zero if `now` precedes `last`.
            if now.duration_since(last) <= self.cooldown {
                return AlertDecision::Suppressed;
            }
        }
        self.last_fired_at = Some(now);
        AlertDecision::Fire
    }

    pub fn last_fired_at(&self) -> Option<Instant> {
        self.last_fired_at
    }
}
