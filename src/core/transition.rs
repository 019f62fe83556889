use serde::{Deserialize, Serialize};

/// Easing curve applied to transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    Linear,
    #[default]
    InOutQuad,
}

impl Easing {
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Deterministic, host-stepped clock for one transition.
///
/// The engine never reads wall time; hosts advance it from their frame
/// callback so tests can step it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionClock {
    elapsed_ms: f64,
    duration_ms: f64,
    easing: Easing,
}

impl TransitionClock {
    #[must_use]
    pub fn new(duration_ms: f64, easing: Easing) -> Self {
        Self {
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(0.0),
            easing,
        }
    }

    pub fn advance(&mut self, delta_ms: f64) {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.elapsed_ms = (self.elapsed_ms + delta_ms).min(self.duration_ms);
        }
    }

    #[must_use]
    pub fn progress(self) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased progress in `[0, 1]`.
    #[must_use]
    pub fn eased(self) -> f64 {
        self.easing.apply(self.progress())
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        self.progress() >= 1.0
    }
}

#[must_use]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
