use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};
use crate::render::Color;

/// Perceptually uniform, colorblind-safe sequential ramp (low to high).
const VIRIDIS_STOPS: [(f64, f64, f64); 11] = [
    (0.267, 0.005, 0.329),
    (0.282, 0.141, 0.458),
    (0.254, 0.265, 0.530),
    (0.207, 0.372, 0.553),
    (0.164, 0.471, 0.558),
    (0.128, 0.567, 0.551),
    (0.135, 0.659, 0.518),
    (0.267, 0.749, 0.441),
    (0.478, 0.821, 0.318),
    (0.741, 0.873, 0.150),
    (0.993, 0.906, 0.144),
];

/// Samples the viridis ramp at `t`, clamped into `[0, 1]`.
#[must_use]
pub fn viridis(t: f64) -> Color {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let segments = (VIRIDIS_STOPS.len() - 1) as f64;
    let position = t * segments;
    let index = (position.floor() as usize).min(VIRIDIS_STOPS.len() - 2);
    let local = position - index as f64;

    let (r0, g0, b0) = VIRIDIS_STOPS[index];
    let (r1, g1, b1) = VIRIDIS_STOPS[index + 1];
    Color::rgb(
        r0 + (r1 - r0) * local,
        g0 + (g1 - g0) * local,
        b0 + (b1 - b0) * local,
    )
}

/// Maps a data column onto the viridis ramp.
///
/// Values outside the domain clamp to the ramp ends. Missing values take
/// the low end so one bad row never breaks a recolor pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialColorScale {
    pub column: String,
    domain_start: f64,
    domain_end: f64,
}

impl SequentialColorScale {
    pub fn new(column: impl Into<String>, domain: (f64, f64)) -> PlotResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() || domain.0 == domain.1 {
            return Err(PlotError::InvalidData(
                "color scale domain must be finite and non-zero".to_owned(),
            ));
        }
        Ok(Self {
            column: column.into(),
            domain_start: domain.0,
            domain_end: domain.1,
        })
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        ((value - self.domain_start) / (self.domain_end - self.domain_start)).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn color(&self, value: f64) -> Color {
        viridis(self.normalize(value))
    }
}
