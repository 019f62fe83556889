use serde::{Deserialize, Serialize};

use crate::core::ScreenPoint;
use crate::core::ticks::tick_values;
use crate::error::{PlotError, PlotResult};

/// Continuous linear mapping from a data domain onto a pixel range.
///
/// Reversed domains are allowed; that is how the Y axis puts larger values
/// at the top of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
    #[serde(default)]
    round: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> PlotResult<Self> {
        validate_domain(domain)?;
        validate_range(range)?;
        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
            round: false,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn is_rounded(self) -> bool {
        self.round
    }

    pub fn with_domain(mut self, domain: (f64, f64)) -> PlotResult<Self> {
        validate_domain(domain)?;
        self.domain_start = domain.0;
        self.domain_end = domain.1;
        Ok(self)
    }

    pub fn with_range(mut self, range: (f64, f64)) -> PlotResult<Self> {
        validate_range(range)?;
        self.range_start = range.0;
        self.range_end = range.1;
        Ok(self)
    }

    /// Output values are rounded to whole pixels (half rounds up).
    #[must_use]
    pub fn rounded(mut self) -> Self {
        self.round = true;
        self
    }

    #[must_use]
    pub fn unrounded(mut self) -> Self {
        self.round = false;
        self
    }

    /// Maps a domain value to the range. Non-finite input stays non-finite.
    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        let t = (value - self.domain_start) / (self.domain_end - self.domain_start);
        let out = self.range_start * (1.0 - t) + self.range_end * t;
        if self.round { round_half_up(out) } else { out }
    }

    /// Maps a range value back to the domain.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let t = (pixel - self.range_start) / (self.range_end - self.range_start);
        self.domain_start + t * (self.domain_end - self.domain_start)
    }

    /// Roughly `count` human-friendly tick values inside the domain.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        tick_values(self.domain_start, self.domain_end, count)
    }
}

fn validate_domain(domain: (f64, f64)) -> PlotResult<()> {
    if !domain.0.is_finite() || !domain.1.is_finite() || domain.0 == domain.1 {
        return Err(PlotError::InvalidData(
            "scale domain must be finite and non-zero".to_owned(),
        ));
    }
    Ok(())
}

fn validate_range(range: (f64, f64)) -> PlotResult<()> {
    if !range.0.is_finite() || !range.1.is_finite() || range.0 == range.1 {
        return Err(PlotError::InvalidData(
            "scale range must be finite and non-zero".to_owned(),
        ));
    }
    Ok(())
}

#[must_use]
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Affine pan/zoom transform: `screen = k * base + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ZoomTransform {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            k: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }

    #[must_use]
    pub const fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::identity()
    }

    pub fn validate(self) -> PlotResult<()> {
        if !self.k.is_finite() || self.k <= 0.0 || !self.x.is_finite() || !self.y.is_finite() {
            return Err(PlotError::InvalidData(
                "zoom transform must be finite with scale > 0".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn apply_x(self, base_x: f64) -> f64 {
        base_x * self.k + self.x
    }

    #[must_use]
    pub fn apply_y(self, base_y: f64) -> f64 {
        base_y * self.k + self.y
    }

    #[must_use]
    pub fn invert_x(self, screen_x: f64) -> f64 {
        (screen_x - self.x) / self.k
    }

    #[must_use]
    pub fn invert_y(self, screen_y: f64) -> f64 {
        (screen_y - self.y) / self.k
    }

    /// Returns a copy of `scale` whose domain shows what this transform
    /// shows. The pixel range and rounding mode are kept.
    pub fn rescale_x(self, scale: LinearScale) -> PlotResult<LinearScale> {
        let (r0, r1) = scale.range();
        scale.with_domain((
            scale.invert(self.invert_x(r0)),
            scale.invert(self.invert_x(r1)),
        ))
    }

    pub fn rescale_y(self, scale: LinearScale) -> PlotResult<LinearScale> {
        let (r0, r1) = scale.range();
        scale.with_domain((
            scale.invert(self.invert_y(r0)),
            scale.invert(self.invert_y(r1)),
        ))
    }

    /// Translates by screen pixels.
    #[must_use]
    pub fn translated_by(self, dx: f64, dy: f64) -> Self {
        Self::new(self.k, self.x + dx, self.y + dy)
    }

    /// Scales by `factor` around a fixed screen anchor, clamping the
    /// resulting scale into `[min_k, max_k]`.
    #[must_use]
    pub fn scaled_around(self, factor: f64, anchor: ScreenPoint, min_k: f64, max_k: f64) -> Self {
        let k = (self.k * factor).clamp(min_k, max_k);
        let base_x = self.invert_x(anchor.x);
        let base_y = self.invert_y(anchor.y);
        Self::new(k, anchor.x - base_x * k, anchor.y - base_y * k)
    }

    /// Same transform with its scale clamped into `[min_k, max_k]`,
    /// keeping the canvas origin anchored.
    #[must_use]
    pub fn clamped(self, min_k: f64, max_k: f64) -> Self {
        if (min_k..=max_k).contains(&self.k) {
            return self;
        }
        let k = self.k.clamp(min_k, max_k);
        Self::new(k, self.x, self.y)
    }
}
