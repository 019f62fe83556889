//! Human-friendly tick generation for continuous axes.
//!
//! Tick values land on 1/2/5 x 10^n steps so labels stay short, and the
//! formatter derives its precision from the step rather than the value.

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Default spacing targets between tick labels.
pub const X_TICK_TARGET_SPACING_PX: f64 = 90.0;
pub const Y_TICK_TARGET_SPACING_PX: f64 = 50.0;

/// Integer tick index bounds plus the signed increment encoding.
///
/// A negative increment means "divide by `-inc`", which keeps decimal steps
/// exact (0.1 is represented as 1 / 10).
fn tick_bounds(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let positive_inc = 10f64.powf(-power) / factor;
        i1 = js_round(start * positive_inc);
        i2 = js_round(stop * positive_inc);
        if i1 / positive_inc < start {
            i1 += 1.0;
        }
        if i2 / positive_inc > stop {
            i2 -= 1.0;
        }
        inc = -positive_inc;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = js_round(start / inc);
        i2 = js_round(stop / inc);
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_bounds(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

fn js_round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Tick values covering `[start, stop]` (either order), about `count` of them.
#[must_use]
pub fn tick_values(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_bounds(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    let at = |index: f64| if inc < 0.0 { index / -inc } else { index * inc };
    (0..n)
        .map(|i| {
            if reverse {
                at(i2 - i as f64)
            } else {
                at(i1 + i as f64)
            }
        })
        .collect()
}

/// Spacing between consecutive ticks for the same inputs as [`tick_values`].
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 || !start.is_finite() || !stop.is_finite() || start == stop {
        return 0.0;
    }
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let (_, _, inc) = tick_bounds(lo, hi, count as f64);
    if inc < 0.0 { 1.0 / -inc } else { inc }
}

/// Number of decimals needed to tell ticks `step` apart.
#[must_use]
pub fn tick_precision(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let exponent = step.abs().log10().floor();
    if exponent >= 0.0 { 0 } else { (-exponent) as usize }
}

/// Fixed-precision label for one tick.
#[must_use]
pub fn format_tick(value: f64, step: f64) -> String {
    let precision = tick_precision(step);
    let text = format!("{value:.precision$}");
    // "-0" and "-0.00" read badly on an axis.
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_owned()
    } else {
        text
    }
}

/// Tick count that keeps labels roughly `target_spacing_px` apart.
#[must_use]
pub fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

#[cfg(test)]
mod tests {
    use super::{axis_tick_target_count, format_tick, tick_step, tick_values};

    #[test]
    fn ticks_land_on_round_steps() {
        assert_eq!(
            tick_values(0.0, 10.0, 5),
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]
        );
        assert_eq!(tick_step(0.0, 10.0, 5), 2.0);
    }

    #[test]
    fn decimal_steps_are_exact() {
        let ticks = tick_values(0.0, 1.0, 10);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[3], 0.3);
        assert_eq!(tick_step(0.0, 1.0, 10), 0.1);
    }

    #[test]
    fn reversed_domain_yields_descending_ticks() {
        let ticks = tick_values(26.8, 17.2, 5);
        assert_eq!(ticks, vec![26.0, 24.0, 22.0, 20.0, 18.0]);
    }

    #[test]
    fn degenerate_inputs_are_handled() {
        assert!(tick_values(0.0, 1.0, 0).is_empty());
        assert_eq!(tick_values(3.0, 3.0, 5), vec![3.0]);
        assert!(tick_values(f64::NAN, 1.0, 5).is_empty());
    }

    #[test]
    fn labels_use_step_precision() {
        assert_eq!(format_tick(3.0, 0.5), "3.0");
        assert_eq!(format_tick(3.59, 0.01), "3.59");
        assert_eq!(format_tick(20.0, 2.0), "20");
        assert_eq!(format_tick(-0.0001, 0.1), "0.0");
    }

    #[test]
    fn target_count_is_clamped() {
        assert_eq!(axis_tick_target_count(900.0, 90.0, 2, 8), 8);
        assert_eq!(axis_tick_target_count(100.0, 90.0, 2, 8), 2);
        assert_eq!(axis_tick_target_count(f64::NAN, 90.0, 2, 8), 2);
    }
}
