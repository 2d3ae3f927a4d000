//! Tick spacing arithmetic for the axis layers.

/// Pixel spacing the decimal tick step aims for.
pub const TICK_TARGET_SPACING_PX: f64 = 128.0;

/// Minimum gap between horizontal-axis labels.
pub const MIN_X_AXIS_LABEL_SEPARATION_PX: i32 = 64;

/// Minimum gap between vertical-axis labels.
pub const MIN_Y_AXIS_LABEL_SEPARATION_PX: i32 = 32;

/// Decimal tick step for a given scale (pixels per data unit).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStep {
    /// Base-10 exponent of the step.
    pub exponent: i32,
    /// `10^exponent`.
    pub step: f64,
}

/// `step = 10^floor(log10(128 / scale))`, `None` for unusable scales.
#[must_use]
pub fn nice_tick_step(scale: f64) -> Option<TickStep> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let exponent = (TICK_TARGET_SPACING_PX / scale).log10().floor();
    if !exponent.is_finite() {
        return None;
    }
    let step = 10_f64.powf(exponent);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    Some(TickStep {
        exponent: exponent as i32,
        step,
    })
}

/// Decimal places for numeric labels at this step magnitude.
#[must_use]
pub fn label_precision(exponent: i32) -> usize {
    if exponent >= 1 {
        0
    } else {
        usize::try_from(-exponent).unwrap_or(0).max(2)
    }
}

/// Multiple of `step` wide enough to keep labels of `max_label_px` apart.
#[must_use]
pub fn label_step(max_label_px: i32, min_separation_px: i32, scale: f64, step: f64) -> f64 {
    let pixels_per_step = scale * step;
    if !pixels_per_step.is_finite() || pixels_per_step <= 0.0 {
        return step;
    }
    let needed = f64::from(max_label_px + min_separation_px);
    ((needed / pixels_per_step).ceil() * step).max(step)
}

/// Tick values `first, first + step, …` strictly below `end`.
///
/// The first tick is the step multiple at or below `start`.
#[must_use]
pub fn tick_values(start: f64, end: f64, step: f64) -> Vec<f64> {
    if !start.is_finite() || !end.is_finite() || !step.is_finite() || step <= 0.0 {
        return Vec::new();
    }
    let first = (start / step).floor();
    let last = (end / step).ceil();
    let count = (last - first).max(0.0);
    if count > 100_000.0 {
        return Vec::new();
    }
    (0..count as usize)
        .map(|i| (first + i as f64) * step)
        .filter(|value| *value < end)
        .collect()
}
