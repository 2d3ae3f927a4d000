use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// How tick values are turned into label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelMode {
    /// Plain decimal, precision derived from the tick step.
    #[default]
    Numeric,
    /// Value is a unix timestamp, shown as `YYYY-MM-DD`.
    Date,
    /// Value is a unix timestamp, shown as `YYYY-MM-DDTHH:MM:SS`.
    DateTime,
    /// Value is elapsed seconds; `MM:SS.sss` while the visible end stays under
    /// two minutes, `HH:MM:SS` beyond.
    ElapsedTime,
    /// Value is elapsed seconds, always `HH:MM:SS`.
    ElapsedHours,
}

/// Caller-supplied label callback overriding the mode.
#[derive(Clone, Default)]
pub enum LabelFormatter {
    #[default]
    Default,
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "LabelFormatter::Default"),
            Self::Custom(_) => write!(f, "LabelFormatter::Custom(..)"),
        }
    }
}

/// Everything a label needs besides the tick value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelContext {
    pub mode: LabelMode,
    /// Decimal places for `Numeric`.
    pub precision: usize,
    /// Data value at the far end of the axis, selects the elapsed-time layout.
    pub visible_end: f64,
    pub timezone: FixedOffset,
}

impl LabelContext {
    #[must_use]
    pub fn numeric(precision: usize) -> Self {
        Self {
            mode: LabelMode::Numeric,
            precision,
            visible_end: 0.0,
            timezone: utc_offset(),
        }
    }
}

#[must_use]
pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Formats one tick label.
#[must_use]
pub fn format_tick_label(value: f64, formatter: &LabelFormatter, context: LabelContext) -> String {
    if let LabelFormatter::Custom(callback) = formatter {
        return callback(value);
    }
    if !value.is_finite() {
        return "nan".to_owned();
    }

    match context.mode {
        LabelMode::Numeric => format_decimal(value, context.precision),
        LabelMode::Date => format_timestamp(value, context.timezone, "%Y-%m-%d"),
        LabelMode::DateTime => format_timestamp(value, context.timezone, "%Y-%m-%dT%H:%M:%S"),
        LabelMode::ElapsedTime if context.visible_end / 60.0 < 2.0 => format_minutes(value),
        LabelMode::ElapsedTime | LabelMode::ElapsedHours => format_hours(value),
    }
}

#[must_use]
pub fn format_decimal(value: f64, precision: usize) -> String {
    let text = format!("{value:.precision$}");
    // Avoid "-0.00" for values that round to zero.
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        return text[1..].to_owned();
    }
    text
}

/// Scientific notation with one decimal, used when magnitudes leave the
/// comfortable decimal range.
#[must_use]
pub fn format_scientific(value: f64) -> String {
    format!("{value:.1e}")
}

fn format_timestamp(value: f64, timezone: FixedOffset, pattern: &str) -> String {
    let seconds = value.trunc() as i64;
    let Some(utc) = DateTime::<Utc>::from_timestamp(seconds, 0) else {
        return format_decimal(value, 0);
    };
    utc.with_timezone(&timezone).format(pattern).to_string()
}

fn split_sign(value: f64) -> (&'static str, f64) {
    if value < 0.0 { ("-", -value) } else { ("", value) }
}

fn format_hours(value: f64) -> String {
    let (sign, modulus) = split_sign(value);
    let hours = (modulus / 3600.0).floor();
    let minutes = ((modulus - hours * 3600.0) / 60.0).floor();
    let seconds = (modulus - hours * 3600.0 - minutes * 60.0).floor();
    format!("{sign}{hours:02.0}:{minutes:02.0}:{seconds:02.0}")
}

fn format_minutes(value: f64) -> String {
    let (sign, modulus) = split_sign(value);
    let minutes = (modulus / 60.0).floor();
    let seconds = modulus - minutes * 60.0;
    format!("{sign}{minutes:02.0}:{seconds:06.3}")
}
