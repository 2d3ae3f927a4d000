use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GREY: Self = Self::rgb(0.5, 0.5, 0.5);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// 8-bit channels, clamped.
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        let quantize = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.red),
            quantize(self.green),
            quantize(self.blue),
            quantize(self.alpha),
        ]
    }

    pub fn validate(self) -> PlotResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PlotError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PenStyle {
    #[default]
    Solid,
    Dot,
}

/// Stroke used for lines, points and outlines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub color: Color,
    /// Width in device pixels.
    pub width: u32,
    pub style: PenStyle,
}

impl Pen {
    #[must_use]
    pub const fn new(color: Color, width: u32) -> Self {
        Self {
            color,
            width,
            style: PenStyle::Solid,
        }
    }

    #[must_use]
    pub const fn with_style(mut self, style: PenStyle) -> Self {
        self.style = style;
        self
    }

    /// Pens this wide are drawn with zero-length lines instead of points.
    #[must_use]
    pub fn is_thick(self) -> bool {
        self.width > 1
    }
}

impl Default for Pen {
    fn default() -> Self {
        Self::new(Color::BLACK, 1)
    }
}

/// Fill used for rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Brush {
    #[default]
    Transparent,
    Solid(Color),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size_px: f64,
    pub bold: bool,
}

impl Font {
    #[must_use]
    pub fn new(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
            bold: false,
        }
    }

    /// Smaller face used by the axis layers.
    #[must_use]
    pub fn small() -> Self {
        Self::new("Sans", 9.0)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Sans", 11.0)
    }
}

/// Measured size of a piece of text in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    pub width: i32,
    pub height: i32,
}

impl TextExtent {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}
