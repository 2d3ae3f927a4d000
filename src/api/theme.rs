use serde::{Deserialize, Serialize};

use crate::error::PlotResult;
use crate::render::Color;

/// Window colours: background fill, info overlay pens and text, axis pens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColourTheme {
    pub background: Color,
    pub foreground: Color,
    pub axes: Color,
}

impl Default for ColourTheme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            foreground: Color::BLACK,
            axes: Color::BLACK,
        }
    }
}

impl ColourTheme {
    #[must_use]
    pub const fn new(background: Color, foreground: Color, axes: Color) -> Self {
        Self {
            background,
            foreground,
            axes,
        }
    }

    pub fn validate(self) -> PlotResult<Self> {
        self.background.validate()?;
        self.foreground.validate()?;
        self.axes.validate()?;
        Ok(self)
    }
}
