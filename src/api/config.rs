use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::transform::INITIAL_SCREEN_SIZE;
use crate::core::{DEFAULT_ZOOM_FACTOR, DeviceSize, Margins};
use crate::error::{PlotError, PlotResult};

use super::ColourTheme;

/// Plot window bootstrap configuration.
///
/// Serializable so hosts can persist a window setup next to their own
/// settings instead of inventing a format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotWindowConfig {
    #[serde(default = "default_screen")]
    pub screen: DeviceSize,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub lock_aspect: bool,
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,
    #[serde(default = "default_true")]
    pub mouse_navigation: bool,
    #[serde(default)]
    pub scrollbars: bool,
    #[serde(default)]
    pub theme: ColourTheme,
}

impl Default for PlotWindowConfig {
    fn default() -> Self {
        Self {
            screen: default_screen(),
            margins: Margins::default(),
            lock_aspect: false,
            zoom_factor: default_zoom_factor(),
            mouse_navigation: true,
            scrollbars: false,
            theme: ColourTheme::default(),
        }
    }
}

impl PlotWindowConfig {
    #[must_use]
    pub fn new(screen: DeviceSize) -> Self {
        Self {
            screen,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_lock_aspect(mut self, lock_aspect: bool) -> Self {
        self.lock_aspect = lock_aspect;
        self
    }

    #[must_use]
    pub fn with_zoom_factor(mut self, zoom_factor: f64) -> Self {
        self.zoom_factor = zoom_factor;
        self
    }

    #[must_use]
    pub fn with_mouse_navigation(mut self, enabled: bool) -> Self {
        self.mouse_navigation = enabled;
        self
    }

    #[must_use]
    pub fn with_scrollbars(mut self, enabled: bool) -> Self {
        self.scrollbars = enabled;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ColourTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn validate(self) -> PlotResult<Self> {
        if !self.screen.is_valid() {
            warn!(
                width = self.screen.width,
                height = self.screen.height,
                "rejected plot window size"
            );
            return Err(PlotError::InvalidViewport {
                width: self.screen.width,
                height: self.screen.height,
            });
        }
        validate_zoom_factor(self.zoom_factor)?;
        let margins = self.margins;
        if [margins.top, margins.right, margins.bottom, margins.left]
            .iter()
            .any(|margin| *margin < 0)
        {
            return Err(PlotError::InvalidData(
                "margins must be non-negative".to_owned(),
            ));
        }
        self.theme.validate()?;
        Ok(self)
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> PlotResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| PlotError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| PlotError::InvalidData(format!("failed to parse config: {e}")))
    }
}

pub(super) fn validate_zoom_factor(zoom_factor: f64) -> PlotResult<f64> {
    if !zoom_factor.is_finite() || zoom_factor <= 1.0 {
        warn!(zoom_factor, "rejected zoom factor");
        return Err(PlotError::InvalidData(
            "zoom factor must be finite and > 1".to_owned(),
        ));
    }
    Ok(zoom_factor)
}

fn default_screen() -> DeviceSize {
    INITIAL_SCREEN_SIZE
}

fn default_zoom_factor() -> f64 {
    DEFAULT_ZOOM_FACTOR
}

fn default_true() -> bool {
    true
}
