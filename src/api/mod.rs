mod config;
mod export;
mod interaction_controller;
mod layer_registry;
mod printout;
mod scrollbar;
mod theme;
mod window;

pub use config::PlotWindowConfig;
pub use printout::{PRINT_MARGIN_PX, Printout};
pub use scrollbar::{SCROLL_LINE_PX, ScrollbarState, Scrollbars};
pub use theme::ColourTheme;
pub use window::PlotWindow;
