pub mod bbox;
pub mod clip;
pub mod label_format;
pub mod ticks;
pub mod transform;
pub mod types;

pub use bbox::BoundingBox;
pub use clip::{ClipBand, Segment, clip_segment};
pub use label_format::{LabelContext, LabelFormatter, LabelMode, format_tick_label};
pub use ticks::{TickStep, label_precision, label_step, nice_tick_step, tick_values};
pub use transform::{DEFAULT_ZOOM_FACTOR, ViewTransform};
pub use types::{DataPoint, DeviceSize, Margins, PixelPoint, PixelRect};
