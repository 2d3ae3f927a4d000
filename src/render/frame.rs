use image::RgbaImage;

use crate::core::DeviceSize;
use crate::error::{PlotError, PlotResult};
use crate::render::{Brush, Color, Font, Pen};

/// Recorded line segment in device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub pen: Pen,
}

impl LinePrimitive {
    /// Zero-length lines stand in for points drawn with a thick pen.
    #[must_use]
    pub fn is_dot(&self) -> bool {
        self.x1 == self.x2 && self.y1 == self.y2
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPrimitive {
    pub x: i32,
    pub y: i32,
    pub pen: Pen,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub pen: Pen,
    pub brush: Brush,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: i32,
    pub y: i32,
    /// Counter-clockwise rotation in degrees.
    pub angle_deg: f64,
    pub font: Font,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BitmapPrimitive {
    pub x: i32,
    pub y: i32,
    pub image: RgbaImage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line(LinePrimitive),
    Point(PointPrimitive),
    Rect(RectPrimitive),
    Text(TextPrimitive),
    Bitmap(BitmapPrimitive),
}

/// Backend-agnostic display list of one draw pass, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub size: DeviceSize,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(size: DeviceSize) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.size.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: self.size.width,
                height: self.size.height,
            });
        }
        for command in &self.commands {
            match command {
                DrawCommand::Line(line) => line.pen.color.validate()?,
                DrawCommand::Point(point) => point.pen.color.validate()?,
                DrawCommand::Rect(rect) => {
                    rect.pen.color.validate()?;
                    if let Brush::Solid(color) = rect.brush {
                        color.validate()?;
                    }
                }
                DrawCommand::Text(text) => {
                    if !text.font.size_px.is_finite() || text.font.size_px <= 0.0 {
                        return Err(PlotError::InvalidData(
                            "font size must be finite and > 0".to_owned(),
                        ));
                    }
                    text.color.validate()?;
                }
                DrawCommand::Bitmap(_) => {}
            }
        }
        Ok(())
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn points(&self) -> impl Iterator<Item = &PointPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Point(point) => Some(point),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Rect(rect) => Some(rect),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn bitmaps(&self) -> impl Iterator<Item = &BitmapPrimitive> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Bitmap(bitmap) => Some(bitmap),
            _ => None,
        })
    }

    /// Texts whose content equals `text`.
    pub fn texts_matching<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a TextPrimitive> {
        self.texts().filter(move |t| t.text == text)
    }
}
