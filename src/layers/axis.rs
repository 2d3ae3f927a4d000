//! Horizontal and vertical scale layers with ticks, grid and labels.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::core::label_format::{format_decimal, format_scientific, utc_offset};
use crate::core::ticks::{MIN_X_AXIS_LABEL_SEPARATION_PX, MIN_Y_AXIS_LABEL_SEPARATION_PX};
use crate::core::{
    ClipBand, LabelContext, LabelFormatter, LabelMode, ViewTransform, format_tick_label,
    label_precision, label_step, nice_tick_step, tick_values,
};
use crate::layers::{Layer, LayerCommon, LayerKind, RenderPass, layer_common_accessors};
use crate::render::{Color, DrawContext, Font, Pen, PenStyle};

/// Distance of a margin-aligned X axis from the screen edge when it may draw
/// outside the margins.
pub const X_BORDER_SEPARATION: i32 = 40;

/// Same for the Y axis.
pub const Y_BORDER_SEPARATION: i32 = 60;

const TICK_LENGTH: i32 = 4;

/// How far a centred baseline may sit outside the screen. Keeps tick and
/// label offsets clear of the `i32` limits when the origin is far away.
const CENTER_SLACK_PX: i32 = 1 << 16;

fn clamp_center(pixel: i32, extent: i32) -> i32 {
    pixel.clamp(-CENTER_SLACK_PX, extent.saturating_add(CENTER_SLACK_PX))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum XAxisAlign {
    BorderTop,
    Top,
    #[default]
    Center,
    Bottom,
    BorderBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YAxisAlign {
    BorderLeft,
    Left,
    #[default]
    Center,
    Right,
    BorderRight,
}

fn axis_common(name: String) -> LayerCommon {
    LayerCommon {
        pen: Pen::new(Color::GREY, 1),
        font: Font::small(),
        ..LayerCommon::named(name)
    }
}

fn draw_grid_line(ctx: &mut dyn DrawContext, pen: Pen, from: (i32, i32), to: (i32, i32)) {
    ctx.set_pen(pen.with_style(PenStyle::Dot));
    ctx.draw_line(from.0, from.1, to.0, to.1);
    ctx.set_pen(pen);
}

/// Horizontal scale.
#[derive(Debug, Clone)]
pub struct AxisX {
    common: LayerCommon,
    align: XAxisAlign,
    ticks: bool,
    label_mode: LabelMode,
    formatter: LabelFormatter,
    timezone: FixedOffset,
}

impl AxisX {
    #[must_use]
    pub fn new(name: impl Into<String>, align: XAxisAlign, ticks: bool) -> Self {
        Self {
            common: axis_common(name.into()),
            align,
            ticks,
            label_mode: LabelMode::Numeric,
            formatter: LabelFormatter::Default,
            timezone: utc_offset(),
        }
    }

    #[must_use]
    pub fn with_label_mode(mut self, mode: LabelMode) -> Self {
        self.label_mode = mode;
        self
    }

    #[must_use]
    pub fn align(&self) -> XAxisAlign {
        self.align
    }

    pub fn set_align(&mut self, align: XAxisAlign) {
        self.align = align;
    }

    /// `true` draws short ticks, `false` draws a dotted grid.
    pub fn set_ticks(&mut self, ticks: bool) {
        self.ticks = ticks;
    }

    pub fn set_label_mode(&mut self, mode: LabelMode) {
        self.label_mode = mode;
    }

    pub fn set_formatter(&mut self, formatter: LabelFormatter) {
        self.formatter = formatter;
    }

    /// Offset used for `Date`/`DateTime` labels.
    pub fn set_timezone(&mut self, timezone: FixedOffset) {
        self.timezone = timezone;
    }

    /// Device row of the baseline.
    #[must_use]
    pub fn baseline(&self, view: &ViewTransform) -> i32 {
        let outside = self.common.draw_outside_margins;
        match self.align {
            XAxisAlign::Center => clamp_center(view.y2p(0.0), view.scr_y()),
            XAxisAlign::Top if outside => X_BORDER_SEPARATION,
            XAxisAlign::Top => view.margins().top,
            XAxisAlign::Bottom if outside => view.scr_y() - X_BORDER_SEPARATION,
            XAxisAlign::Bottom => view.scr_y() - view.margins().bottom,
            XAxisAlign::BorderBottom => view.scr_y() - 1,
            XAxisAlign::BorderTop => 1,
        }
    }

    fn labels_above(&self) -> bool {
        matches!(self.align, XAxisAlign::BorderBottom | XAxisAlign::Top)
    }

    fn draw_mark(
        &self,
        ctx: &mut dyn DrawContext,
        view: &ViewTransform,
        band: ClipBand,
        p: i32,
        orgy: i32,
    ) {
        if self.ticks {
            let tip = if self.align == XAxisAlign::BorderBottom {
                orgy - TICK_LENGTH
            } else {
                orgy + TICK_LENGTH
            };
            ctx.draw_line(p, orgy, p, tip);
            return;
        }
        let inside = !self.common.draw_outside_margins;
        let (from, to) = match self.align {
            XAxisAlign::Bottom if inside => (orgy + TICK_LENGTH, band.top),
            XAxisAlign::Top if inside => (orgy - TICK_LENGTH, band.bottom),
            _ => (0, view.scr_y()),
        };
        draw_grid_line(ctx, self.common.pen, (p, from), (p, to));
    }
}

impl Layer for AxisX {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Axis
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        let view = pass.view;
        ctx.set_pen(self.common.pen);
        ctx.set_font(&self.common.font);

        let orgy = self.baseline(view);
        let extend = view.scr_x();
        ctx.draw_line(0, orgy, extend, orgy);

        let Some(tick) = nice_tick_step(view.scale_x()) else {
            return;
        };
        let band = self.common.band(view);
        let start = view.pos_x();
        let end = view.pos_x() + f64::from(extend) / view.scale_x();
        let context = LabelContext {
            mode: self.label_mode,
            precision: label_precision(tick.exponent),
            visible_end: end,
            timezone: self.timezone,
        };
        let label = |value: f64| format_tick_label(value, &self.formatter, context);

        let mut label_height = 0;
        let mut max_width = 0;
        for value in tick_values(start, end, tick.step) {
            let p = view.x2p(value);
            if !band.contains_x(p) {
                continue;
            }
            self.draw_mark(ctx, view, band, p, orgy);
            let extent = ctx.text_extent(&label(value));
            label_height = label_height.max(extent.height);
            max_width = max_width.max(extent.width);
        }

        let spacing = label_step(
            max_width,
            MIN_X_AXIS_LABEL_SEPARATION_PX,
            view.scale_x(),
            tick.step,
        );
        for value in tick_values(start, end, spacing) {
            let p = view.x2p(value);
            if !band.contains_x(p) {
                continue;
            }
            let text = label(value);
            let extent = ctx.text_extent(&text);
            let y = if self.labels_above() {
                orgy - TICK_LENGTH - extent.height
            } else {
                orgy + TICK_LENGTH
            };
            ctx.draw_text(&text, p - extent.width / 2, y);
        }

        if !self.common.wants_label() {
            return;
        }
        let name = &self.common.name;
        let title = ctx.text_extent(name);
        let (tx, ty) = (title.width, title.height);
        let right = extend - tx - 4;
        let centered = band.left + (band.right - band.left - tx) / 2;
        let inside = !self.common.draw_outside_margins;
        let margins = view.margins();
        let (x, y) = match self.align {
            XAxisAlign::BorderBottom => (right, orgy - 8 - ty - label_height),
            XAxisAlign::Bottom if inside && margins.bottom > ty + label_height + 8 => {
                (centered, orgy + 6 + label_height)
            }
            XAxisAlign::Bottom | XAxisAlign::Center => (right, orgy - 4 - ty),
            XAxisAlign::Top if inside && margins.top > ty + label_height + 8 => {
                (centered, orgy - 6 - ty - label_height)
            }
            XAxisAlign::Top => (right, orgy + 4),
            XAxisAlign::BorderTop => (right, orgy + 6 + label_height),
        };
        ctx.draw_text(name, x, y);
    }
}

/// Vertical scale.
#[derive(Debug, Clone)]
pub struct AxisY {
    common: LayerCommon,
    align: YAxisAlign,
    ticks: bool,
    formatter: LabelFormatter,
}

impl AxisY {
    #[must_use]
    pub fn new(name: impl Into<String>, align: YAxisAlign, ticks: bool) -> Self {
        Self {
            common: axis_common(name.into()),
            align,
            ticks,
            formatter: LabelFormatter::Default,
        }
    }

    #[must_use]
    pub fn align(&self) -> YAxisAlign {
        self.align
    }

    pub fn set_align(&mut self, align: YAxisAlign) {
        self.align = align;
    }

    pub fn set_ticks(&mut self, ticks: bool) {
        self.ticks = ticks;
    }

    pub fn set_formatter(&mut self, formatter: LabelFormatter) {
        self.formatter = formatter;
    }

    /// Device column of the baseline.
    #[must_use]
    pub fn baseline(&self, view: &ViewTransform) -> i32 {
        let outside = self.common.draw_outside_margins;
        match self.align {
            YAxisAlign::Center => clamp_center(view.x2p(0.0), view.scr_x()),
            YAxisAlign::Left if outside => Y_BORDER_SEPARATION,
            YAxisAlign::Left => view.margins().left,
            YAxisAlign::Right if outside => view.scr_x() - Y_BORDER_SEPARATION,
            YAxisAlign::Right => view.scr_x() - view.margins().right,
            YAxisAlign::BorderRight => view.scr_x() - 1,
            YAxisAlign::BorderLeft => 1,
        }
    }

    /// Two decimals while the requested range stays in a readable magnitude,
    /// scientific notation otherwise.
    fn label(&self, view: &ViewTransform, value: f64) -> String {
        if let LabelFormatter::Custom(callback) = &self.formatter {
            return callback(value);
        }
        let desired = view.desired();
        let magnitude = desired.max_y.abs().max(desired.min_y.abs());
        if magnitude < 1e4 && magnitude > 1e-3 {
            format_decimal(value, 2)
        } else {
            format_scientific(value)
        }
    }

    fn labels_right(&self) -> bool {
        matches!(self.align, YAxisAlign::BorderLeft | YAxisAlign::Right)
    }

    fn draw_mark(
        &self,
        ctx: &mut dyn DrawContext,
        view: &ViewTransform,
        band: ClipBand,
        p: i32,
        orgx: i32,
    ) {
        if self.ticks {
            if self.align == YAxisAlign::BorderLeft {
                ctx.draw_line(orgx, p, orgx + TICK_LENGTH, p);
            } else {
                ctx.draw_line(orgx - TICK_LENGTH, p, orgx, p);
            }
            return;
        }
        let inside = !self.common.draw_outside_margins;
        let (from, to) = match self.align {
            YAxisAlign::Left if inside => (orgx - TICK_LENGTH, band.right),
            YAxisAlign::Right if inside => (band.left, orgx + TICK_LENGTH),
            _ => (0, view.scr_x()),
        };
        draw_grid_line(ctx, self.common.pen, (from, p), (to, p));
    }
}

impl Layer for AxisY {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Axis
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        let view = pass.view;
        ctx.set_pen(self.common.pen);
        ctx.set_font(&self.common.font);

        let orgx = self.baseline(view);
        let extend = view.scr_y();
        ctx.draw_line(orgx, 0, orgx, extend);

        let Some(tick) = nice_tick_step(view.scale_y()) else {
            return;
        };
        let band = self.common.band(view);
        let start = view.pos_y() - f64::from(extend) / view.scale_y();
        // The top pixel row sits at pos_y; one extra step keeps it in range.
        let end = view.pos_y() + tick.step;

        let mut label_width = 0;
        let mut max_height = 0;
        for value in tick_values(start, end, tick.step) {
            let p = view.y2p(value);
            if !band.contains_y(p) {
                continue;
            }
            self.draw_mark(ctx, view, band, p, orgx);
            let extent = ctx.text_extent(&self.label(view, value));
            label_width = label_width.max(extent.width);
            max_height = max_height.max(extent.height);
        }

        let spacing = label_step(
            max_height,
            MIN_Y_AXIS_LABEL_SEPARATION_PX,
            view.scale_y(),
            tick.step,
        );
        for value in tick_values(start, end, spacing) {
            let p = view.y2p(value);
            if !band.contains_y(p) {
                continue;
            }
            let text = self.label(view, value);
            let extent = ctx.text_extent(&text);
            let x = if self.labels_right() {
                orgx + TICK_LENGTH
            } else {
                orgx - TICK_LENGTH - extent.width
            };
            ctx.draw_text(&text, x, p - extent.height / 2);
        }

        if !self.common.wants_label() {
            return;
        }
        let name = &self.common.name;
        let title = ctx.text_extent(name);
        let (tx, ty) = (title.width, title.height);
        let inside = !self.common.draw_outside_margins;
        let margins = view.margins();
        let middle = band.top + (band.bottom - band.top + tx) / 2;
        match self.align {
            YAxisAlign::BorderLeft => ctx.draw_text(name, label_width + 8, 4),
            YAxisAlign::Left if inside && margins.left > ty + label_width + 8 => {
                ctx.draw_rotated_text(name, orgx - 6 - label_width - ty, middle, 90.0);
            }
            YAxisAlign::Left | YAxisAlign::Center => ctx.draw_text(name, orgx + 4, 4),
            YAxisAlign::Right if inside && margins.right > ty + label_width + 8 => {
                ctx.draw_rotated_text(name, orgx + 6 + label_width, middle, 90.0);
            }
            YAxisAlign::Right => ctx.draw_text(name, orgx - tx - 4, 4),
            YAxisAlign::BorderRight => ctx.draw_text(name, orgx - 6 - tx - label_width, 4),
        }
    }
}
