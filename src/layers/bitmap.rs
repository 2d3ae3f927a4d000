use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::{trace, warn};

use crate::core::{BoundingBox, ViewTransform};
use crate::error::{PlotError, PlotResult};
use crate::layers::shape::shape_label_origin;
use crate::layers::{Corner, Layer, LayerCommon, LayerKind, RenderPass, layer_common_accessors};
use crate::render::DrawContext;

/// Key of the cached rescaled patch: drawn size and source offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PatchKey {
    width: u32,
    height: u32,
    offset_x: i32,
    offset_y: i32,
}

#[derive(Debug, Clone)]
struct ScaledPatch {
    key: PatchKey,
    image: RgbaImage,
}

/// Device placement of the visible part of the image for one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BitmapPlacement {
    /// Top-left device pixel the patch is drawn at.
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Source rectangle inside the stored image.
    pub src_x: i32,
    pub src_y: i32,
    pub src_width: i32,
    pub src_height: i32,
}

/// Raster image stretched over a data-space rectangle.
#[derive(Debug, Clone)]
pub struct BitmapLayer {
    common: LayerCommon,
    corner: Corner,
    image: Option<RgbaImage>,
    bounds: BoundingBox,
    scaled: Option<ScaledPatch>,
}

impl BitmapLayer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            common: LayerCommon::named(name),
            corner: Corner::default(),
            image: None,
            bounds: BoundingBox::new(0.0, 0.0, 0.0, 0.0),
            scaled: None,
        }
    }

    /// Places `image` with its bottom-left corner at `(x, y)` spanning
    /// `width`×`height` data units.
    pub fn set_bitmap(
        &mut self,
        image: RgbaImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> PlotResult<()> {
        if image.width() == 0 || image.height() == 0 {
            warn!(layer = %self.common.name, "rejected empty bitmap");
            return Err(PlotError::InvalidData("bitmap has no pixels".to_owned()));
        }
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            warn!(layer = %self.common.name, "rejected bitmap placement");
            return Err(PlotError::InvalidData(
                "bitmap placement must be finite".to_owned(),
            ));
        }
        self.image = Some(image);
        self.bounds = BoundingBox::new(x, x + width, y, y + height);
        self.scaled = None;
        Ok(())
    }

    /// Copy of the stored image, if any.
    #[must_use]
    pub fn bitmap(&self) -> Option<RgbaImage> {
        self.image.clone()
    }

    pub fn set_corner(&mut self, corner: Corner) {
        self.corner = corner;
    }

    pub(crate) fn placement(&self, view: &ViewTransform) -> Option<BitmapPlacement> {
        let image = self.image.as_ref()?;
        // Device math stays in f64: deep zoom pushes corners past the i32 range.
        let x0 = view.data_to_pixel_x(self.bounds.min_x).trunc();
        let y0 = view.data_to_pixel_y(self.bounds.max_y).trunc();
        let x1 = view.data_to_pixel_x(self.bounds.max_x).trunc();
        let y1 = view.data_to_pixel_y(self.bounds.min_y).trunc();

        let pixel_x = (x1 - x0) / f64::from(image.width());
        let pixel_y = (y1 - y0) / f64::from(image.height());
        if !pixel_x.is_finite() || !pixel_y.is_finite() || pixel_x <= 0.0 || pixel_y <= 0.0 {
            return None;
        }

        let (scr_x, scr_y) = (f64::from(view.scr_x()), f64::from(view.scr_y()));
        // A stretched pixel may overhang the screen edge by up to one pixel,
        // never by more than a screen.
        let border_x = (pixel_x + 1.0).min(scr_x).trunc();
        let border_y = (pixel_y + 1.0).min(scr_y).trunc();
        let dx0 = if x0 < 0.0 { -border_x } else { x0 };
        let dy0 = if y0 < 0.0 { -border_y } else { y0 };
        let dx1 = if x1 > scr_x { scr_x + border_x } else { x1 };
        let dy1 = if y1 > scr_y { scr_y + border_y } else { y1 };

        let width = dx1 - dx0 + 1.0;
        let height = dy1 - dy0 + 1.0;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(BitmapPlacement {
            x: dx0 as i32,
            y: dy0 as i32,
            width: width as i32,
            height: height as i32,
            src_x: ((dx0 - x0) / pixel_x) as i32,
            src_y: ((dy0 - y0) / pixel_y) as i32,
            src_width: (width / pixel_x) as i32,
            src_height: (height / pixel_y) as i32,
        })
    }

    fn scaled_patch(&mut self, placement: BitmapPlacement) -> Option<&RgbaImage> {
        let image = self.image.as_ref()?;
        let key = PatchKey {
            width: u32::try_from(placement.width).ok()?,
            height: u32::try_from(placement.height).ok()?,
            offset_x: placement.src_x,
            offset_y: placement.src_y,
        };
        let stale = self.scaled.as_ref().is_none_or(|patch| patch.key != key);
        if stale {
            let src_x = u32::try_from(placement.src_x.max(0)).ok()?;
            let src_y = u32::try_from(placement.src_y.max(0)).ok()?;
            let src_width = u32::try_from(placement.src_width.max(1))
                .ok()?
                .min(image.width());
            let src_height = u32::try_from(placement.src_height.max(1))
                .ok()?
                .min(image.height());
            let cropped = imageops::crop_imm(image, src_x, src_y, src_width, src_height).to_image();
            if cropped.width() == 0 || cropped.height() == 0 {
                return None;
            }
            trace!(width = key.width, height = key.height, "rescaling bitmap patch");
            let scaled = imageops::resize(&cropped, key.width, key.height, FilterType::Nearest);
            self.scaled = Some(ScaledPatch { key, image: scaled });
        }
        self.scaled.as_ref().map(|patch| &patch.image)
    }
}

impl Layer for BitmapLayer {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Plot
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.image.as_ref().map(|_| self.bounds)
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        if let Some(placement) = self.placement(pass.view) {
            if let Some(patch) = self.scaled_patch(placement) {
                ctx.draw_bitmap(patch, placement.x, placement.y);
            }
        }

        if self.common.wants_label() {
            ctx.set_font(&self.common.font);
            let extent = ctx.text_extent(&self.common.name);
            let (x, y) = shape_label_origin(
                pass.view,
                self.bounding_box(),
                self.corner,
                extent.width,
                extent.height,
            );
            ctx.draw_text(&self.common.name, x, y);
        }
    }
}
