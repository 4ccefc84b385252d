//! Canvas 2D dot surface (fallback when WebGPU is unavailable)

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Path2d};

use super::{DotSurface, RadiusCache};
use crate::color::Rgb;
use crate::error::GridError;
use crate::grid::geometry::{RasterSpec, SurfaceSize};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
    layout: RasterSpec,
    /// Circle path centered on the origin
    circle: RadiusCache<Path2d>,
    fill: Option<Rgb>,
    css: String,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, GridError> {
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx: Some(ctx),
            layout: RasterSpec::default(),
            circle: RadiusCache::new(),
            fill: None,
            css: String::with_capacity(24),
        })
    }
}

fn circle_path(radius: f32) -> Option<Path2d> {
    let path = Path2d::new().ok()?;
    path.arc(0.0, 0.0, radius as f64, 0.0, TAU).ok()?;
    Some(path)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, GridError> {
    canvas
        .get_context("2d")
        .map_err(|e| GridError::Web(format!("getContext: {e:?}")))?
        .ok_or_else(|| GridError::Web("2d context unavailable".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| GridError::Web("not a CanvasRenderingContext2d".into()))
}

impl DotSurface for CanvasSurface {
    fn configure(&mut self, raster: &RasterSpec) {
        self.layout = *raster;
        // Resizing the canvas resets context state
        self.canvas.set_width(raster.pixel_width);
        self.canvas.set_height(raster.pixel_height);
        self.fill = None;
    }

    fn logical_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.layout.width, self.layout.height)
    }

    fn begin_frame(&mut self) -> bool {
        if self.layout.is_empty() {
            return false;
        }
        if self.ctx.is_none() {
            match context_2d(&self.canvas) {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(e) => {
                    log::debug!("Skipping frame: {e}");
                    return false;
                }
            }
        }
        true
    }

    fn clear(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        let ratio = self.layout.pixel_ratio as f64;
        let _ = ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
        ctx.clear_rect(0.0, 0.0, self.layout.width as f64, self.layout.height as f64);
    }

    fn fill_dot(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let Self {
            ctx: Some(ctx),
            layout,
            circle,
            fill,
            css,
            ..
        } = self
        else {
            return;
        };
        let Some(path) = circle.get_or_build(radius, circle_path) else {
            return;
        };
        if *fill != Some(color) {
            color.write_css(css);
            ctx.set_fill_style_str(css);
            *fill = Some(color);
        }
        let ratio = layout.pixel_ratio as f64;
        let _ = ctx.set_transform(
            ratio,
            0.0,
            0.0,
            ratio,
            center.x as f64 * ratio,
            center.y as f64 * ratio,
        );
        ctx.fill_with_path_2d(path);
    }

    fn end_frame(&mut self) {}

    fn name(&self) -> &'static str {
        "canvas2d"
    }
}
