//! Render loop and drawing surfaces
//!
//! The loop itself is backend-agnostic: it clears the surface and paints each
//! dot as a filled circle, blended toward the active color near the pointer.
//! Backends implement [`DotSurface`]:
//! - `raster`: CPU RGBA buffer (native, tests)
//! - `gpu`: instanced SDF circles through wgpu
//! - `canvas2d`: Canvas 2D fallback (wasm32)

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod gpu;
pub mod raster;

use glam::Vec2;

use crate::color::{Palette, Rgb};
use crate::grid::dot::Dot;
use crate::grid::geometry::{RasterSpec, SurfaceSize};

#[cfg(target_arch = "wasm32")]
pub use canvas2d::CanvasSurface;
pub use gpu::GpuSurface;
pub use raster::Raster;

/// Something dots can be painted onto
pub trait DotSurface {
    /// Resize the backing store for a new layout
    fn configure(&mut self, raster: &RasterSpec);

    /// Logical (CSS px) drawing area
    fn logical_size(&self) -> SurfaceSize;

    /// Prepare a frame; false if the drawing context is unavailable
    fn begin_frame(&mut self) -> bool;

    /// Clear the full logical area to transparent
    fn clear(&mut self);

    /// Fill a circle in logical coordinates
    fn fill_dot(&mut self, center: Vec2, radius: f32, color: Rgb);

    /// Flush/present the frame
    fn end_frame(&mut self);

    fn name(&self) -> &'static str;
}

/// Outcome of one render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameReport {
    /// Nothing drawn (zero area, no context, or not mounted)
    Skipped,
    Painted {
        dots: usize,
        /// Dots within proximity of the pointer
        highlighted: usize,
    },
}

impl FrameReport {
    pub fn painted(&self) -> usize {
        match *self {
            FrameReport::Skipped => 0,
            FrameReport::Painted { dots, .. } => dots,
        }
    }
}

/// A shape built for one radius and reused until the radius changes
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Debug)]
pub(crate) struct RadiusCache<T> {
    entry: Option<(u32, T)>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl<T> RadiusCache<T> {
    pub(crate) const fn new() -> Self {
        Self { entry: None }
    }

    /// Shape for `radius`, calling `build` only on a radius change.
    /// A failed build leaves the cache empty.
    pub(crate) fn get_or_build(&mut self, radius: f32, build: impl FnOnce(f32) -> Option<T>) -> Option<&T> {
        let key = radius.to_bits();
        if self.entry.as_ref().is_none_or(|(k, _)| *k != key) {
            self.entry = build(radius).map(|shape| (key, shape));
        }
        self.entry.as_ref().map(|(_, shape)| shape)
    }
}

/// Color of a dot resting at `rest`.
///
/// Distance is measured from the rest position, so displaced dots keep the
/// shade of their grid cell. Returns the color and whether the dot is in
/// proximity.
#[inline]
pub fn shade(rest: Vec2, pointer: Option<Vec2>, palette: &Palette, proximity: f32) -> (Rgb, bool) {
    let Some(pointer) = pointer else {
        return (palette.base, false);
    };
    if !(proximity > 0.0) {
        return (palette.base, false);
    }
    let dsq = rest.distance_squared(pointer);
    if dsq <= proximity * proximity {
        let t = 1.0 - dsq.sqrt() / proximity;
        (palette.base.lerp(palette.active, t), true)
    } else {
        (palette.base, false)
    }
}

/// Paint one frame of `dots` onto `surface`
pub fn render_frame(
    surface: &mut dyn DotSurface,
    dots: &[Dot],
    radius: f32,
    pointer: Option<Vec2>,
    palette: &Palette,
    proximity: f32,
) -> FrameReport {
    if surface.logical_size().is_empty() || !surface.begin_frame() {
        return FrameReport::Skipped;
    }
    surface.clear();

    let mut highlighted = 0;
    for dot in dots {
        let (color, near) = shade(dot.rest, pointer, palette, proximity);
        if near {
            highlighted += 1;
        }
        surface.fill_dot(dot.position(), radius, color);
    }
    surface.end_frame();

    FrameReport::Painted {
        dots: dots.len(),
        highlighted,
    }
}
