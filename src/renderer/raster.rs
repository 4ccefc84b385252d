//! CPU raster surface
//!
//! RGBA8 buffer at backing resolution. Coverage is sampled at pixel centers
//! with no anti-aliasing, which keeps test expectations exact.

use glam::Vec2;

use super::DotSurface;
use crate::color::Rgb;
use crate::grid::geometry::{RasterSpec, SurfaceSize};

#[derive(Debug, Clone, Default)]
pub struct Raster {
    layout: RasterSpec,
    pixels: Vec<[u8; 4]>,
}

impl Raster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(&self) -> &RasterSpec {
        &self.layout
    }

    /// RGBA at backing pixel `(x, y)`; None outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.layout.pixel_width || y >= self.layout.pixel_height {
            return None;
        }
        self.pixels
            .get(y as usize * self.layout.pixel_width as usize + x as usize)
            .copied()
    }

    /// RGBA under logical point `p`
    pub fn sample(&self, p: Vec2) -> Option<[u8; 4]> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let device = p * self.layout.pixel_ratio;
        self.pixel(device.x as u32, device.y as u32)
    }

    /// Number of non-transparent pixels
    pub fn coverage(&self) -> usize {
        self.pixels.iter().filter(|px| px[3] != 0).count()
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

impl DotSurface for Raster {
    fn configure(&mut self, raster: &RasterSpec) {
        self.layout = *raster;
        let len = raster.pixel_width as usize * raster.pixel_height as usize;
        self.pixels.clear();
        self.pixels.resize(len, [0; 4]);
    }

    fn logical_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.layout.width, self.layout.height)
    }

    fn begin_frame(&mut self) -> bool {
        !self.layout.is_empty()
    }

    fn clear(&mut self) {
        self.pixels.fill([0; 4]);
    }

    fn fill_dot(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let ratio = self.layout.pixel_ratio;
        let (c, r) = (center * ratio, radius * ratio);
        if !(r > 0.0) || !c.is_finite() {
            return;
        }
        let (w, h) = (self.layout.pixel_width as i64, self.layout.pixel_height as i64);
        let x0 = ((c.x - r).floor() as i64).max(0);
        let x1 = ((c.x + r).ceil() as i64).min(w - 1);
        let y0 = ((c.y - r).floor() as i64).max(0);
        let y1 = ((c.y + r).ceil() as i64).min(h - 1);
        let rsq = r * r;
        let rgba = [color.r, color.g, color.b, 255];

        for py in y0..=y1 {
            let dy = py as f32 + 0.5 - c.y;
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - c.x;
                if dx * dx + dy * dy <= rsq {
                    self.pixels[(py * w + px) as usize] = rgba;
                }
            }
        }
    }

    fn end_frame(&mut self) {}

    fn name(&self) -> &'static str {
        "raster"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(w: f32, h: f32, dpr: f32) -> Raster {
        let mut r = Raster::new();
        r.configure(&RasterSpec::new(SurfaceSize::new(w, h), dpr));
        r
    }

    #[test]
    fn test_fill_and_clear() {
        let mut r = raster(40.0, 20.0, 1.0);
        let red = Rgb::new(255, 0, 0);
        r.fill_dot(Vec2::new(10.0, 10.0), 4.0, red);
        assert_eq!(r.sample(Vec2::new(10.0, 10.0)), Some([255, 0, 0, 255]));
        assert_eq!(r.sample(Vec2::new(30.0, 10.0)), Some([0, 0, 0, 0]));
        assert!(r.coverage() > 0);

        r.clear();
        assert_eq!(r.coverage(), 0);
    }

    #[test]
    fn test_pixel_ratio_scales_backing() {
        let mut r = raster(40.0, 20.0, 2.0);
        assert_eq!(r.layout().pixel_width, 80);
        r.fill_dot(Vec2::new(10.0, 10.0), 4.0, Rgb::new(0, 0, 255));
        // Logical (10, 10) is device (20, 20)
        assert_eq!(r.pixel(20, 20), Some([0, 0, 255, 255]));
        assert_eq!(r.pixel(80, 0), None);
    }

    #[test]
    fn test_clipped_at_edges() {
        let mut r = raster(10.0, 10.0, 1.0);
        r.fill_dot(Vec2::new(0.0, 0.0), 5.0, Rgb::new(1, 2, 3));
        r.fill_dot(Vec2::new(-50.0, -50.0), 5.0, Rgb::new(1, 2, 3));
        r.fill_dot(Vec2::new(100.0, 3.0), 5.0, Rgb::new(1, 2, 3));
        assert_eq!(r.pixel(0, 0), Some([1, 2, 3, 255]));
        assert_eq!(r.pixel(9, 9), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_unconfigured_refuses_frames() {
        let mut r = Raster::new();
        assert!(!r.begin_frame());
        assert!(r.logical_size().is_empty());
        r.fill_dot(Vec2::ZERO, 3.0, Rgb::BLACK);
        assert_eq!(r.coverage(), 0);
    }
}
