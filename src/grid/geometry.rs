//! Grid geometry
//!
//! Lays out a centered regular grid of dots for a drawing surface:
//! - Narrow surfaces (< 768 px) trade density for per-dot cost
//! - Backing raster resolution is clamped (pixel ratio ≤ 2, sides ≤ 4096)
//! - `n = max(1, floor((side + gap) / (dot + gap)))` per axis, with the
//!   gap widened so a cell is never under `MIN_CELL_SIZE`

use glam::Vec2;

use super::dot::Dot;
use crate::consts::*;

/// Logical size of the hosting container (CSS px)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const ZERO: SurfaceSize = SurfaceSize {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// No usable area (zero, negative or non-finite side)
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Backing raster for a surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RasterSpec {
    /// Logical width after the dimension cap
    pub width: f32,
    /// Logical height after the dimension cap
    pub height: f32,
    /// Device pixels per logical pixel
    pub pixel_ratio: f32,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl RasterSpec {
    pub fn new(size: SurfaceSize, device_pixel_ratio: f32) -> Self {
        if size.is_empty() {
            return Self::default();
        }
        let pixel_ratio = clamp_pixel_ratio(device_pixel_ratio);
        let width = size.width.min(MAX_SURFACE_DIMENSION);
        let height = size.height.min(MAX_SURFACE_DIMENSION);
        Self {
            width,
            height,
            pixel_ratio,
            pixel_width: (width * pixel_ratio) as u32,
            pixel_height: (height * pixel_ratio) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_width == 0 || self.pixel_height == 0
    }
}

/// `min(dpr, 2)`, with unusable ratios treated as 1
pub fn clamp_pixel_ratio(dpr: f32) -> f32 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Computed grid layout for one surface size
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub raster: RasterSpec,
    /// Effective dot diameter (after small-surface scaling)
    pub dot_size: f32,
    /// Effective gap (after small-surface scaling)
    pub gap: f32,
    pub cols: usize,
    pub rows: usize,
    /// Center of the top-left dot
    pub start: Vec2,
}

impl Geometry {
    /// Lay out the grid; empty surfaces give an empty geometry
    pub fn compute(size: SurfaceSize, device_pixel_ratio: f32, dot_size: f32, gap: f32) -> Self {
        let raster = RasterSpec::new(size, device_pixel_ratio);
        if size.is_empty() {
            return Self {
                raster,
                dot_size,
                gap,
                ..Default::default()
            };
        }

        let (dot_size, gap) = if size.width < SMALL_SURFACE_WIDTH {
            ((dot_size * SMALL_DOT_SCALE), (gap * SMALL_GAP_SCALE).max(gap))
        } else {
            (dot_size, gap)
        };
        let gap = gap.max(MIN_CELL_SIZE - dot_size);

        let (width, height) = (raster.width, raster.height);
        let cell = dot_size + gap;
        let cols = (((width + gap) / cell).floor() as usize).max(1);
        let rows = (((height + gap) / cell).floor() as usize).max(1);

        let grid_w = cell * cols as f32 - gap;
        let grid_h = cell * rows as f32 - gap;
        let start = Vec2::new(
            (width - grid_w) / 2.0 + dot_size / 2.0,
            (height - grid_h) / 2.0 + dot_size / 2.0,
        );

        Self {
            raster,
            dot_size,
            gap,
            cols,
            rows,
            start,
        }
    }

    /// Distance between neighbouring dot centers
    #[inline]
    pub fn cell(&self) -> f32 {
        self.dot_size + self.gap
    }

    #[inline]
    pub fn dot_radius(&self) -> f32 {
        self.dot_size / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    /// Emit one dot per cell whose center lies on the surface
    pub fn dots(&self) -> Vec<Dot> {
        let (width, height) = (self.raster.width, self.raster.height);
        let cell = self.cell();
        let mut dots = Vec::with_capacity(self.cols.saturating_mul(self.rows));
        for row in 0..self.rows {
            for col in 0..self.cols {
                let center = self.start + Vec2::new(col as f32 * cell, row as f32 * cell);
                if center.x >= 0.0 && center.x <= width && center.y >= 0.0 && center.y <= height {
                    dots.push(Dot::new(center));
                }
            }
        }
        dots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_800_by_400_layout() {
        let geo = Geometry::compute(SurfaceSize::new(800.0, 400.0), 1.0, 16.0, 32.0);
        assert_eq!(geo.cols, 17);
        assert_eq!(geo.rows, 9);
        let dots = geo.dots();
        assert_eq!(dots.len(), 153);

        // Horizontal margins: nonzero and symmetric
        let left = dots[0].rest.x - geo.dot_radius();
        let right = 800.0 - (dots[16].rest.x + geo.dot_radius());
        assert!(left > 0.0);
        assert!((left - right).abs() < 1e-4);
        assert!((left - 8.0).abs() < 1e-4);

        // Vertical margins symmetric
        let top = dots[0].rest.y - geo.dot_radius();
        let bottom = 400.0 - (dots[152].rest.y + geo.dot_radius());
        assert!((top - bottom).abs() < 1e-4);
    }

    #[test]
    fn test_small_surface_is_sparser() {
        let geo = Geometry::compute(SurfaceSize::new(400.0, 300.0), 1.0, 16.0, 32.0);
        assert!((geo.gap - 48.0).abs() < 1e-5);
        assert!((geo.dot_size - 14.4).abs() < 1e-5);
        // floor((400 + 48) / 62.4) = 7
        assert_eq!(geo.cols, 7);
    }

    #[test]
    fn test_raster_clamps() {
        let raster = RasterSpec::new(SurfaceSize::new(5000.0, 300.0), 3.0);
        assert_eq!(raster.pixel_ratio, 2.0);
        assert_eq!(raster.width, 4096.0);
        assert_eq!(raster.pixel_width, 8192);
        assert_eq!(raster.pixel_height, 600);

        let raster = RasterSpec::new(SurfaceSize::new(100.0, 100.0), f32::NAN);
        assert_eq!(raster.pixel_ratio, 1.0);
    }

    #[test]
    fn test_zero_size_is_empty() {
        for size in [
            SurfaceSize::ZERO,
            SurfaceSize::new(0.0, 300.0),
            SurfaceSize::new(300.0, -1.0),
            SurfaceSize::new(f32::INFINITY, 300.0),
        ] {
            let geo = Geometry::compute(size, 1.0, 16.0, 32.0);
            assert!(geo.is_empty());
            assert!(geo.dots().is_empty());
            assert!(geo.raster.is_empty());
        }
    }

    #[test]
    fn test_tiny_surface_keeps_one_dot() {
        let geo = Geometry::compute(SurfaceSize::new(10.0, 10.0), 1.0, 16.0, 32.0);
        assert_eq!((geo.cols, geo.rows), (1, 1));
        let dots = geo.dots();
        assert_eq!(dots.len(), 1);
        assert!(dots[0].rest.abs_diff_eq(Vec2::new(5.0, 5.0), 1e-4));
    }

    #[test]
    fn test_vanishing_cell_is_bounded() {
        let geo = Geometry::compute(SurfaceSize::new(800.0, 400.0), 1.0, 1e-9, 0.0);
        assert!(geo.cell() >= MIN_CELL_SIZE);
        // floor((800 + 4) / 4) = 201, floor((400 + 4) / 4) = 101
        assert_eq!((geo.cols, geo.rows), (201, 101));
        assert_eq!(geo.dots().len(), 201 * 101);

        // Largest surface still gives a bounded grid
        let geo = Geometry::compute(SurfaceSize::new(1e9, 1e9), 4.0, 0.01, 0.0);
        assert!(geo.cols <= 1025 && geo.rows <= 1025);
    }

    proptest! {
        #[test]
        fn dots_stay_on_surface(
            w in 1.0f32..5000.0,
            h in 1.0f32..5000.0,
            dot in 1.0f32..64.0,
            gap in 0.0f32..128.0,
            dpr in 0.5f32..4.0,
        ) {
            let geo = Geometry::compute(SurfaceSize::new(w, h), dpr, dot, gap);
            let (sw, sh) = (geo.raster.width, geo.raster.height);
            for d in geo.dots() {
                prop_assert!(d.rest.x >= 0.0 && d.rest.x <= sw);
                prop_assert!(d.rest.y >= 0.0 && d.rest.y <= sh);
                prop_assert_eq!(d.offset, Vec2::ZERO);
            }
        }
    }
}
