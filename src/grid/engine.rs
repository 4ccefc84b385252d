//! The per-instance engine a host drives
//!
//! Hosts forward DOM-ish events (`pointer_moved`, `clicked`, `notify_resize`)
//! and call [`DotGrid::frame`] once per animation frame. Everything else
//! (debounced rebuilds, animation, painting) happens inside `frame`.

use glam::Vec2;

use super::animator::DisplacementAnimator;
use super::dot::Dot;
use super::geometry::{Geometry, SurfaceSize};
use super::interaction::InteractionEngine;
use super::lifecycle::{BuildDecision, BuildTrigger, Lifecycle, LifecyclePhase};
use crate::color::Palette;
use crate::config::GridConfig;
use crate::consts::MAX_FRAME_DT;
use crate::renderer::{DotSurface, FrameReport, render_frame};

/// Container measurements supplied by the host
pub trait Host {
    /// Logical size of the container; None if it can't be measured
    fn measure(&self) -> Option<SurfaceSize>;

    fn pixel_ratio(&self) -> f32;
}

/// Fixed-size host, for native runs and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticHost {
    pub size: SurfaceSize,
    pub pixel_ratio: f32,
}

impl StaticHost {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            pixel_ratio: 1.0,
        }
    }
}

impl Host for StaticHost {
    fn measure(&self) -> Option<SurfaceSize> {
        Some(self.size)
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}

pub struct DotGrid {
    config: GridConfig,
    palette: Palette,
    geometry: Geometry,
    dots: Vec<Dot>,
    interaction: InteractionEngine,
    animator: DisplacementAnimator,
    lifecycle: Lifecycle,
    last_frame: Option<f64>,
    builds: u32,
}

impl DotGrid {
    pub fn new(config: GridConfig) -> Self {
        let config = config.sanitized();
        Self {
            palette: config.palette(),
            animator: DisplacementAnimator::from_config(&config),
            config,
            geometry: Geometry::default(),
            dots: Vec::new(),
            interaction: InteractionEngine::new(),
            lifecycle: Lifecycle::new(),
            last_frame: None,
            builds: 0,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.lifecycle.phase()
    }

    /// Canvas-relative pointer position, if any sample has arrived
    pub fn pointer(&self) -> Option<Vec2> {
        self.interaction.pointer.position
    }

    /// Dots with an animation in flight
    pub fn displaced(&self) -> usize {
        self.animator.active()
    }

    /// Completed geometry builds since construction
    pub fn builds(&self) -> u32 {
        self.builds
    }

    pub fn mount(&mut self, now: f64) {
        log::info!(
            "Mounting dot grid ({} push, dot {} gap {})",
            self.config.push_mode.as_str(),
            self.config.dot_size,
            self.config.gap
        );
        self.interaction.reset();
        self.last_frame = Some(now);
        self.lifecycle.mount();
    }

    pub fn notify_resize(&mut self, now: f64) {
        self.lifecycle.notify_resize(now);
    }

    /// Swap in a new config. Only dot size and gap force a rebuild; every
    /// other parameter applies to the next frame or interaction.
    pub fn set_config(&mut self, config: GridConfig) {
        let config = config.sanitized();
        if self.config.needs_rebuild(&config) {
            log::debug!("Layout changed, rebuilding");
            self.lifecycle.notify_layout_change();
        }
        self.palette = config.palette();
        self.animator.configure(&config);
        self.config = config;
    }

    pub fn pointer_moved(&mut self, client: Vec2, origin: Vec2, now: f64) -> usize {
        if !self.lifecycle.is_active() {
            return 0;
        }
        self.interaction
            .pointer_moved(client, origin, now, &mut self.dots, &mut self.animator, &self.config)
    }

    pub fn clicked(&mut self, client: Vec2, origin: Vec2) -> usize {
        if !self.lifecycle.is_active() {
            return 0;
        }
        self.interaction
            .clicked(client, origin, &mut self.dots, &mut self.animator, &self.config)
    }

    /// Run one animation frame at time `now` (ms)
    pub fn frame(&mut self, now: f64, host: &dyn Host, surface: &mut dyn DotSurface) -> FrameReport {
        if !self.lifecycle.is_active() {
            return FrameReport::Skipped;
        }

        if let Some(trigger) = self.lifecycle.poll(now) {
            self.build(trigger, now, host, surface);
        }

        let dt = match self.last_frame {
            Some(last) => (((now - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_frame = Some(now);
        self.animator.advance(&mut self.dots, dt);

        render_frame(
            surface,
            &self.dots,
            self.geometry.dot_radius(),
            self.interaction.pointer.position,
            &self.palette,
            self.config.proximity,
        )
    }

    fn build(&mut self, trigger: BuildTrigger, now: f64, host: &dyn Host, surface: &mut dyn DotSurface) {
        let size = host.measure().unwrap_or(SurfaceSize::ZERO);
        match self.lifecycle.decide(trigger, size.is_empty(), now) {
            BuildDecision::RetryLater => {
                log::debug!("Container has no size yet ({trigger:?}), retrying");
            }
            BuildDecision::KeepPrevious => {
                log::debug!("Container still has no size, keeping previous grid");
            }
            BuildDecision::Build => {
                let geometry =
                    Geometry::compute(size, host.pixel_ratio(), self.config.dot_size, self.config.gap);
                surface.configure(&geometry.raster);
                self.dots = geometry.dots();
                self.animator.reset(self.dots.len());
                log::debug!(
                    "Built {}x{} grid ({} dots) for {}x{} on {} ({trigger:?})",
                    geometry.cols,
                    geometry.rows,
                    self.dots.len(),
                    size.width,
                    size.height,
                    surface.name()
                );
                self.geometry = geometry;
                self.builds += 1;
            }
        }
    }

    /// Tear down: pending rebuilds are cancelled and every later call is a no-op
    pub fn unmount(&mut self) {
        if self.lifecycle.phase() == LifecyclePhase::TornDown {
            return;
        }
        self.lifecycle.unmount();
        self.animator.reset(0);
        self.dots.clear();
        self.last_frame = None;
        log::info!("Dot grid unmounted");
    }
}
