//! Dot Grid - A pointer-reactive dot grid background animation
//!
//! Core modules:
//! - `grid`: Platform-neutral engine (geometry, pointer physics, animator, lifecycle)
//! - `renderer`: Render loop and drawing surfaces (CPU raster, WebGPU, Canvas 2D)
//! - `platform`: Browser glue (DOM listeners, frame loop, resize observation)
//! - `config`: Data-driven component configuration
//! - `demo`: Seeded scripted pointer sessions for headless runs

pub mod color;
pub mod config;
pub mod demo;
pub mod error;
pub mod grid;
pub mod platform;
pub mod renderer;
pub mod timing;

pub use color::Rgb;
pub use config::{GridConfig, PushMode, RendererPreference};
pub use error::GridError;
pub use grid::{DotGrid, Host, StaticHost, SurfaceSize};
pub use renderer::{DotSurface, FrameReport, Raster};

#[cfg(target_arch = "wasm32")]
pub use platform::{DotGridHandle, mount_dot_grid};

/// Engine constants
pub mod consts {
    /// Default dot diameter (px)
    pub const DOT_SIZE: f32 = 16.0;
    /// Default gap between dots (px)
    pub const GAP: f32 = 32.0;
    /// Default base dot color
    pub const BASE_COLOR: &str = "#5227FF";
    /// Default highlight color near the pointer
    pub const ACTIVE_COLOR: &str = "#5227FF";
    /// Default highlight/push radius around the pointer (px)
    pub const PROXIMITY: f32 = 150.0;
    /// Pointer speed above which nearby dots get pushed (px/s)
    pub const SPEED_TRIGGER: f32 = 100.0;
    /// Click shockwave radius (px)
    pub const SHOCK_RADIUS: f32 = 250.0;
    /// Click shockwave strength multiplier
    pub const SHOCK_STRENGTH: f32 = 5.0;
    /// Pointer velocity clamp (px/s)
    pub const MAX_SPEED: f32 = 5000.0;
    /// Inertial push deceleration (px/s²)
    pub const RESISTANCE: f32 = 750.0;
    /// Elastic return duration (s)
    pub const RETURN_DURATION: f32 = 1.5;

    /// Surfaces narrower than this get a sparser grid
    pub const SMALL_SURFACE_WIDTH: f32 = 768.0;
    /// Gap multiplier on small surfaces
    pub const SMALL_GAP_SCALE: f32 = 1.5;
    /// Dot diameter multiplier on small surfaces
    pub const SMALL_DOT_SCALE: f32 = 0.9;
    /// Largest logical raster dimension (px)
    pub const MAX_SURFACE_DIMENSION: f32 = 4096.0;
    /// Device pixel ratio cap
    pub const MAX_PIXEL_RATIO: f32 = 2.0;
    /// Smallest dot pitch (dot + gap, px); bounds the dot count per surface
    pub const MIN_CELL_SIZE: f32 = 4.0;

    /// Minimum spacing between accepted pointer-move samples (ms)
    pub const MOVE_THROTTLE_MS: f64 = 50.0;
    /// Resize notification debounce (ms)
    pub const RESIZE_DEBOUNCE_MS: f64 = 100.0;
    /// Delay before retrying a zero-size initial build (ms)
    pub const ZERO_SIZE_RETRY_MS: f64 = 100.0;
    /// Assumed sample interval when timestamps don't advance (ms)
    pub const FALLBACK_SAMPLE_MS: f64 = 16.0;
    /// Largest frame delta fed to the animator (s)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Converts pointer velocity (px/s) into extra push distance (px)
    pub const VELOCITY_PUSH_FACTOR: f32 = 0.005;
    /// Duration of the eased (non-inertial) push (s)
    pub const EASED_PUSH_DURATION: f32 = 0.3;
    /// Upper bound on an inertial push (s)
    pub const MAX_INERTIA_DURATION: f32 = 3.0;
    /// Elastic return amplitude
    pub const ELASTIC_AMPLITUDE: f32 = 1.0;
    /// Elastic return period
    pub const ELASTIC_PERIOD: f32 = 0.75;
}
