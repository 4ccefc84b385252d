//! Platform-neutral dot grid engine
//!
//! Everything that decides where dots are and how they move lives here.
//! This module must stay free of DOM and GPU types:
//! - Time comes in as host-supplied milliseconds, never from a clock
//! - Pointer coordinates come in client space plus the surface origin
//! - Drawing goes through the `DotSurface` trait

pub mod animator;
pub mod dot;
pub mod easing;
pub mod engine;
pub mod geometry;
pub mod interaction;
pub mod lifecycle;
pub mod pointer;

pub use animator::{DisplacementAnimator, EasedPush, InertialPush, PushProfile, Tween, push_profile};
pub use dot::{Dot, DotPhase};
pub use easing::Ease;
pub use engine::{DotGrid, Host, StaticHost};
pub use geometry::{Geometry, RasterSpec, SurfaceSize, clamp_pixel_ratio};
pub use interaction::{Impulse, InteractionEngine, apply_impulse};
pub use lifecycle::{BuildDecision, BuildTrigger, Lifecycle, LifecyclePhase};
pub use pointer::{PointerState, clamp_velocity};
