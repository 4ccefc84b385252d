//! Platform layer
//!
//! The engine core is platform-neutral; this is where it meets a host.
//! - `web` (wasm32): DOM listeners, animation frames, resize observation
//!
//! Native hosts drive [`crate::DotGrid`] directly (see the `dot-grid` binary).

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{DotGridHandle, mount_dot_grid};
