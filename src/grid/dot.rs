//! The atomic render unit

use glam::Vec2;

/// Where a dot is in its displacement episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DotPhase {
    /// At rest, accepts pushes
    #[default]
    Idle,
    /// Travelling out to its pushed offset
    Displaced,
    /// Springing back to rest
    Returning,
}

/// A grid dot: fixed rest position plus an animated offset
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    /// Grid position, fixed until the next rebuild
    pub rest: Vec2,
    /// Current displacement from `rest`
    pub offset: Vec2,
    pub phase: DotPhase,
}

impl Dot {
    pub fn new(rest: Vec2) -> Self {
        Self {
            rest,
            offset: Vec2::ZERO,
            phase: DotPhase::Idle,
        }
    }

    /// Where the dot is drawn
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.rest + self.offset
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.phase == DotPhase::Idle
    }

    /// Re-entrancy guard: true while any animation is in flight
    #[inline]
    pub fn displaced(&self) -> bool {
        !self.is_idle()
    }
}
