//! Pointer interaction: sweeps and click shockwaves
//!
//! Both interactions reduce to an [`Impulse`] that yields a displacement for
//! each idle dot in reach; the animator does the rest.

use glam::Vec2;

use super::animator::DisplacementAnimator;
use super::dot::Dot;
use super::pointer::PointerState;
use crate::config::GridConfig;
use crate::consts::{MOVE_THROTTLE_MS, VELOCITY_PUSH_FACTOR};
use crate::timing::Throttle;

/// Something that pushes dots
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Impulse {
    /// Fast pointer movement through the grid
    Sweep { pointer: Vec2, velocity: Vec2 },
    /// Click/tap at a point
    Shock { origin: Vec2 },
}

impl Impulse {
    /// Pushed offset for a dot resting at `rest`, or None if out of reach
    pub fn push_for(&self, rest: Vec2, config: &GridConfig) -> Option<Vec2> {
        match *self {
            Impulse::Sweep { pointer, velocity } => {
                let away = rest - pointer;
                if away.length() < config.proximity {
                    Some(away + velocity * VELOCITY_PUSH_FACTOR)
                } else {
                    None
                }
            }
            Impulse::Shock { origin } => {
                let away = rest - origin;
                let dist = away.length();
                if dist < config.shock_radius {
                    let falloff = (1.0 - dist / config.shock_radius).max(0.0);
                    Some(away * config.shock_strength * falloff)
                } else {
                    None
                }
            }
        }
    }
}

/// Push every idle dot the impulse reaches. Returns how many were pushed.
pub fn apply_impulse(
    impulse: Impulse,
    dots: &mut [Dot],
    animator: &mut DisplacementAnimator,
    config: &GridConfig,
) -> usize {
    let mut pushed = 0;
    for index in 0..dots.len() {
        let dot = &dots[index];
        if !dot.is_idle() {
            continue;
        }
        if let Some(target) = impulse.push_for(dot.rest, config) {
            if animator.displace(dots, index, target) {
                pushed += 1;
            }
        }
    }
    pushed
}

/// Pointer state plus move throttling for one grid instance
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    pub pointer: PointerState,
    throttle: Throttle,
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionEngine {
    pub fn new() -> Self {
        Self {
            pointer: PointerState::new(),
            throttle: Throttle::new(MOVE_THROTTLE_MS),
        }
    }

    pub fn reset(&mut self) {
        self.pointer.reset();
        self.throttle.reset();
    }

    /// Handle a raw pointer-move event.
    ///
    /// Samples closer than the throttle interval are dropped entirely. An
    /// accepted sample updates the pointer and, above the speed trigger,
    /// sweeps nearby dots. Returns the number of dots pushed.
    pub fn pointer_moved(
        &mut self,
        client: Vec2,
        origin: Vec2,
        now: f64,
        dots: &mut [Dot],
        animator: &mut DisplacementAnimator,
        config: &GridConfig,
    ) -> usize {
        if !self.throttle.ready(now) {
            return 0;
        }
        self.pointer.sample(client, origin, now, config.max_speed);

        let Some(pointer) = self.pointer.position else {
            return 0;
        };
        if self.pointer.speed <= config.speed_trigger {
            return 0;
        }
        let impulse = Impulse::Sweep {
            pointer,
            velocity: self.pointer.velocity,
        };
        apply_impulse(impulse, dots, animator, config)
    }

    /// Handle a click anywhere on the page (client coordinates)
    pub fn clicked(
        &self,
        client: Vec2,
        origin: Vec2,
        dots: &mut [Dot],
        animator: &mut DisplacementAnimator,
        config: &GridConfig,
    ) -> usize {
        let impulse = Impulse::Shock {
            origin: client - origin,
        };
        apply_impulse(impulse, dots, animator, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::dot::DotPhase;

    fn setup(config: &GridConfig, rests: &[Vec2]) -> (Vec<Dot>, DisplacementAnimator) {
        let dots: Vec<Dot> = rests.iter().copied().map(Dot::new).collect();
        let mut anim = DisplacementAnimator::from_config(config);
        anim.reset(dots.len());
        (dots, anim)
    }

    #[test]
    fn test_shock_falloff() {
        let config = GridConfig::default().with_shock(100.0, 2.0);
        let shock = Impulse::Shock { origin: Vec2::ZERO };

        let push = shock.push_for(Vec2::new(50.0, 0.0), &config).unwrap();
        // (50, 0) * 2 * 0.5
        assert!(push.abs_diff_eq(Vec2::new(50.0, 0.0), 1e-4));

        // Exactly on the radius: no displacement
        assert_eq!(shock.push_for(Vec2::new(100.0, 0.0), &config), None);
        assert_eq!(shock.push_for(Vec2::new(0.0, 150.0), &config), None);
    }

    #[test]
    fn test_click_at_shock_radius_leaves_dot_idle() {
        let config = GridConfig::default();
        let (mut dots, mut anim) = setup(&config, &[Vec2::new(250.0, 0.0), Vec2::new(100.0, 0.0)]);
        let engine = InteractionEngine::new();
        let pushed = engine.clicked(Vec2::ZERO, Vec2::ZERO, &mut dots, &mut anim, &config);
        assert_eq!(pushed, 1);
        assert_eq!(dots[0].phase, DotPhase::Idle);
        assert_eq!(anim.target_of(0), None);
        assert_eq!(dots[1].phase, DotPhase::Displaced);
        // (100, 0) * 5 * (1 - 100/250)
        assert!(anim.target_of(1).unwrap().abs_diff_eq(Vec2::new(300.0, 0.0), 1e-3));
    }

    #[test]
    fn test_click_uses_surface_relative_coordinates() {
        let config = GridConfig::default();
        let (mut dots, mut anim) = setup(&config, &[Vec2::new(10.0, 10.0)]);
        let engine = InteractionEngine::new();
        // Surface starts at (1000, 1000) on the page; click right next to the dot
        let pushed = engine.clicked(
            Vec2::new(1005.0, 1010.0),
            Vec2::new(1000.0, 1000.0),
            &mut dots,
            &mut anim,
            &config,
        );
        assert_eq!(pushed, 1);
    }

    #[test]
    fn test_sweep_push_vector() {
        let config = GridConfig::default();
        let sweep = Impulse::Sweep {
            pointer: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(2000.0, 0.0),
        };
        let push = sweep.push_for(Vec2::new(120.0, 100.0), &config).unwrap();
        assert!(push.abs_diff_eq(Vec2::new(30.0, 0.0), 1e-4));
        assert_eq!(sweep.push_for(Vec2::new(300.0, 100.0), &config), None);
    }

    #[test]
    fn test_slow_movement_pushes_nothing() {
        let config = GridConfig::default();
        let (mut dots, mut anim) = setup(&config, &[Vec2::new(100.0, 100.0)]);
        let mut engine = InteractionEngine::new();
        engine.pointer_moved(Vec2::new(90.0, 100.0), Vec2::ZERO, 0.0, &mut dots, &mut anim, &config);
        // 2 px in 100 ms = 20 px/s, below the 100 px/s trigger
        let pushed =
            engine.pointer_moved(Vec2::new(92.0, 100.0), Vec2::ZERO, 100.0, &mut dots, &mut anim, &config);
        assert_eq!(pushed, 0);
        assert!(dots[0].is_idle());
        assert_eq!(engine.pointer.position, Some(Vec2::new(92.0, 100.0)));
    }

    #[test]
    fn test_fast_movement_pushes_nearby_dots() {
        let config = GridConfig::default();
        let (mut dots, mut anim) =
            setup(&config, &[Vec2::new(100.0, 100.0), Vec2::new(600.0, 100.0)]);
        let mut engine = InteractionEngine::new();
        engine.pointer_moved(Vec2::new(0.0, 100.0), Vec2::ZERO, 0.0, &mut dots, &mut anim, &config);
        let pushed =
            engine.pointer_moved(Vec2::new(80.0, 100.0), Vec2::ZERO, 50.0, &mut dots, &mut anim, &config);
        assert_eq!(pushed, 1);
        assert_eq!(dots[0].phase, DotPhase::Displaced);
        assert!(dots[1].is_idle());
        // rest - pointer + v * 0.005 = (20, 0) + (1600, 0) * 0.005
        assert!(anim.target_of(0).unwrap().abs_diff_eq(Vec2::new(28.0, 0.0), 1e-3));
    }

    #[test]
    fn test_throttled_samples_are_dropped() {
        let config = GridConfig::default();
        let (mut dots, mut anim) = setup(&config, &[Vec2::new(100.0, 100.0)]);
        let mut engine = InteractionEngine::new();
        engine.pointer_moved(Vec2::new(0.0, 0.0), Vec2::ZERO, 0.0, &mut dots, &mut anim, &config);
        let pushed =
            engine.pointer_moved(Vec2::new(95.0, 100.0), Vec2::ZERO, 10.0, &mut dots, &mut anim, &config);
        assert_eq!(pushed, 0);
        assert_eq!(engine.pointer.position, Some(Vec2::ZERO));
    }

    #[test]
    fn test_repeated_sweeps_keep_first_target() {
        let config = GridConfig::default();
        let (mut dots, mut anim) = setup(&config, &[Vec2::new(100.0, 100.0)]);
        let mut engine = InteractionEngine::new();
        engine.pointer_moved(Vec2::new(0.0, 100.0), Vec2::ZERO, 0.0, &mut dots, &mut anim, &config);
        engine.pointer_moved(Vec2::new(80.0, 100.0), Vec2::ZERO, 50.0, &mut dots, &mut anim, &config);
        let first = anim.target_of(0).unwrap();

        let pushed =
            engine.pointer_moved(Vec2::new(180.0, 60.0), Vec2::ZERO, 100.0, &mut dots, &mut anim, &config);
        assert_eq!(pushed, 0);
        assert_eq!(anim.target_of(0), Some(first));

        let shocked = engine.clicked(Vec2::new(90.0, 100.0), Vec2::ZERO, &mut dots, &mut anim, &config);
        assert_eq!(shocked, 0);
        assert_eq!(anim.target_of(0), Some(first));
    }
}
