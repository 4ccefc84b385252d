//! Displacement animator
//!
//! Drives each pushed dot through `Displaced → Returning → Idle`:
//! 1. Push: offset travels to the target using the configured [`PushProfile`]
//! 2. Return: offset springs back to zero with an elastic curve
//!
//! Tracks are indexed like the dot slice and advanced once per frame.

use glam::Vec2;

use super::dot::{Dot, DotPhase};
use super::easing::Ease;
use crate::config::{GridConfig, PushMode};
use crate::consts::{EASED_PUSH_DURATION, MAX_INERTIA_DURATION};

/// A single offset animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: Vec2,
    pub to: Vec2,
    /// Seconds
    pub duration: f32,
    pub ease: Ease,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: Vec2, to: Vec2, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            ease,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds; returns the new value and whether it finished
    pub fn step(&mut self, dt: f32) -> (Vec2, bool) {
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            return (self.to, true);
        }
        let t = self.ease.apply(self.elapsed / self.duration);
        (self.from + (self.to - self.from) * t, false)
    }
}

/// Strategy for the outbound leg of a push
pub trait PushProfile: std::fmt::Debug {
    /// Plan the tween from the current offset to the pushed offset
    fn plan(&self, from: Vec2, to: Vec2) -> Tween;

    fn name(&self) -> &'static str;
}

/// Constant deceleration: the dot launches fast and coasts to a stop exactly
/// on the target. Higher resistance means a shorter, snappier push.
#[derive(Debug, Clone, Copy)]
pub struct InertialPush {
    /// Deceleration in px/s²
    pub resistance: f32,
}

impl PushProfile for InertialPush {
    fn plan(&self, from: Vec2, to: Vec2) -> Tween {
        let distance = from.distance(to);
        // s = a t² / 2  =>  t = sqrt(2 s / a)
        let duration = (2.0 * distance / self.resistance).sqrt().min(MAX_INERTIA_DURATION);
        Tween::new(from, to, duration, Ease::Power2Out)
    }

    fn name(&self) -> &'static str {
        "inertial"
    }
}

/// Fixed-duration eased push
#[derive(Debug, Clone, Copy)]
pub struct EasedPush {
    /// Seconds
    pub duration: f32,
}

impl Default for EasedPush {
    fn default() -> Self {
        Self {
            duration: EASED_PUSH_DURATION,
        }
    }
}

impl PushProfile for EasedPush {
    fn plan(&self, from: Vec2, to: Vec2) -> Tween {
        Tween::new(from, to, self.duration, Ease::Power2Out)
    }

    fn name(&self) -> &'static str {
        "eased"
    }
}

/// Build the push strategy selected by `config`
pub fn push_profile(config: &GridConfig) -> Box<dyn PushProfile> {
    match config.push_mode {
        PushMode::Inertial => Box::new(InertialPush {
            resistance: config.resistance,
        }),
        PushMode::Eased => Box::new(EasedPush::default()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Push,
    Return,
}

#[derive(Debug, Clone, Copy)]
struct Track {
    tween: Tween,
    stage: Stage,
}

/// Per-dot offset animations for one grid
#[derive(Debug)]
pub struct DisplacementAnimator {
    tracks: Vec<Option<Track>>,
    active: usize,
    profile: Box<dyn PushProfile>,
    return_duration: f32,
}

impl DisplacementAnimator {
    pub fn new(profile: Box<dyn PushProfile>, return_duration: f32) -> Self {
        Self {
            tracks: Vec::new(),
            active: 0,
            profile,
            return_duration,
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(push_profile(config), config.return_duration)
    }

    /// Apply a config change that doesn't touch the layout
    pub fn configure(&mut self, config: &GridConfig) {
        self.profile = push_profile(config);
        self.return_duration = config.return_duration;
    }

    /// Drop every track and size for a fresh dot set
    pub fn reset(&mut self, len: usize) {
        self.tracks.clear();
        self.tracks.resize(len, None);
        self.active = 0;
    }

    /// Number of dots with an animation in flight
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn profile_name(&self) -> &'static str {
        self.profile.name()
    }

    /// Where dot `index` is headed on its current leg
    pub fn target_of(&self, index: usize) -> Option<Vec2> {
        self.tracks.get(index).copied().flatten().map(|t| t.tween.to)
    }

    /// Push dot `index` toward `target`, then schedule its return.
    ///
    /// Ignored (returns false) unless the dot is idle.
    pub fn displace(&mut self, dots: &mut [Dot], index: usize, target: Vec2) -> bool {
        let (Some(dot), Some(slot)) = (dots.get_mut(index), self.tracks.get_mut(index)) else {
            return false;
        };
        if !dot.is_idle() {
            return false;
        }
        dot.phase = DotPhase::Displaced;
        *slot = Some(Track {
            tween: self.profile.plan(dot.offset, target),
            stage: Stage::Push,
        });
        self.active += 1;
        true
    }

    /// Advance every track by `dt` seconds, writing offsets back into `dots`
    pub fn advance(&mut self, dots: &mut [Dot], dt: f32) {
        if self.active == 0 {
            return;
        }
        for (slot, dot) in self.tracks.iter_mut().zip(dots.iter_mut()) {
            let Some(track) = slot else { continue };
            let (offset, done) = track.tween.step(dt);
            dot.offset = offset;
            if !done {
                continue;
            }
            let stage = track.stage;
            match stage {
                Stage::Push => {
                    dot.phase = DotPhase::Returning;
                    *track = Track {
                        tween: Tween::new(dot.offset, Vec2::ZERO, self.return_duration, Ease::elastic_return()),
                        stage: Stage::Return,
                    };
                }
                Stage::Return => {
                    dot.offset = Vec2::ZERO;
                    dot.phase = DotPhase::Idle;
                    *slot = None;
                    self.active -= 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn animator(profile: Box<dyn PushProfile>) -> (DisplacementAnimator, Vec<Dot>) {
        let mut anim = DisplacementAnimator::new(profile, 1.5);
        let dots = vec![Dot::new(Vec2::new(10.0, 10.0)), Dot::new(Vec2::new(50.0, 10.0))];
        anim.reset(dots.len());
        (anim, dots)
    }

    fn run(anim: &mut DisplacementAnimator, dots: &mut [Dot], seconds: f32) {
        let steps = (seconds * 60.0).ceil() as usize;
        for _ in 0..steps {
            anim.advance(dots, 1.0 / 60.0);
        }
    }

    #[test]
    fn test_inertial_duration_follows_resistance() {
        let push = InertialPush { resistance: 750.0 };
        let tween = push.plan(Vec2::ZERO, Vec2::new(60.0, 0.0));
        assert!((tween.duration - 0.4).abs() < 1e-4);

        let stiff = InertialPush { resistance: 3000.0 };
        assert!(stiff.plan(Vec2::ZERO, Vec2::new(60.0, 0.0)).duration < tween.duration);
    }

    #[test]
    fn test_inertial_duration_is_capped() {
        let push = InertialPush { resistance: 1.0 };
        let tween = push.plan(Vec2::ZERO, Vec2::new(10_000.0, 0.0));
        assert_eq!(tween.duration, MAX_INERTIA_DURATION);
    }

    #[test]
    fn test_push_then_return_settles_at_rest() {
        for profile in [
            Box::new(InertialPush { resistance: 750.0 }) as Box<dyn PushProfile>,
            Box::new(EasedPush::default()),
        ] {
            let (mut anim, mut dots) = animator(profile);
            assert!(anim.displace(&mut dots, 0, Vec2::new(40.0, -20.0)));
            assert_eq!(dots[0].phase, DotPhase::Displaced);
            assert_eq!(anim.active(), 1);

            run(&mut anim, &mut dots, 0.5);
            assert_eq!(dots[0].phase, DotPhase::Returning);

            run(&mut anim, &mut dots, 1.6);
            assert_eq!(dots[0].phase, DotPhase::Idle);
            assert_eq!(dots[0].offset, Vec2::ZERO);
            assert_eq!(anim.active(), 0);
            // The untouched dot never moved
            assert_eq!(dots[1].offset, Vec2::ZERO);
        }
    }

    #[test]
    fn test_displace_is_ignored_while_in_flight() {
        let (mut anim, mut dots) = animator(Box::new(EasedPush::default()));
        let first = Vec2::new(30.0, 0.0);
        assert!(anim.displace(&mut dots, 0, first));
        anim.advance(&mut dots, 0.05);

        assert!(!anim.displace(&mut dots, 0, Vec2::new(-100.0, 100.0)));
        assert_eq!(anim.target_of(0), Some(first));
        assert_eq!(anim.active(), 1);

        // Still guarded while returning
        run(&mut anim, &mut dots, 0.3);
        assert_eq!(dots[0].phase, DotPhase::Returning);
        assert!(!anim.displace(&mut dots, 0, Vec2::new(-100.0, 100.0)));
        assert_eq!(anim.target_of(0), Some(Vec2::ZERO));
    }

    #[test]
    fn test_reset_drops_tracks() {
        let (mut anim, mut dots) = animator(Box::new(EasedPush::default()));
        anim.displace(&mut dots, 1, Vec2::new(5.0, 5.0));
        anim.reset(4);
        assert_eq!(anim.active(), 0);
        assert_eq!(anim.target_of(1), None);
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let (mut anim, mut dots) = animator(Box::new(EasedPush::default()));
        assert!(!anim.displace(&mut dots, 7, Vec2::ONE));
    }

    #[test]
    fn test_profile_from_config() {
        let config = GridConfig::default().with_push_mode(PushMode::Eased);
        assert_eq!(push_profile(&config).name(), "eased");
        assert_eq!(push_profile(&GridConfig::default()).name(), "inertial");
    }

    proptest! {
        #[test]
        fn every_episode_converges(x in -2000.0f32..2000.0, y in -2000.0f32..2000.0, resistance in 50.0f32..5000.0) {
            let (mut anim, mut dots) = animator(Box::new(InertialPush { resistance }));
            anim.displace(&mut dots, 0, Vec2::new(x, y));
            run(&mut anim, &mut dots, MAX_INERTIA_DURATION + 1.6);
            prop_assert_eq!(dots[0].offset, Vec2::ZERO);
            prop_assert_eq!(dots[0].phase, DotPhase::Idle);
            prop_assert_eq!(anim.active(), 0);
        }
    }
}
