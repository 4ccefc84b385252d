//! Pointer tracking and velocity estimation

use glam::Vec2;

use crate::consts::FALLBACK_SAMPLE_MS;

/// Last known pointer state for one grid instance
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Surface-relative position (None until the first sample)
    pub position: Option<Vec2>,
    /// Velocity in px/s, already clamped
    pub velocity: Vec2,
    /// `|velocity|`
    pub speed: f32,
    last_client: Option<Vec2>,
    last_time: Option<f64>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a movement sample.
    ///
    /// `client` is in page (client) coordinates and `origin` is the surface's
    /// top-left in the same space. Velocity comes from client deltas over the
    /// elapsed milliseconds; the first sample only sets the baseline.
    pub fn sample(&mut self, client: Vec2, origin: Vec2, now: f64, max_speed: f32) {
        let velocity = match (self.last_client, self.last_time) {
            (Some(last_client), Some(last_time)) => {
                let mut dt = now - last_time;
                if !(dt > 0.0) {
                    dt = FALLBACK_SAMPLE_MS;
                }
                (client - last_client) / dt as f32 * 1000.0
            }
            _ => Vec2::ZERO,
        };

        let (velocity, speed) = clamp_velocity(velocity, max_speed);
        self.velocity = velocity;
        self.speed = speed;
        self.last_client = Some(client);
        self.last_time = Some(now);
        self.position = Some(client - origin);
    }

    /// Forget everything (new mount)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Scale `velocity` down so its length is at most `max_speed`.
///
/// Returns the clamped velocity and its speed; direction is preserved.
pub fn clamp_velocity(velocity: Vec2, max_speed: f32) -> (Vec2, f32) {
    let speed = velocity.length();
    if speed > max_speed && speed > 0.0 {
        (velocity * (max_speed / speed), max_speed)
    } else {
        (velocity, speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_sample_sets_baseline() {
        let mut p = PointerState::new();
        assert!(p.position.is_none());
        p.sample(Vec2::new(500.0, 300.0), Vec2::new(100.0, 50.0), 1000.0, 5000.0);
        assert_eq!(p.position, Some(Vec2::new(400.0, 250.0)));
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.speed, 0.0);
    }

    #[test]
    fn test_velocity_is_per_second() {
        let mut p = PointerState::new();
        p.sample(Vec2::new(0.0, 0.0), Vec2::ZERO, 1000.0, 5000.0);
        p.sample(Vec2::new(30.0, -40.0), Vec2::ZERO, 1050.0, 5000.0);
        assert!(p.velocity.abs_diff_eq(Vec2::new(600.0, -800.0), 1e-3));
        assert!((p.speed - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_velocity_clamped_preserving_direction() {
        // 6000 px/s along (3, 4) with a 4000 px/s cap
        let mut p = PointerState::new();
        p.sample(Vec2::ZERO, Vec2::ZERO, 0.0, 4000.0);
        p.sample(Vec2::new(180.0, 240.0), Vec2::ZERO, 50.0, 4000.0);
        assert!((p.speed - 4000.0).abs() < 1e-3);
        assert!((p.velocity.length() - 4000.0).abs() < 1e-2);
        assert!(p.velocity.normalize().abs_diff_eq(Vec2::new(0.6, 0.8), 1e-5));
    }

    #[test]
    fn test_non_advancing_clock_uses_fallback_interval() {
        let mut p = PointerState::new();
        p.sample(Vec2::ZERO, Vec2::ZERO, 100.0, 5000.0);
        p.sample(Vec2::new(16.0, 0.0), Vec2::ZERO, 100.0, 5000.0);
        assert!((p.velocity.x - 1000.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn clamp_keeps_unit_vector(x in -1.0e5f32..1.0e5, y in -1.0e5f32..1.0e5, cap in 1.0f32..10000.0) {
            let v = Vec2::new(x, y);
            prop_assume!(v.length() > 1.0);
            let (clamped, speed) = clamp_velocity(v, cap);
            prop_assert!(speed <= cap + 1e-3);
            prop_assert!((clamped.length() - speed).abs() <= speed * 1e-4 + 1e-3);
            prop_assert!(clamped.normalize().abs_diff_eq(v.normalize(), 1e-4));
        }
    }
}
