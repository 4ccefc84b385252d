//! Easing curves on normalized time `u ∈ [0, 1]`

use std::f32::consts::TAU;

use crate::consts::{ELASTIC_AMPLITUDE, ELASTIC_PERIOD};

/// Easing curve for a tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    Linear,
    /// `1 - (1 - u)²`, also the position curve of constant deceleration
    Power2Out,
    /// Decaying sine overshoot that settles on 1
    ElasticOut { amplitude: f32, period: f32 },
}

impl Ease {
    /// The return-to-rest curve
    pub const fn elastic_return() -> Self {
        Ease::ElasticOut {
            amplitude: ELASTIC_AMPLITUDE,
            period: ELASTIC_PERIOD,
        }
    }

    /// Progress at normalized time `u` (clamped to [0, 1]).
    ///
    /// Every curve maps 0 → 0 and 1 → 1 exactly.
    pub fn apply(&self, u: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        match *self {
            Ease::Linear => u,
            Ease::Power2Out => {
                let inv = 1.0 - u;
                1.0 - inv * inv
            }
            Ease::ElasticOut { amplitude, period } => elastic_out(u, amplitude, period),
        }
    }
}

fn elastic_out(u: f32, amplitude: f32, period: f32) -> f32 {
    if u <= 0.0 {
        return 0.0;
    }
    if u >= 1.0 {
        return 1.0;
    }
    let a = amplitude.max(1.0);
    let p = period / amplitude.min(1.0);
    // Phase shift so the curve starts at exactly 0
    let shift = p / TAU * (1.0 / a).asin();
    a * 2f32.powf(-10.0 * u) * ((u - shift) * TAU / p).sin() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for ease in [Ease::Linear, Ease::Power2Out, Ease::elastic_return()] {
            assert!(ease.apply(0.0).abs() < 1e-6, "{ease:?} at 0");
            assert_eq!(ease.apply(1.0), 1.0, "{ease:?} at 1");
        }
    }

    #[test]
    fn test_elastic_starts_continuously() {
        let e = Ease::elastic_return();
        assert!(e.apply(1e-4).abs() < 0.01);
    }

    #[test]
    fn test_elastic_overshoots() {
        let e = Ease::elastic_return();
        let peak = (1..100)
            .map(|i| e.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_power2_out_is_front_loaded() {
        let e = Ease::Power2Out;
        assert!((e.apply(0.5) - 0.75).abs() < 1e-6);
        assert!(e.apply(0.25) > 0.25);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(Ease::Power2Out.apply(2.0), 1.0);
        assert_eq!(Ease::Linear.apply(-1.0), 0.0);
    }
}
