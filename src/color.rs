//! Dot colors
//!
//! Colors come in as `#rrggbb` strings and are blended per channel with
//! integer rounding, so the endpoints of a blend are reproduced exactly.

use std::fmt::Write;

use crate::error::GridError;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional, case insensitive)
    pub fn from_hex(hex: &str) -> Result<Self, GridError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(GridError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| GridError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse, falling back to black on malformed input
    pub fn from_hex_or_black(hex: &str) -> Self {
        match Self::from_hex(hex) {
            Ok(color) => color,
            Err(e) => {
                log::warn!("{e}, using black");
                Self::BLACK
            }
        }
    }

    /// Per-channel `round(self + (other - self) * t)`
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let mix = |a: u8, b: u8| {
            let v = a as f32 + (b as f32 - a as f32) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Write `rgb(r,g,b)` into `buf`, replacing its contents
    pub fn write_css(self, buf: &mut String) {
        buf.clear();
        let _ = write!(buf, "rgb({},{},{})", self.r, self.g, self.b);
    }

    /// Normalized `[r, g, b, a]` for GPU upload
    pub fn to_f32(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

/// Base and active colors resolved from config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub base: Rgb,
    pub active: Rgb,
}

impl Palette {
    pub fn from_hex(base: &str, active: &str) -> Self {
        Self {
            base: Rgb::from_hex_or_black(base),
            active: Rgb::from_hex_or_black(active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::from_hex("#5227FF").unwrap(), Rgb::new(0x52, 0x27, 0xff));
        assert_eq!(Rgb::from_hex("5227ff").unwrap(), Rgb::new(0x52, 0x27, 0xff));
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn test_invalid_hex_falls_back_to_black() {
        assert_eq!(Rgb::from_hex_or_black("not a color"), Rgb::BLACK);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(10, 200, 30);
        let b = Rgb::new(250, 0, 31);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(130, 100, 31));
    }

    #[test]
    fn test_write_css_reuses_buffer() {
        let mut buf = String::with_capacity(32);
        Rgb::new(1, 2, 3).write_css(&mut buf);
        assert_eq!(buf, "rgb(1,2,3)");
        Rgb::new(255, 255, 255).write_css(&mut buf);
        assert_eq!(buf, "rgb(255,255,255)");
    }

    proptest! {
        #[test]
        fn lerp_is_monotonic_per_channel(a in any::<u8>(), b in any::<u8>(), t1 in 0.0f32..=1.0, t2 in 0.0f32..=1.0) {
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            let from = Rgb::new(a, a, a);
            let to = Rgb::new(b, b, b);
            let c_lo = from.lerp(to, lo).r;
            let c_hi = from.lerp(to, hi).r;
            if b >= a {
                prop_assert!(c_lo <= c_hi);
            } else {
                prop_assert!(c_lo >= c_hi);
            }
        }
    }
}
