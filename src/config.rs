//! Component configuration
//!
//! Every field is optional in JSON; keys match the component props
//! (`dotSize`, `shockRadius`, ...). Numeric values that would break the
//! simulation are replaced by defaults in [`GridConfig::sanitized`].

use serde::{Deserialize, Serialize};

use crate::color::Palette;
use crate::consts;
use crate::error::GridError;

/// How a pushed dot travels to its displaced offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PushMode {
    /// Coasts to the target under constant deceleration (`resistance`)
    #[default]
    Inertial,
    /// Fixed-duration power2-out ease
    Eased,
}

impl PushMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushMode::Inertial => "inertial",
            PushMode::Eased => "eased",
        }
    }
}

/// Which drawing backend the web front end should try first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RendererPreference {
    /// WebGPU if it comes up, Canvas 2D otherwise
    #[default]
    Auto,
    /// WebGPU only; mounting fails without it
    Gpu,
    /// Canvas 2D only
    Canvas,
}

/// Dot grid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Dot diameter (px)
    pub dot_size: f32,
    /// Gap between dot edges (px)
    pub gap: f32,
    /// Resting dot color (`#rrggbb`)
    pub base_color: String,
    /// Dot color under the pointer (`#rrggbb`)
    pub active_color: String,
    /// Highlight and push radius around the pointer (px)
    pub proximity: f32,
    /// Pointer speed that triggers a push (px/s)
    pub speed_trigger: f32,
    /// Click shockwave radius (px)
    pub shock_radius: f32,
    /// Click shockwave strength (unitless)
    pub shock_strength: f32,
    /// Pointer velocity clamp (px/s)
    pub max_speed: f32,
    /// Inertial deceleration (px/s²)
    pub resistance: f32,
    /// Elastic return duration (s)
    pub return_duration: f32,

    // === Supplements ===
    /// Push animation strategy
    pub push_mode: PushMode,
    /// Preferred web drawing backend
    pub renderer: RendererPreference,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            dot_size: consts::DOT_SIZE,
            gap: consts::GAP,
            base_color: consts::BASE_COLOR.to_string(),
            active_color: consts::ACTIVE_COLOR.to_string(),
            proximity: consts::PROXIMITY,
            speed_trigger: consts::SPEED_TRIGGER,
            shock_radius: consts::SHOCK_RADIUS,
            shock_strength: consts::SHOCK_STRENGTH,
            max_speed: consts::MAX_SPEED,
            resistance: consts::RESISTANCE,
            return_duration: consts::RETURN_DURATION,
            push_mode: PushMode::default(),
            renderer: RendererPreference::default(),
        }
    }
}

impl GridConfig {
    /// Parse from JSON (missing keys take defaults), then sanitize
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let config: GridConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Serialize for round-tripping props back to JS
    pub fn to_json(&self) -> Result<String, GridError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, GridError> {
        let json = std::fs::read_to_string(path)?;
        log::info!("Loaded grid config from {}", path.display());
        Self::from_json(&json)
    }

    pub fn with_dot_size(mut self, dot_size: f32) -> Self {
        self.dot_size = dot_size;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_colors(mut self, base: &str, active: &str) -> Self {
        self.base_color = base.to_string();
        self.active_color = active.to_string();
        self
    }

    pub fn with_proximity(mut self, proximity: f32) -> Self {
        self.proximity = proximity;
        self
    }

    pub fn with_speed_trigger(mut self, speed_trigger: f32) -> Self {
        self.speed_trigger = speed_trigger;
        self
    }

    pub fn with_shock(mut self, radius: f32, strength: f32) -> Self {
        self.shock_radius = radius;
        self.shock_strength = strength;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_resistance(mut self, resistance: f32) -> Self {
        self.resistance = resistance;
        self
    }

    pub fn with_return_duration(mut self, seconds: f32) -> Self {
        self.return_duration = seconds;
        self
    }

    pub fn with_push_mode(mut self, mode: PushMode) -> Self {
        self.push_mode = mode;
        self
    }

    /// Replace unusable numbers with defaults.
    ///
    /// Sizes, radii, speeds and durations must be finite and positive; gap,
    /// speed trigger and shock strength may be zero. The gap is widened when
    /// `dotSize + gap` falls under the minimum cell size.
    pub fn sanitized(mut self) -> Self {
        fn positive(value: &mut f32, fallback: f32, name: &str) {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("{name} = {value} is not usable, using {fallback}");
                *value = fallback;
            }
        }
        fn non_negative(value: &mut f32, fallback: f32, name: &str) {
            if !value.is_finite() || *value < 0.0 {
                log::warn!("{name} = {value} is not usable, using {fallback}");
                *value = fallback;
            }
        }

        positive(&mut self.dot_size, consts::DOT_SIZE, "dotSize");
        non_negative(&mut self.gap, consts::GAP, "gap");
        if self.dot_size + self.gap < consts::MIN_CELL_SIZE {
            let gap = consts::MIN_CELL_SIZE - self.dot_size;
            log::warn!(
                "dotSize + gap = {} is below {}, using gap {gap}",
                self.dot_size + self.gap,
                consts::MIN_CELL_SIZE
            );
            self.gap = gap;
        }
        positive(&mut self.proximity, consts::PROXIMITY, "proximity");
        non_negative(&mut self.speed_trigger, consts::SPEED_TRIGGER, "speedTrigger");
        positive(&mut self.shock_radius, consts::SHOCK_RADIUS, "shockRadius");
        non_negative(&mut self.shock_strength, consts::SHOCK_STRENGTH, "shockStrength");
        positive(&mut self.max_speed, consts::MAX_SPEED, "maxSpeed");
        positive(&mut self.resistance, consts::RESISTANCE, "resistance");
        positive(&mut self.return_duration, consts::RETURN_DURATION, "returnDuration");
        self
    }

    /// Resolve the two colors
    pub fn palette(&self) -> Palette {
        Palette::from_hex(&self.base_color, &self.active_color)
    }

    /// True when switching to `other` changes the grid layout
    pub fn needs_rebuild(&self, other: &GridConfig) -> bool {
        self.dot_size != other.dot_size || self.gap != other.gap
    }
}
