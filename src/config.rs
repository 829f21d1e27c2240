use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// Tuning parameters for the balance test and the stepping motion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaitConfig {
    /// Minor radius of the support ellipse at full scale (m). Scaled down
    /// to half this value when the body is near stationary.
    pub balancing_minor_radius: f64,

    /// Margin added to half the feet distance to form the major radius (m).
    pub balancing_major_radius: f64,

    /// Step progress gained per second; a step lasts `1 / moving_step`
    /// seconds of simulated time.
    pub moving_step: f64,

    /// Weight of the body position history in the velocity filter.
    /// Zero disables smoothing entirely.
    pub smoothness: f64,

    /// Peak height of the vertical stepping arc (m).
    pub step_height: f64,

    /// Feet further apart than this with no momentum force a corrective
    /// step even if the body projection still falls inside the ellipse (m).
    pub max_stance_width: f64,

    /// Half-length of the vertical ray used to snap step targets onto the
    /// walking surface (m). Sized generously to cover terrain relief.
    pub cast_half_range: f64,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            balancing_minor_radius: 0.25,
            balancing_major_radius: 0.75,
            moving_step: 0.05,
            smoothness: 5.0,
            step_height: 0.1,
            max_stance_width: 0.5,
            cast_half_range: 2.0,
        }
    }
}

impl GaitConfig {
    /// Check every parameter, returning the first violation.
    ///
    /// A non-positive `moving_step` would stall a step forever, and
    /// non-positive radii leave the ellipse test undefined, so both are
    /// refused up front rather than surfacing as NaN mid-simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("balancing_minor_radius", self.balancing_minor_radius),
            ("balancing_major_radius", self.balancing_major_radius),
            ("moving_step", self.moving_step),
            ("max_stance_width", self.max_stance_width),
            ("cast_half_range", self.cast_half_range),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        let non_negative = [
            ("smoothness", self.smoothness),
            ("step_height", self.step_height),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(())
    }
}
