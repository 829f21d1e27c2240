use nalgebra as na;
use serde::{Deserialize, Serialize};

/// World-space position and orientation of one rig transform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pose {
    pub position: na::Vector3<f64>,
    pub orientation: na::UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(position: na::Vector3<f64>, orientation: na::UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` with no rotation.
    pub fn at(position: na::Vector3<f64>) -> Self {
        Self {
            position,
            orientation: na::UnitQuaternion::identity(),
        }
    }

    /// Local up axis (+Y rotated by the orientation).
    pub fn up(&self) -> na::Unit<na::Vector3<f64>> {
        self.orientation * na::Vector3::y_axis()
    }

    /// Local forward axis (+Z rotated by the orientation).
    pub fn forward(&self) -> na::Unit<na::Vector3<f64>> {
        self.orientation * na::Vector3::z_axis()
    }

    /// Local right axis (+X rotated by the orientation).
    pub fn right(&self) -> na::Unit<na::Vector3<f64>> {
        self.orientation * na::Vector3::x_axis()
    }
}

/// Exponential moving average of the body position.
///
/// The filtered history stands in for a velocity source so the controller
/// does not depend on any rigid body; the instantaneous velocity estimate is
/// simply the current position minus the filtered one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyFilter {
    smoothness: f64,
    filtered: na::Vector3<f64>,
}

impl BodyFilter {
    pub fn new(smoothness: f64, initial: na::Vector3<f64>) -> Self {
        Self {
            smoothness,
            filtered: initial,
        }
    }

    /// Velocity estimate for the current body position, in units per tick.
    pub fn velocity(&self, current: &na::Vector3<f64>) -> na::Vector3<f64> {
        current - self.filtered
    }

    /// Fold the current position into the moving average.
    pub fn update(&mut self, current: &na::Vector3<f64>) {
        self.filtered = (current + self.smoothness * self.filtered) / (1.0 + self.smoothness);
    }

    pub fn filtered(&self) -> &na::Vector3<f64> {
        &self.filtered
    }
}

/// Per-foot bookkeeping between steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootState {
    /// Last ground-confirmed placement; the foot is held here while planted.
    pub last_resolved: na::Vector3<f64>,

    /// True while this foot's step animation is in flight.
    pub moving: bool,

    /// Foot start position relative to the body start position. Kept for
    /// rig re-basing; the balance and stepping logic never reads it.
    pub initial_offset: na::Vector3<f64>,
}

impl FootState {
    pub fn new(foot_position: na::Vector3<f64>, body_position: na::Vector3<f64>) -> Self {
        Self {
            last_resolved: foot_position,
            moving: false,
            initial_offset: foot_position - body_position,
        }
    }
}
