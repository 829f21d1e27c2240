use nalgebra as na;

use crate::gait::Foot;

/// One in-flight step: interpolates a foot from where it lifted off to its
/// landing target, with a triangular vertical arc peaking at the midpoint.
///
/// Advanced once per tick by the controller. Left and right instances exist
/// over time but never concurrently; the controller owns at most one.
#[derive(Debug, Clone)]
pub struct StepMotion {
    foot: Foot,
    start: na::Vector3<f64>,
    target: na::Vector3<f64>,
    up: na::Unit<na::Vector3<f64>>,
    progress: f64,
}

/// Where the foot sits after one tick of stepping.
#[derive(Debug, Clone, Copy)]
pub enum StepAdvance {
    /// Still in flight; the foot follows the arc.
    InFlight(na::Vector3<f64>),
    /// Finished; the foot lands exactly on the target.
    Done(na::Vector3<f64>),
}

impl StepMotion {
    /// Launch a step. The up axis is captured here so the arc stays
    /// consistent even if the body tilts mid-step.
    pub fn new(
        foot: Foot,
        start: na::Vector3<f64>,
        target: na::Vector3<f64>,
        up: na::Unit<na::Vector3<f64>>,
    ) -> Self {
        Self {
            foot,
            start,
            target,
            up,
            progress: 0.0,
        }
    }

    pub fn foot(&self) -> Foot {
        self.foot
    }

    pub fn target(&self) -> &na::Vector3<f64> {
        &self.target
    }

    /// Normalized progress in [0, 1].
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Arc position at a given progress value: linear ground path plus a
    /// symmetric lift that is zero at both ends and `step_height` at 0.5.
    pub fn position_at(&self, progress: f64, step_height: f64) -> na::Vector3<f64> {
        let along = self.start.lerp(&self.target, progress);
        let lift = (0.5 - (progress - 0.5).abs()) * 2.0 * step_height;
        along + self.up.into_inner() * lift
    }

    /// Advance by one tick. `rate` is progress gained per second; once the
    /// accumulated progress reaches 1 the returned position is the target
    /// itself, not an interpolated value.
    pub fn advance(&mut self, rate: f64, dt: f64, step_height: f64) -> StepAdvance {
        self.progress += rate * dt;
        if self.progress < 1.0 {
            StepAdvance::InFlight(self.position_at(self.progress, step_height))
        } else {
            StepAdvance::Done(self.target)
        }
    }
}
