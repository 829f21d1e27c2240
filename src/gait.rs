use nalgebra as na;
use serde::{Deserialize, Serialize};

/// How far ahead of the body the center of mass is predicted, in velocity
/// multiples.
const COM_LOOKAHEAD: f64 = 3.0;

/// Magnitude divisor for the forward nudge substituted for a zero velocity.
const VELOCITY_NUDGE: f64 = 1000.0;

/// Which foot is which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Foot {
    Left,
    Right,
}

impl Foot {
    pub fn other(self) -> Foot {
        match self {
            Foot::Left => Foot::Right,
            Foot::Right => Foot::Left,
        }
    }
}

/// Gait phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GaitPhase {
    /// Both feet planted, balance holding.
    Idle,
    /// Left foot in flight, right foot supporting.
    SteppingLeft,
    /// Right foot in flight, left foot supporting.
    SteppingRight,
}

impl GaitPhase {
    /// Phase for a step of the given foot.
    pub fn stepping(foot: Foot) -> GaitPhase {
        match foot {
            Foot::Left => GaitPhase::SteppingLeft,
            Foot::Right => GaitPhase::SteppingRight,
        }
    }

    /// The foot in flight during this phase, if any.
    pub fn moving_foot(self) -> Option<Foot> {
        match self {
            GaitPhase::Idle => None,
            GaitPhase::SteppingLeft => Some(Foot::Left),
            GaitPhase::SteppingRight => Some(Foot::Right),
        }
    }
}

/// Substitute a minimal forward nudge for an exactly zero velocity so that
/// direction-dependent math stays well defined.
pub fn effective_velocity(
    velocity: &na::Vector3<f64>,
    forward: &na::Unit<na::Vector3<f64>>,
) -> na::Vector3<f64> {
    if velocity.norm() == 0.0 {
        forward.into_inner() / VELOCITY_NUDGE
    } else {
        *velocity
    }
}

/// Predicted center of mass a few ticks ahead of the body.
pub fn predicted_center_of_mass(
    body_position: &na::Vector3<f64>,
    velocity: &na::Vector3<f64>,
) -> na::Vector3<f64> {
    body_position + velocity * COM_LOOKAHEAD
}

/// Pick the foot to lift: the one farther from the predicted center of
/// mass, so the nearer foot keeps supporting. Ties go to the left foot.
pub fn choose_stepping_foot(
    left_foot: &na::Vector3<f64>,
    right_foot: &na::Vector3<f64>,
    com: &na::Vector3<f64>,
) -> Foot {
    let left_distance = (left_foot - com).norm();
    let right_distance = (right_foot - com).norm();
    if left_distance >= right_distance {
        Foot::Left
    } else {
        Foot::Right
    }
}

/// Landing target for the lifted foot: the stance foot mirrored through the
/// predicted center of mass, giving a stride proportional to momentum.
pub fn landing_target(stance_foot: &na::Vector3<f64>, com: &na::Vector3<f64>) -> na::Vector3<f64> {
    com + (com - stance_foot)
}
