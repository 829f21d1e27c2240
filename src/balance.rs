//! Support-region balance test.
//!
//! The body is balanced when its ground projection falls inside a rotated
//! ellipse spanned by the two feet: the major axis follows the foot-to-foot
//! line and the minor axis shrinks as the body slows down. Everything here
//! is derived fresh from the current stance each tick; there is no state.

use nalgebra as na;

use crate::body::Pose;
use crate::config::GaitConfig;
use crate::geometry::{self, GeometryError, ReferenceFrame};

/// Speed below which the body counts as stationary for the wide-stance guard.
const STATIONARY_SPEED: f64 = 1e-3;

/// Scale applied to the velocity when sizing the minor radius, and its
/// clamp bounds. The floor keeps the ellipse non-degenerate at rest.
const MINOR_VELOCITY_SCALE: f64 = 2.0;
const MINOR_SCALE_MIN: f64 = 0.5;
const MINOR_SCALE_MAX: f64 = 1.0;

/// Rotated elliptical support region on the ground plane.
#[derive(Debug, Clone, Copy)]
pub struct SupportEllipse {
    /// Ground-plane center: feet midpoint shifted by the velocity.
    pub center: na::Vector2<f64>,
    /// Rotation of the feet axis relative to the reference right axis
    /// (radians), applied to test points about the center.
    pub angle: f64,
    pub minor_radius: f64,
    pub major_radius: f64,
}

impl SupportEllipse {
    /// Validated constructor; radii must be positive.
    pub fn new(
        center: na::Vector2<f64>,
        angle: f64,
        minor_radius: f64,
        major_radius: f64,
    ) -> Result<Self, GeometryError> {
        if !(minor_radius > 0.0) || !(major_radius > 0.0) {
            return Err(GeometryError::InvalidEllipseRadius {
                minor: minor_radius,
                major: major_radius,
            });
        }
        Ok(Self {
            center,
            angle,
            minor_radius,
            major_radius,
        })
    }

    /// Test whether a ground-plane point lies inside the region.
    ///
    /// The point is rotated about the center by the ellipse angle so the
    /// containment test runs in the ellipse's local axes.
    pub fn contains(&self, point: na::Vector2<f64>) -> bool {
        let rotated = geometry::rotate_2d(point - self.center, self.angle) + self.center;
        geometry::ellipse_contains_unchecked(
            rotated,
            self.center,
            self.minor_radius,
            self.major_radius,
        )
    }
}

/// Build the support ellipse for the current stance.
///
/// `up` is the body up axis used for the ground-plane projection; the
/// reference frame supplies the in-plane axes the 2D coordinates and the
/// feet angle are measured against. Radii are positive whenever the config
/// has been validated, so this constructs directly.
pub fn support_ellipse(
    left_foot: &na::Vector3<f64>,
    right_foot: &na::Vector3<f64>,
    velocity: &na::Vector3<f64>,
    up: &na::Unit<na::Vector3<f64>>,
    frame: &ReferenceFrame,
    config: &GaitConfig,
) -> SupportEllipse {
    let feet_distance = (left_foot - right_foot).norm();
    let midpoint = (left_foot + right_foot) / 2.0 + velocity;
    let center = frame.plane_coords(&geometry::project_on_plane(&midpoint, up));

    // Coincident feet leave the stance axis undefined; fall back to an
    // axis-aligned ellipse.
    let feet_axis = frame.plane_coords(&(right_foot - left_foot));
    let angle = match na::Unit::try_new(feet_axis, 1e-12) {
        Some(axis) => {
            let unsigned = geometry::angle_between_2d(&axis, &na::Vector2::x_axis());
            if axis.y > 0.0 {
                -unsigned
            } else {
                unsigned
            }
        }
        None => 0.0,
    };

    let minor_scale = (velocity.norm() * MINOR_VELOCITY_SCALE).clamp(MINOR_SCALE_MIN, MINOR_SCALE_MAX);
    SupportEllipse {
        center,
        angle,
        minor_radius: config.balancing_minor_radius * minor_scale,
        major_radius: feet_distance / 2.0 + config.balancing_major_radius,
    }
}

/// Decide whether the body's ground projection lies inside the support
/// region spanned by the two feet.
///
/// Pure in its inputs: identical poses and velocity always give the same
/// answer.
pub fn is_balanced(
    left_foot: &na::Vector3<f64>,
    right_foot: &na::Vector3<f64>,
    body: &Pose,
    velocity: &na::Vector3<f64>,
    frame: &ReferenceFrame,
    config: &GaitConfig,
) -> bool {
    let feet_distance = (left_foot - right_foot).norm();
    if feet_distance > config.max_stance_width && velocity.norm() < STATIONARY_SPEED {
        // A wide stance with no momentum would never resolve on its own.
        log::trace!(
            "stance width {:.3} exceeds {:.3} with no momentum, forcing a step",
            feet_distance,
            config.max_stance_width
        );
        return false;
    }

    let up = body.up();
    let ellipse = support_ellipse(left_foot, right_foot, velocity, &up, frame, config);
    let point = frame.plane_coords(&geometry::project_on_plane(&body.position, &up));
    ellipse.contains(point)
}
