use nalgebra as na;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("ellipse radii must be positive: minor={minor}, major={major}")]
    InvalidEllipseRadius { minor: f64, major: f64 },
}

/// World-fixed reference axes used to express ground-plane coordinates.
///
/// Plane coordinates use `right` as the x axis and `forward` as the y axis,
/// so with the default Y-up frame they reduce to the world (x, z) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceFrame {
    pub up: na::Unit<na::Vector3<f64>>,
    pub forward: na::Unit<na::Vector3<f64>>,
    pub right: na::Unit<na::Vector3<f64>>,
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self {
            up: na::Vector3::y_axis(),
            forward: na::Vector3::z_axis(),
            right: na::Vector3::x_axis(),
        }
    }
}

impl ReferenceFrame {
    /// 2D coordinates of a vector in the ground plane spanned by the
    /// reference right and forward axes.
    pub fn plane_coords(&self, v: &na::Vector3<f64>) -> na::Vector2<f64> {
        na::Vector2::new(v.dot(&self.right), v.dot(&self.forward))
    }
}

/// Rotate a 2D vector counter-clockwise by `angle` radians.
pub fn rotate_2d(v: na::Vector2<f64>, angle: f64) -> na::Vector2<f64> {
    let (sin, cos) = angle.sin_cos();
    na::Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Unsigned angle between two unit 2D vectors, in radians.
///
/// The dot product is clamped to [-1, 1] so that floating round-off on
/// parallel or anti-parallel inputs cannot push `acos` out of its domain.
pub fn angle_between_2d(a: &na::Unit<na::Vector2<f64>>, b: &na::Unit<na::Vector2<f64>>) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Test whether `point` lies inside the axis-aligned ellipse at `center`,
/// major radius along x and minor radius along y.
///
/// A zero or negative radius leaves the test undefined and is rejected.
pub fn ellipse_contains(
    point: na::Vector2<f64>,
    center: na::Vector2<f64>,
    minor_radius: f64,
    major_radius: f64,
) -> Result<bool, GeometryError> {
    if !(minor_radius > 0.0) || !(major_radius > 0.0) {
        return Err(GeometryError::InvalidEllipseRadius {
            minor: minor_radius,
            major: major_radius,
        });
    }
    Ok(ellipse_contains_unchecked(
        point,
        center,
        minor_radius,
        major_radius,
    ))
}

pub(crate) fn ellipse_contains_unchecked(
    point: na::Vector2<f64>,
    center: na::Vector2<f64>,
    minor_radius: f64,
    major_radius: f64,
) -> bool {
    let dx = (point.x - center.x) / major_radius;
    let dy = (point.y - center.y) / minor_radius;
    dx * dx + dy * dy <= 1.0
}

/// Remove the component of `v` along `up`, projecting it onto the ground
/// plane through the origin.
pub fn project_on_plane(
    v: &na::Vector3<f64>,
    up: &na::Unit<na::Vector3<f64>>,
) -> na::Vector3<f64> {
    v - up.into_inner() * v.dot(up)
}
