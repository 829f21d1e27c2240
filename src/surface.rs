//! Walking-surface queries.
//!
//! The gait logic never talks to a physics engine directly; it asks a
//! [`SurfaceProber`] for the nearest surface under a candidate foot
//! placement and degrades gracefully when nothing is found.

use nalgebra as na;

/// A single ray-surface intersection.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub point: na::Vector3<f64>,
    pub normal: na::Unit<na::Vector3<f64>>,
}

/// Capability interface for the host's collision query service.
///
/// Injected at construction so the controller runs headless against an
/// analytic surface just as well as against a full physics scene.
pub trait SurfaceProber {
    /// Cast a ray and return the nearest hit within `max_distance`, if any.
    fn probe(
        &self,
        origin: na::Vector3<f64>,
        direction: na::Unit<na::Vector3<f64>>,
        max_distance: f64,
    ) -> Option<RayHit>;
}

/// A candidate placement snapped onto the walking surface.
///
/// `normal` is `None` when no surface was found within range; the point then
/// falls back to the queried position and callers skip any normal-based
/// reorientation.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSample {
    pub point: na::Vector3<f64>,
    pub normal: Option<na::Unit<na::Vector3<f64>>>,
}

/// Project `point` onto the nearest surface along the up axis.
///
/// Casts from `point + up * half_range` down along `-up` for a total length
/// of `2 * half_range`, covering surfaces both above and below the point.
pub fn probe_surface<P: SurfaceProber>(
    prober: &P,
    point: na::Vector3<f64>,
    half_range: f64,
    up: &na::Unit<na::Vector3<f64>>,
) -> SurfaceSample {
    let origin = point + up.into_inner() * half_range;
    let down = na::Unit::new_unchecked(-up.into_inner());
    match prober.probe(origin, down, 2.0 * half_range) {
        Some(hit) => SurfaceSample {
            point: hit.point,
            normal: Some(hit.normal),
        },
        None => SurfaceSample { point, normal: None },
    }
}

/// Infinite horizontal plane at a fixed height with a straight-up normal.
///
/// Doubles as the demo walking surface and as a headless stand-in for a
/// physics scene in tests.
#[derive(Debug, Clone, Copy)]
pub struct FlatGround {
    pub height: f64,
}

impl SurfaceProber for FlatGround {
    fn probe(
        &self,
        origin: na::Vector3<f64>,
        direction: na::Unit<na::Vector3<f64>>,
        max_distance: f64,
    ) -> Option<RayHit> {
        if direction.y.abs() < 1e-12 {
            return None;
        }
        let t = (self.height - origin.y) / direction.y;
        if t < 0.0 || t > max_distance {
            return None;
        }
        Some(RayHit {
            point: origin + direction.into_inner() * t,
            normal: na::Vector3::y_axis(),
        })
    }
}

/// A prober that never finds a surface. Exercises the degraded probe path.
#[derive(Debug, Clone, Copy)]
pub struct VoidGround;

impl SurfaceProber for VoidGround {
    fn probe(
        &self,
        _origin: na::Vector3<f64>,
        _direction: na::Unit<na::Vector3<f64>>,
        _max_distance: f64,
    ) -> Option<RayHit> {
        None
    }
}
