//! Procedural bipedal foot placement.
//!
//! Each simulation tick the controller decides whether the body is balanced
//! over its feet — the body's ground projection must fall inside a rotated
//! support ellipse spanned by the two feet — and if not, lifts the foot
//! farther from the predicted center of mass and animates it along a smooth
//! arc to a new ground-aligned target. An external IK rig consumes the two
//! foot target poses each frame.
//!
//! The crate is engine-agnostic: body and foot poses come in as plain
//! values, and ground queries go through the [`SurfaceProber`] trait, so the
//! controller runs headless against an analytic surface just as well as
//! against a full physics scene.

pub mod balance;
pub mod body;
pub mod config;
pub mod controller;
pub mod gait;
pub mod geometry;
pub mod step;
pub mod surface;

pub use balance::{is_balanced, support_ellipse, SupportEllipse};
pub use body::{BodyFilter, FootState, Pose};
pub use config::{ConfigError, GaitConfig};
pub use controller::FootPlacement;
pub use gait::{Foot, GaitPhase};
pub use geometry::{GeometryError, ReferenceFrame};
pub use step::{StepAdvance, StepMotion};
pub use surface::{FlatGround, RayHit, SurfaceProber, SurfaceSample, VoidGround};
