use nalgebra as na;

use crate::balance;
use crate::body::{BodyFilter, FootState, Pose};
use crate::config::{ConfigError, GaitConfig};
use crate::gait::{self, Foot, GaitPhase};
use crate::geometry::ReferenceFrame;
use crate::step::{StepAdvance, StepMotion};
use crate::surface::{self, SurfaceProber};

/// Per-tick foot placement controller.
///
/// Ties the balance test, the stepping state machine and the step driver
/// together: the host calls [`FootPlacement::tick`] once per physics step
/// and reads the two foot target poses back for its IK rig.
///
/// All state advances inside `tick`; in a threaded host, calls must be
/// serialized on one scheduling point per tick.
pub struct FootPlacement<P: SurfaceProber> {
    config: GaitConfig,
    frame: ReferenceFrame,
    prober: P,

    filter: BodyFilter,
    left: FootState,
    right: FootState,
    left_target: Pose,
    right_target: Pose,
    active_step: Option<StepMotion>,
}

impl<P: SurfaceProber> FootPlacement<P> {
    /// Build a controller from tuning parameters, the host's surface prober
    /// and the rig's starting poses.
    ///
    /// The configuration is validated here; an invalid parameter refuses to
    /// construct rather than degrading mid-simulation.
    pub fn new(
        config: GaitConfig,
        frame: ReferenceFrame,
        prober: P,
        body: &Pose,
        left_foot: Pose,
        right_foot: Pose,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            filter: BodyFilter::new(config.smoothness, body.position),
            left: FootState::new(left_foot.position, body.position),
            right: FootState::new(right_foot.position, body.position),
            left_target: left_foot,
            right_target: right_foot,
            active_step: None,
            config,
            frame,
            prober,
        })
    }

    /// Advance the controller by one simulation tick.
    ///
    /// Decides balanced/stepping from the current body pose, advances at
    /// most one in-flight step, and rewrites the foot target poses. A
    /// launched step always completes to its original target; balance being
    /// restored mid-step does not cancel it.
    pub fn tick(&mut self, body: &Pose, dt: f64) {
        if !(dt > 0.0) {
            // A zero or negative tick would stall any step forever.
            log::warn!("ignoring tick with non-positive duration {dt}");
            return;
        }
        let velocity = self.filter.velocity(&body.position);

        // A step launched below must not advance until the next tick, so
        // remember whether one was already in flight.
        let step_in_flight = self.active_step.is_some();

        let balanced = balance::is_balanced(
            &self.left_target.position,
            &self.right_target.position,
            body,
            &velocity,
            &self.frame,
            &self.config,
        );
        if balanced {
            self.hold_feet();
        } else {
            self.make_step(body, &velocity);
        }

        if step_in_flight {
            self.advance_step(dt);
        }

        self.filter.update(&body.position);
    }

    /// Plant both feet at their last resolved placements. The in-flight
    /// foot, if any, is overridden right after by the step driver.
    fn hold_feet(&mut self) {
        self.left_target.position = self.left.last_resolved;
        self.right_target.position = self.right.last_resolved;
    }

    fn make_step(&mut self, body: &Pose, velocity: &na::Vector3<f64>) {
        if self.active_step.is_some() {
            // Committed to the step already in flight.
            self.hold_feet();
            return;
        }

        let velocity = gait::effective_velocity(velocity, &body.forward());
        let com = gait::predicted_center_of_mass(&body.position, &velocity);
        let foot = gait::choose_stepping_foot(
            &self.left_target.position,
            &self.right_target.position,
            &com,
        );
        let stance = self.foot_target(foot.other()).position;
        let candidate = gait::landing_target(&stance, &com);

        let up = body.up();
        let sample =
            surface::probe_surface(&self.prober, candidate, self.config.cast_half_range, &up);
        if sample.normal.is_none() {
            log::warn!(
                "no surface within {:.2} of step target ({:.3}, {:.3}, {:.3}); keeping it unprojected",
                self.config.cast_half_range,
                candidate.x,
                candidate.y,
                candidate.z
            );
        }
        log::debug!(
            "lifting {:?} foot toward ({:.3}, {:.3}, {:.3})",
            foot,
            sample.point.x,
            sample.point.y,
            sample.point.z
        );

        let travel = velocity.normalize();
        let pose = self.foot_target_mut(foot);
        // Align the lifted foot with the travel direction; without a surface
        // normal the previous orientation is kept.
        if let Some(normal) = sample.normal {
            pose.orientation = na::UnitQuaternion::face_towards(&travel, &normal.into_inner());
        }
        let start = pose.position;
        self.foot_state_mut(foot).moving = true;
        self.active_step = Some(StepMotion::new(foot, start, sample.point, up));
    }

    fn advance_step(&mut self, dt: f64) {
        let Some(step) = self.active_step.as_mut() else {
            return;
        };
        let foot = step.foot();
        let advance = step.advance(self.config.moving_step, dt, self.config.step_height);
        match advance {
            StepAdvance::InFlight(position) => {
                self.foot_target_mut(foot).position = position;
            }
            StepAdvance::Done(landed) => {
                self.foot_target_mut(foot).position = landed;
                let state = self.foot_state_mut(foot);
                state.last_resolved = landed;
                state.moving = false;
                self.active_step = None;
                log::debug!(
                    "{:?} foot landed at ({:.3}, {:.3}, {:.3})",
                    foot,
                    landed.x,
                    landed.y,
                    landed.z
                );
            }
        }
    }

    fn foot_target_mut(&mut self, foot: Foot) -> &mut Pose {
        match foot {
            Foot::Left => &mut self.left_target,
            Foot::Right => &mut self.right_target,
        }
    }

    fn foot_state_mut(&mut self, foot: Foot) -> &mut FootState {
        match foot {
            Foot::Left => &mut self.left,
            Foot::Right => &mut self.right,
        }
    }

    /// Current left foot target pose for the IK rig.
    pub fn left_target(&self) -> &Pose {
        &self.left_target
    }

    /// Current right foot target pose for the IK rig.
    pub fn right_target(&self) -> &Pose {
        &self.right_target
    }

    pub fn foot_target(&self, foot: Foot) -> &Pose {
        match foot {
            Foot::Left => &self.left_target,
            Foot::Right => &self.right_target,
        }
    }

    pub fn foot_state(&self, foot: Foot) -> &FootState {
        match foot {
            Foot::Left => &self.left,
            Foot::Right => &self.right,
        }
    }

    /// Current gait phase.
    pub fn phase(&self) -> GaitPhase {
        match &self.active_step {
            None => GaitPhase::Idle,
            Some(step) => GaitPhase::stepping(step.foot()),
        }
    }

    pub fn is_moving(&self, foot: Foot) -> bool {
        self.foot_state(foot).moving
    }

    /// Landing target of the step in flight, if any.
    pub fn active_step_target(&self) -> Option<&na::Vector3<f64>> {
        self.active_step.as_ref().map(|step| step.target())
    }

    /// Velocity estimate the balance test would use for this body position.
    pub fn velocity(&self, body_position: &na::Vector3<f64>) -> na::Vector3<f64> {
        self.filter.velocity(body_position)
    }

    pub fn config(&self) -> &GaitConfig {
        &self.config
    }

    pub fn frame(&self) -> &ReferenceFrame {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{FlatGround, VoidGround};
    use approx::assert_relative_eq;

    const DT: f64 = 0.02;

    fn fast_config() -> GaitConfig {
        // Short steps so tests complete in a handful of ticks.
        GaitConfig {
            moving_step: 5.0,
            ..GaitConfig::default()
        }
    }

    fn stance_feet() -> (Pose, Pose) {
        (
            Pose::at(na::Vector3::new(-0.15, 0.0, 0.0)),
            Pose::at(na::Vector3::new(0.15, 0.0, 0.0)),
        )
    }

    fn controller_at(body: &Pose) -> FootPlacement<FlatGround> {
        let (left, right) = stance_feet();
        FootPlacement::new(
            fast_config(),
            ReferenceFrame::default(),
            FlatGround { height: 0.0 },
            body,
            left,
            right,
        )
        .unwrap()
    }

    #[test]
    fn constructor_rejects_invalid_config() {
        let (left, right) = stance_feet();
        let body = Pose::at(na::Vector3::new(0.0, 1.0, 0.0));
        let result = FootPlacement::new(
            GaitConfig {
                moving_step: 0.0,
                ..GaitConfig::default()
            },
            ReferenceFrame::default(),
            FlatGround { height: 0.0 },
            &body,
            left,
            right,
        );
        assert!(result.is_err());
    }

    #[test]
    fn balanced_body_holds_both_feet() {
        let body = Pose::at(na::Vector3::new(0.0, 1.0, 0.0));
        let mut controller = controller_at(&body);
        for _ in 0..50 {
            controller.tick(&body, DT);
            assert_eq!(controller.phase(), GaitPhase::Idle);
        }
        assert_relative_eq!(
            controller.left_target().position,
            na::Vector3::new(-0.15, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            controller.right_target().position,
            na::Vector3::new(0.15, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn displaced_body_starts_a_step_toward_the_mirrored_com() {
        let body = Pose::at(na::Vector3::new(2.0, 1.0, 0.0));
        let mut controller = controller_at(&body);
        controller.tick(&body, DT);

        // Stationary start, so the velocity nudge (forward / 1000) applies:
        // com = body + nudge * 3, target = com + (com - right foot), then
        // snapped onto the ground plane.
        assert_eq!(controller.phase(), GaitPhase::SteppingLeft);
        assert!(controller.is_moving(Foot::Left));
        assert!(!controller.is_moving(Foot::Right));
        let target = controller.active_step_target().copied().unwrap();
        assert_relative_eq!(target, na::Vector3::new(3.85, 0.0, 0.006), epsilon = 1e-9);
    }

    #[test]
    fn step_completes_exactly_on_target() {
        let body = Pose::at(na::Vector3::new(2.0, 1.0, 0.0));
        let mut controller = controller_at(&body);
        controller.tick(&body, DT);
        let target = controller.active_step_target().copied().unwrap();

        let mut ticks = 0;
        while controller.phase() != GaitPhase::Idle {
            controller.tick(&body, DT);
            ticks += 1;
            assert!(ticks < 1000, "step never completed");
        }
        // moving_step * dt = 0.1 per tick, so completion takes at least
        // ceil(1 / 0.1) = 10 advances.
        assert!(ticks >= 10);

        // Landed exactly, not an interpolated value.
        assert_eq!(controller.left_target().position, target);
        assert_eq!(controller.foot_state(Foot::Left).last_resolved, target);
        assert!(!controller.is_moving(Foot::Left));
    }

    #[test]
    fn feet_never_move_simultaneously() {
        let mut body = Pose::at(na::Vector3::new(0.0, 1.0, 0.0));
        let mut controller = controller_at(&body);
        for tick in 0..2000 {
            // Sway the body around to keep provoking steps.
            let t = tick as f64 * DT;
            body.position = na::Vector3::new((t * 0.8).sin() * 0.6, 1.0, t * 0.4);
            controller.tick(&body, DT);
            assert!(
                !(controller.is_moving(Foot::Left) && controller.is_moving(Foot::Right)),
                "both feet in flight at tick {tick}"
            );
        }
    }

    #[test]
    fn walking_forward_advances_both_feet() {
        let mut controller = controller_at(&Pose::at(na::Vector3::new(0.0, 1.0, 0.0)));
        let mut completed = 0;
        let mut previous_phase = GaitPhase::Idle;
        for tick in 0..300 {
            let t = tick as f64 * DT;
            let body = Pose::at(na::Vector3::new(0.0, 1.0, 0.5 * t));
            controller.tick(&body, DT);
            if previous_phase != GaitPhase::Idle && controller.phase() == GaitPhase::Idle {
                completed += 1;
            }
            previous_phase = controller.phase();
        }
        assert!(completed >= 2, "only {completed} steps completed");
        assert!(controller.left_target().position.z > 0.2);
        assert!(controller.right_target().position.z > 0.2);
    }

    #[test]
    fn a_launched_step_keeps_its_target_when_balance_returns() {
        let displaced = Pose::at(na::Vector3::new(2.0, 1.0, 0.0));
        let mut controller = controller_at(&displaced);
        controller.tick(&displaced, DT);
        let target = controller.active_step_target().copied().unwrap();

        // Teleport the body back over the feet; the step must still run to
        // its original target.
        let centered = Pose::at(na::Vector3::new(0.0, 1.0, 0.0));
        let mut ticks = 0;
        while controller.phase() != GaitPhase::Idle {
            assert_eq!(controller.active_step_target().copied(), Some(target));
            controller.tick(&centered, DT);
            ticks += 1;
            assert!(ticks < 1000, "step never completed");
        }
        assert_eq!(controller.left_target().position, target);
    }

    #[test]
    fn probe_miss_keeps_candidate_point_and_orientation() {
        let body = Pose::at(na::Vector3::new(2.0, 1.0, 0.0));
        let lean = na::UnitQuaternion::from_axis_angle(&na::Vector3::x_axis(), 0.3);
        let left = Pose::new(na::Vector3::new(-0.15, 0.0, 0.0), lean);
        let right = Pose::new(na::Vector3::new(0.15, 0.0, 0.0), lean);
        let mut controller = FootPlacement::new(
            fast_config(),
            ReferenceFrame::default(),
            VoidGround,
            &body,
            left,
            right,
        )
        .unwrap();

        controller.tick(&body, DT);
        assert_eq!(controller.phase(), GaitPhase::SteppingLeft);
        // Unprojected candidate: the mirrored com keeps its height.
        let target = controller.active_step_target().copied().unwrap();
        assert_relative_eq!(target.y, 2.0, epsilon = 1e-9);
        // Degraded probe: no reorientation happened.
        assert_relative_eq!(
            controller
                .left_target()
                .orientation
                .angle_to(&lean),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn step_lands_on_raised_ground() {
        let body = Pose::at(na::Vector3::new(2.0, 1.0, 0.0));
        let (left, right) = stance_feet();
        let mut controller = FootPlacement::new(
            fast_config(),
            ReferenceFrame::default(),
            FlatGround { height: 0.3 },
            &body,
            left,
            right,
        )
        .unwrap();
        controller.tick(&body, DT);
        let target = controller.active_step_target().copied().unwrap();
        assert_relative_eq!(target.y, 0.3, epsilon = 1e-9);
    }

    #[test]
    fn non_positive_tick_duration_is_ignored() {
        let body = Pose::at(na::Vector3::new(2.0, 1.0, 0.0));
        let mut controller = controller_at(&body);
        controller.tick(&body, 0.0);
        controller.tick(&body, -0.5);
        assert_eq!(controller.phase(), GaitPhase::Idle);
        assert_relative_eq!(
            controller.left_target().position,
            na::Vector3::new(-0.15, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn initial_offsets_come_from_the_rig() {
        let body = Pose::at(na::Vector3::new(0.0, 1.0, 0.0));
        let controller = controller_at(&body);
        assert_relative_eq!(
            controller.foot_state(Foot::Left).initial_offset,
            na::Vector3::new(-0.15, -1.0, 0.0),
            epsilon = 1e-12
        );
    }
}
