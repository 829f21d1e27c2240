use footfall::{FlatGround, Foot, FootPlacement, GaitConfig, GaitPhase, Pose, ReferenceFrame};
use nalgebra as na;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Procedural Foot Placement Demo");
    println!("==============================\n");

    let config = GaitConfig {
        // Brisk steps so the demo shows several full strides.
        moving_step: 2.0,
        ..GaitConfig::default()
    };
    let ground = FlatGround { height: 0.0 };

    let body = Pose::at(na::Vector3::new(0.0, 1.0, 0.0));
    let left = Pose::at(na::Vector3::new(-0.15, 0.0, 0.0));
    let right = Pose::at(na::Vector3::new(0.15, 0.0, 0.0));

    println!("Configuration:");
    println!("  Minor radius: {:.2} m", config.balancing_minor_radius);
    println!("  Major margin: {:.2} m", config.balancing_major_radius);
    println!("  Step height:  {:.2} m", config.step_height);
    println!("  Step rate:    {:.2} /s", config.moving_step);
    println!();

    let mut placement = FootPlacement::new(
        config,
        ReferenceFrame::default(),
        ground,
        &body,
        left,
        right,
    )?;

    // Glide the body forward with a light lateral sway, the kind of motion a
    // character controller would feed in.
    let dt = 0.02;
    let forward_speed = 0.5;
    let sway = 0.05;
    let duration = 6.0;

    println!(
        "Simulating {:.0} s at {:.0} Hz\n",
        duration,
        1.0 / dt
    );
    println!(
        "{:<6} {:<8} {:<26} {:<26} {:<26}",
        "Time", "Phase", "Body [x, y, z]", "Left foot", "Right foot"
    );
    println!("{}", "-".repeat(94));

    let mut steps_completed = 0;
    let mut previous_phase = GaitPhase::Idle;
    let mut print_interval = 0.0;
    let mut time: f64 = 0.0;

    while time < duration {
        let body = Pose::at(na::Vector3::new(
            (time * 1.5).sin() * sway,
            1.0,
            forward_speed * time,
        ));
        placement.tick(&body, dt);

        if previous_phase != GaitPhase::Idle && placement.phase() == GaitPhase::Idle {
            steps_completed += 1;
        }
        previous_phase = placement.phase();

        if time >= print_interval {
            let phase = match placement.phase() {
                GaitPhase::Idle => "Idle",
                GaitPhase::SteppingLeft => "L-Step",
                GaitPhase::SteppingRight => "R-Step",
            };
            let b = body.position;
            let l = placement.left_target().position;
            let r = placement.right_target().position;
            println!(
                "{:<6.2} {:<8} [{:>6.3}, {:>5.3}, {:>6.3}]   [{:>6.3}, {:>5.3}, {:>6.3}]   [{:>6.3}, {:>5.3}, {:>6.3}]",
                time, phase, b.x, b.y, b.z, l.x, l.y, l.z, r.x, r.y, r.z
            );
            print_interval += 0.2;
        }
        time += dt;
    }

    println!("\n--- Demo complete ---");
    println!("Steps completed: {steps_completed}");
    println!(
        "Final left foot:  [{:.3}, {:.3}, {:.3}]",
        placement.left_target().position.x,
        placement.left_target().position.y,
        placement.left_target().position.z
    );
    println!(
        "Final right foot: [{:.3}, {:.3}, {:.3}]",
        placement.right_target().position.x,
        placement.right_target().position.y,
        placement.right_target().position.z
    );
    println!(
        "Left foot rig offset: [{:.3}, {:.3}, {:.3}]",
        placement.foot_state(Foot::Left).initial_offset.x,
        placement.foot_state(Foot::Left).initial_offset.y,
        placement.foot_state(Foot::Left).initial_offset.z
    );

    Ok(())
}
