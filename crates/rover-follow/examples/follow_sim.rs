//! Simulated follow run: scripted detections stand in for the camera and
//! the two circle estimators, a logging sink stands in for the motors.
//!
//! Run with `RUST_LOG=debug cargo run --example follow_sim`.

use std::sync::atomic::AtomicBool;

use rover_follow::{
    run_follow_loop, Circle, DriverError, FollowParams, FollowPipeline, Frame, MaskSource,
    MotorCommand, MotorSink,
};

/// Target drifting in from the right edge, growing, then lost for a while.
struct ScriptedCamera {
    frame: usize,
}

impl MaskSource for ScriptedCamera {
    type Mask = Option<Circle>;

    fn next_frame(&mut self) -> Result<Option<Frame<Option<Circle>>>, DriverError> {
        let n = self.frame;
        self.frame += 1;

        let detection = match n {
            0..=4 => None,
            5..=20 => Some(Circle::new(560 - 16 * n as i32, 240, 22)),
            21..=28 => None,
            29..=60 => Some(Circle::new(320, 240, 20 + (n as i32 - 29))),
            _ => return Ok(None),
        };
        Ok(Some(Frame {
            mask: detection,
            color_area: None,
        }))
    }
}

struct ConsoleMotors;

impl MotorSink for ConsoleMotors {
    fn drive(&mut self, command: MotorCommand) -> Result<(), DriverError> {
        println!("drive left={:6.1} right={:6.1}", command.left, command.right);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        println!("stop");
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut params = FollowParams::default();
    params.steering.desired_radius = 45.0;

    let mut pipeline = FollowPipeline::new(params)?;
    let mut camera = ScriptedCamera { frame: 0 };
    let mut motors = ConsoleMotors;
    let stop = AtomicBool::new(false);

    // The scripted mask already *is* the detection, so the "estimators"
    // just hand it through (Hough) or stay silent (contour).
    let mut hough = |mask: &Option<Circle>| *mask;
    let mut contour = |_mask: &Option<Circle>| -> Option<Circle> { None };

    run_follow_loop(
        &mut camera,
        &mut hough,
        &mut contour,
        &mut pipeline,
        &mut motors,
        &stop,
    )?;

    Ok(())
}
