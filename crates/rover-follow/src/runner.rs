use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};

use rover_follow_control::FollowPipeline;
use rover_follow_core::{CircleEstimator, FollowError, MaskSource, MotorSink};

/// Drive the follow loop until the source runs dry, the stop signal is
/// raised, or a collaborator fails.
///
/// One iteration acquires one mask, runs both estimators, ticks the
/// pipeline and emits exactly one motor command. On every exit path the
/// motors are stopped before control is released; the loop never returns
/// with wheels energized, including when `drive` itself fails.
pub fn run_follow_loop<S, E1, E2, M>(
    source: &mut S,
    hough: &mut E1,
    contour: &mut E2,
    pipeline: &mut FollowPipeline,
    motors: &mut M,
    stop_signal: &AtomicBool,
) -> Result<(), FollowError>
where
    S: MaskSource,
    E1: CircleEstimator<S::Mask>,
    E2: CircleEstimator<S::Mask>,
    M: MotorSink,
{
    let result = drive_frames(source, hough, contour, pipeline, motors, stop_signal);

    // Last-iteration guarantee: de-energize regardless of how we exited.
    if let Err(stop_err) = motors.stop() {
        warn!("motor stop on shutdown failed: {stop_err}");
        return result.and(Err(FollowError::Motor(stop_err)));
    }

    result
}

fn drive_frames<S, E1, E2, M>(
    source: &mut S,
    hough: &mut E1,
    contour: &mut E2,
    pipeline: &mut FollowPipeline,
    motors: &mut M,
    stop_signal: &AtomicBool,
) -> Result<(), FollowError>
where
    S: MaskSource,
    E1: CircleEstimator<S::Mask>,
    E2: CircleEstimator<S::Mask>,
    M: MotorSink,
{
    let mut frames = 0u64;

    loop {
        if stop_signal.load(Ordering::Relaxed) {
            info!("stop signal after {frames} frames");
            return Ok(());
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!("mask source exhausted after {frames} frames");
                return Ok(());
            }
            Err(err) => return Err(FollowError::Camera(err)),
        };

        let hough_candidate = hough.detect(&frame.mask);
        let contour_candidate = contour.detect(&frame.mask);
        let command = pipeline.tick(hough_candidate, contour_candidate, frame.color_area);

        debug!(
            "frame {frames}: state={:?} left={:.1} right={:.1}",
            pipeline.state(),
            command.left,
            command.right
        );

        motors.drive(command).map_err(FollowError::Motor)?;
        frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_follow_core::{Circle, DriverError, FollowParams, Frame, MotorCommand};
    use std::sync::atomic::AtomicBool;

    struct ScriptedSource {
        frames: Vec<Frame<Option<Circle>>>,
        fail_after: Option<usize>,
        served: usize,
    }

    impl ScriptedSource {
        fn new(detections: Vec<Option<Circle>>) -> Self {
            Self {
                frames: detections
                    .into_iter()
                    .map(|mask| Frame {
                        mask,
                        color_area: None,
                    })
                    .collect(),
                fail_after: None,
                served: 0,
            }
        }
    }

    impl MaskSource for ScriptedSource {
        type Mask = Option<Circle>;

        fn next_frame(&mut self) -> Result<Option<Frame<Option<Circle>>>, DriverError> {
            if Some(self.served) == self.fail_after {
                return Err("camera unplugged".into());
            }
            if self.served >= self.frames.len() {
                return Ok(None);
            }
            let frame = self.frames[self.served].clone();
            self.served += 1;
            Ok(Some(frame))
        }
    }

    #[derive(Default)]
    struct RecordingMotors {
        commands: Vec<MotorCommand>,
        stops: usize,
        fail_drive: bool,
    }

    impl MotorSink for RecordingMotors {
        fn drive(&mut self, command: MotorCommand) -> Result<(), DriverError> {
            if self.fail_drive {
                return Err("driver fault".into());
            }
            self.commands.push(command);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), DriverError> {
            self.stops += 1;
            Ok(())
        }
    }

    fn passthrough(mask: &Option<Circle>) -> Option<Circle> {
        *mask
    }

    fn nothing(_mask: &Option<Circle>) -> Option<Circle> {
        None
    }

    #[test]
    fn exhausted_source_ends_loop_and_stops_motors() {
        let mut source = ScriptedSource::new(vec![
            Some(Circle::new(320, 240, 30)),
            Some(Circle::new(322, 240, 30)),
            None,
        ]);
        let mut motors = RecordingMotors::default();
        let mut pipeline = FollowPipeline::new(FollowParams::default()).expect("pipeline");
        let stop = AtomicBool::new(false);

        run_follow_loop(
            &mut source,
            &mut passthrough,
            &mut nothing,
            &mut pipeline,
            &mut motors,
            &stop,
        )
        .expect("clean exit");

        assert_eq!(motors.commands.len(), 3);
        assert_eq!(motors.stops, 1);
    }

    #[test]
    fn raised_stop_signal_exits_before_first_frame() {
        let mut source = ScriptedSource::new(vec![Some(Circle::new(320, 240, 30))]);
        let mut motors = RecordingMotors::default();
        let mut pipeline = FollowPipeline::new(FollowParams::default()).expect("pipeline");
        let stop = AtomicBool::new(true);

        run_follow_loop(
            &mut source,
            &mut passthrough,
            &mut nothing,
            &mut pipeline,
            &mut motors,
            &stop,
        )
        .expect("clean exit");

        assert!(motors.commands.is_empty());
        assert_eq!(motors.stops, 1);
    }

    #[test]
    fn camera_failure_propagates_and_still_stops_motors() {
        let mut source = ScriptedSource::new(vec![Some(Circle::new(320, 240, 30)); 5]);
        source.fail_after = Some(2);
        let mut motors = RecordingMotors::default();
        let mut pipeline = FollowPipeline::new(FollowParams::default()).expect("pipeline");
        let stop = AtomicBool::new(false);

        let err = run_follow_loop(
            &mut source,
            &mut passthrough,
            &mut nothing,
            &mut pipeline,
            &mut motors,
            &stop,
        )
        .expect_err("camera error");

        assert!(matches!(err, FollowError::Camera(_)));
        assert_eq!(motors.stops, 1);
    }

    #[test]
    fn motor_failure_propagates_and_still_stops_motors() {
        let mut source = ScriptedSource::new(vec![Some(Circle::new(320, 240, 30))]);
        let mut motors = RecordingMotors {
            fail_drive: true,
            ..RecordingMotors::default()
        };
        let mut pipeline = FollowPipeline::new(FollowParams::default()).expect("pipeline");
        let stop = AtomicBool::new(false);

        let err = run_follow_loop(
            &mut source,
            &mut passthrough,
            &mut nothing,
            &mut pipeline,
            &mut motors,
            &stop,
        )
        .expect_err("motor error");

        assert!(matches!(err, FollowError::Motor(_)));
        assert_eq!(motors.stops, 1);
    }
}
