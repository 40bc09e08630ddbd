use log::trace;
use serde::Serialize;

use rover_follow_core::{MotorCommand, SearchDirection, SmoothedCircle, SteeringParams};

/// Steering mode for the current frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SteeringState {
    /// No track: rotate in place scanning for the target.
    Search,
    /// Track off-center: rotate toward it.
    Centering,
    /// Track centered: drive forward until the apparent radius says close.
    Approach,
    /// Arrived: wheels at rest.
    Stop,
}

/// Maps the tracker output (or its absence) to a differential wheel-speed
/// command.
///
/// The policy is stateful in three ways: the previous wheel speeds feed
/// the slew-rate limiter, the last seen x-position picks the search
/// rotation direction after a loss, and the current [`SteeringState`] is
/// exposed for debug overlays.
#[derive(Debug)]
pub struct SteeringPolicy {
    params: SteeringParams,
    frame_width: u32,
    state: SteeringState,
    prev_left: f32,
    prev_right: f32,
    last_seen_x: Option<f32>,
}

impl SteeringPolicy {
    pub fn new(params: SteeringParams, frame_width: u32) -> Self {
        Self {
            params,
            frame_width,
            state: SteeringState::Search,
            prev_left: 0.0,
            prev_right: 0.0,
            last_seen_x: None,
        }
    }

    pub fn state(&self) -> SteeringState {
        self.state
    }

    /// Compute the wheel-speed command for one frame.
    ///
    /// The state-specific law runs first; the slew-rate limiter is applied
    /// last, in every state, so wheel speeds never change by more than
    /// `max_slew_delta` per frame.
    pub fn step(
        &mut self,
        estimate: Option<SmoothedCircle>,
        area_hint: Option<u32>,
    ) -> MotorCommand {
        let (state, target) = match estimate {
            Some(est) => {
                self.last_seen_x = Some(est.center.x);
                self.command_for_track(est, area_hint)
            }
            None => self.command_for_lost(area_hint),
        };

        let target = MotorCommand::new(target.left, target.right);
        let command = MotorCommand {
            left: slew(target.left, self.prev_left, self.params.max_slew_delta),
            right: slew(target.right, self.prev_right, self.params.max_slew_delta),
        };

        trace!(
            "steering {:?} -> left={:.1} right={:.1}",
            state,
            command.left,
            command.right
        );

        self.state = state;
        self.prev_left = command.left;
        self.prev_right = command.right;
        command
    }

    fn command_for_track(
        &self,
        est: SmoothedCircle,
        area_hint: Option<u32>,
    ) -> (SteeringState, MotorCommand) {
        let p = &self.params;

        if est.radius >= p.desired_radius || self.area_arrived(area_hint) {
            return (SteeringState::Stop, MotorCommand::STOP);
        }

        let error_x = est.error_x(self.frame_width);
        if error_x.abs() > p.center_dead_zone {
            // Positive error_x = target right of center = spin right
            // (left wheel forward, right wheel back).
            let rotate = (p.kp_rotate * error_x).clamp(-p.max_speed, p.max_speed);
            (SteeringState::Centering, MotorCommand::new(rotate, -rotate))
        } else {
            let error_r = p.desired_radius - est.radius;
            let forward = (p.kp_forward * error_r).clamp(0.0, p.max_forward_speed);
            (SteeringState::Approach, MotorCommand::new(forward, forward))
        }
    }

    fn command_for_lost(&self, area_hint: Option<u32>) -> (SteeringState, MotorCommand) {
        let p = &self.params;

        // The target can fill the view so completely that no circle
        // outline is resolvable; the mask area still says "arrived".
        if self.area_arrived(area_hint) {
            return (SteeringState::Stop, MotorCommand::STOP);
        }

        let turn_right = match self.last_seen_x {
            Some(x) => x > self.frame_width as f32 / 2.0,
            None => p.default_search_direction == SearchDirection::Right,
        };

        let s = p.search_speed;
        let command = if turn_right {
            MotorCommand::new(s, -s)
        } else {
            MotorCommand::new(-s, s)
        };
        (SteeringState::Search, command)
    }

    fn area_arrived(&self, area_hint: Option<u32>) -> bool {
        let (Some(area), Some(low)) = (area_hint, self.params.arrived_area_low) else {
            return false;
        };
        match self.params.arrived_area_high {
            Some(high) => area >= low && area < high,
            None => area >= low,
        }
    }
}

fn slew(target: f32, prev: f32, max_delta: f32) -> f32 {
    target.clamp(prev - max_delta, prev + max_delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> SteeringParams {
        SteeringParams::default()
    }

    fn estimate(x: f32, r: f32) -> Option<SmoothedCircle> {
        Some(SmoothedCircle::new(x, 240.0, r))
    }

    /// Run enough frames for the slew limiter to settle on the target.
    fn settle(policy: &mut SteeringPolicy, est: Option<SmoothedCircle>) -> MotorCommand {
        let mut cmd = MotorCommand::STOP;
        for _ in 0..20 {
            cmd = policy.step(est, None);
        }
        cmd
    }

    #[test]
    fn search_without_history_uses_default_direction() {
        let mut policy = SteeringPolicy::new(params(), 640);
        let cmd = settle(&mut policy, None);
        assert_eq!(policy.state(), SteeringState::Search);
        // Default direction is left: left wheel back, right wheel forward.
        assert_relative_eq!(cmd.left, -60.0);
        assert_relative_eq!(cmd.right, 60.0);
    }

    #[test]
    fn search_resumes_toward_last_seen_side() {
        let mut policy = SteeringPolicy::new(params(), 640);
        // Target seen on the right, then lost.
        settle(&mut policy, estimate(500.0, 30.0));
        let cmd = settle(&mut policy, None);
        assert_eq!(policy.state(), SteeringState::Search);
        assert!(cmd.left > 0.0 && cmd.right < 0.0, "expected right spin");
    }

    #[test]
    fn centering_turns_toward_target_proportionally() {
        let mut policy = SteeringPolicy::new(params(), 640);
        // error_x = 100 > dead zone 50; rotate = 0.5 * 100 = 50.
        let cmd = settle(&mut policy, estimate(420.0, 30.0));
        assert_eq!(policy.state(), SteeringState::Centering);
        assert_relative_eq!(cmd.left, 50.0);
        assert_relative_eq!(cmd.right, -50.0);
    }

    #[test]
    fn centered_target_has_zero_rotation_component() {
        let mut policy = SteeringPolicy::new(params(), 640);
        // x = 320 (center), r = 30 < desired 50: forward = 0.3 * 20 = 6.
        let cmd = settle(&mut policy, estimate(320.0, 30.0));
        assert_eq!(policy.state(), SteeringState::Approach);
        assert_relative_eq!(cmd.left, 6.0);
        assert_relative_eq!(cmd.right, 6.0);
        assert_relative_eq!(cmd.left - cmd.right, 0.0);
    }

    #[test]
    fn forward_speed_is_proportional_to_radius_error() {
        let mut p = params();
        p.desired_radius = 80.0;
        let mut policy = SteeringPolicy::new(p, 640);
        // r = 60, desired 80: both wheels equal at kp_forward * 20.
        let cmd = settle(&mut policy, estimate(320.0, 60.0));
        assert_eq!(policy.state(), SteeringState::Approach);
        assert_relative_eq!(cmd.left, 0.3 * 20.0);
        assert_relative_eq!(cmd.right, cmd.left);
    }

    #[test]
    fn arrived_radius_stops_from_rest() {
        let mut policy = SteeringPolicy::new(params(), 640);
        let cmd = policy.step(estimate(320.0, 55.0), None);
        assert_eq!(policy.state(), SteeringState::Stop);
        assert!(cmd.is_stopped());
    }

    #[test]
    fn stop_ramps_down_through_slew_limiter() {
        let mut policy = SteeringPolicy::new(params(), 640);
        let moving = settle(&mut policy, estimate(420.0, 30.0));
        assert_relative_eq!(moving.left, 50.0);

        let cmd = policy.step(estimate(320.0, 55.0), None);
        assert_eq!(policy.state(), SteeringState::Stop);
        assert_relative_eq!(cmd.left, 30.0);
        assert_relative_eq!(cmd.right, -30.0);

        let cmd = settle(&mut policy, estimate(320.0, 55.0));
        assert!(cmd.is_stopped());
    }

    #[test]
    fn stop_releases_when_target_recedes() {
        let mut policy = SteeringPolicy::new(params(), 640);
        policy.step(estimate(320.0, 55.0), None);
        assert_eq!(policy.state(), SteeringState::Stop);

        policy.step(estimate(320.0, 30.0), None);
        assert_eq!(policy.state(), SteeringState::Approach);
    }

    #[test]
    fn area_window_stops_search() {
        let mut p = params();
        p.arrived_area_low = Some(200_000);
        p.arrived_area_high = Some(400_000);
        let mut policy = SteeringPolicy::new(p, 640);

        let cmd = policy.step(None, Some(250_000));
        assert_eq!(policy.state(), SteeringState::Stop);
        assert!(cmd.is_stopped());

        // Outside the window the scan continues.
        policy.step(None, Some(10_000));
        assert_eq!(policy.state(), SteeringState::Search);
    }

    #[test]
    fn slew_delta_is_never_exceeded() {
        let mut policy = SteeringPolicy::new(params(), 640);
        let frames: [(Option<SmoothedCircle>, Option<u32>); 6] = [
            (estimate(600.0, 20.0), None),
            (estimate(100.0, 20.0), None),
            (None, None),
            (estimate(320.0, 30.0), None),
            (estimate(320.0, 55.0), None),
            (None, None),
        ];

        let (mut prev_left, mut prev_right) = (0.0f32, 0.0f32);
        for (est, area) in frames {
            let cmd = policy.step(est, area);
            assert!((cmd.left - prev_left).abs() <= 20.0 + f32::EPSILON);
            assert!((cmd.right - prev_right).abs() <= 20.0 + f32::EPSILON);
            prev_left = cmd.left;
            prev_right = cmd.right;
        }
    }

    #[test]
    fn state_serializes_lowercase_for_debug_dumps() {
        let states = [
            (SteeringState::Search, "search"),
            (SteeringState::Centering, "centering"),
            (SteeringState::Approach, "approach"),
            (SteeringState::Stop, "stop"),
        ];
        for (state, expected) in states {
            let value = serde_json::to_value(state).expect("serialize");
            assert_eq!(value, serde_json::json!(expected));
        }
    }

    #[test]
    fn rotation_is_clamped_before_slew() {
        let mut p = params();
        p.max_speed = 40.0;
        let mut policy = SteeringPolicy::new(p, 640);
        // error_x = 280, kp * err = 140, clamped to 40.
        let cmd = settle(&mut policy, estimate(600.0, 20.0));
        assert_relative_eq!(cmd.left, 40.0);
        assert_relative_eq!(cmd.right, -40.0);
    }
}
