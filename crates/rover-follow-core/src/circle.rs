use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// One circle candidate produced by an estimator for the current frame.
///
/// Pixel coordinates, origin at the top-left of the mask. No identity
/// beyond its values; a fresh one is produced every frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: i32,
    pub y: i32,
    pub r: i32,
}

impl Circle {
    pub fn new(x: i32, y: i32, r: i32) -> Self {
        Self { x, y, r }
    }
}

/// Temporally smoothed circle estimate emitted by the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmoothedCircle {
    pub center: Point2<f32>,
    pub radius: f32,
}

impl SmoothedCircle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Point2::new(x, y),
            radius,
        }
    }

    /// Horizontal offset from the given frame center, positive = right.
    pub fn error_x(&self, frame_width: u32) -> f32 {
        self.center.x - frame_width as f32 / 2.0
    }
}

impl From<Circle> for SmoothedCircle {
    fn from(c: Circle) -> Self {
        Self::new(c.x as f32, c.y as f32, c.r as f32)
    }
}

/// Differential wheel-speed command, one per frame.
///
/// Speeds are in `[-100, 100]`, positive = forward. Created by the
/// steering policy and consumed immediately by the motor sink.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotorCommand {
    pub left: f32,
    pub right: f32,
}

impl MotorCommand {
    pub const STOP: Self = Self {
        left: 0.0,
        right: 0.0,
    };

    /// Build a command with both wheels clamped into `[-100, 100]`.
    pub fn new(left: f32, right: f32) -> Self {
        Self {
            left: left.clamp(-100.0, 100.0),
            right: right.clamp(-100.0, 100.0),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_command_clamps_to_speed_range() {
        let cmd = MotorCommand::new(250.0, -180.0);
        assert_eq!(cmd.left, 100.0);
        assert_eq!(cmd.right, -100.0);
    }

    #[test]
    fn error_x_is_signed_offset_from_center() {
        let est = SmoothedCircle::new(400.0, 100.0, 30.0);
        assert_eq!(est.error_x(640), 80.0);
        let est = SmoothedCircle::new(200.0, 100.0, 30.0);
        assert_eq!(est.error_x(640), -120.0);
    }
}
