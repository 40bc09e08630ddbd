//! High-level facade for the `rover-follow-*` workspace.
//!
//! Re-exports the core types and the control pipeline, and provides the
//! synchronous follow loop that wires mask source, estimators, pipeline
//! and motor sink together.
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use rover_follow::{run_follow_loop, Circle, FollowParams, FollowPipeline};
//! # use rover_follow::{Frame, MaskSource, MotorSink, MotorCommand, DriverError};
//! # struct Camera;
//! # impl MaskSource for Camera {
//! #     type Mask = Vec<u8>;
//! #     fn next_frame(&mut self) -> Result<Option<Frame<Vec<u8>>>, DriverError> { Ok(None) }
//! # }
//! # struct Motors;
//! # impl MotorSink for Motors {
//! #     fn drive(&mut self, _: MotorCommand) -> Result<(), DriverError> { Ok(()) }
//! #     fn stop(&mut self) -> Result<(), DriverError> { Ok(()) }
//! # }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pipeline = FollowPipeline::new(FollowParams::default())?;
//! let stop = AtomicBool::new(false);
//!
//! let mut camera = Camera;
//! let mut motors = Motors;
//! let mut hough = |_mask: &Vec<u8>| -> Option<Circle> { None };
//! let mut contour = |_mask: &Vec<u8>| -> Option<Circle> { None };
//!
//! run_follow_loop(
//!     &mut camera,
//!     &mut hough,
//!     &mut contour,
//!     &mut pipeline,
//!     &mut motors,
//!     &stop,
//! )?;
//! # Ok(())
//! # }
//! ```

mod runner;

pub use rover_follow_control::{FollowPipeline, SteeringPolicy, SteeringState, TemporalTracker};
pub use rover_follow_core::{
    Circle, CircleEstimator, ConfigError, DriverError, FollowError, FollowParams, Frame,
    FusionParams, MaskSource, MotorCommand, MotorSink, SearchDirection, SmoothedCircle,
    SmoothingLaw, SteeringParams, TrackerParams,
};

pub use runner::run_follow_loop;
