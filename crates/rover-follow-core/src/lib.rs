//! Core types and interfaces for the circle-following rover.
//!
//! This crate is intentionally small. It owns the frame-scoped value types
//! (circle candidates, motor commands), the typed configuration with its
//! startup validation, and the traits that fence off the external
//! collaborators (estimators, mask source, motor driver). It does *not*
//! contain any control logic.

mod circle;
mod config;
mod error;
mod io;
mod logger;

pub use circle::{Circle, MotorCommand, SmoothedCircle};
pub use config::{
    FollowParams, FusionParams, SearchDirection, SmoothingLaw, SteeringParams, TrackerParams,
};
pub use error::{ConfigError, DriverError, FollowError};
pub use io::{CircleEstimator, Frame, MaskSource, MotorSink};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
