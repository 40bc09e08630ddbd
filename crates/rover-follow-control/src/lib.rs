//! Control pipeline for the circle-following rover.
//!
//! Per frame the pipeline runs three stages in sequence:
//! fusion voter → temporal tracker → steering policy, and emits exactly
//! one [`MotorCommand`](rover_follow_core::MotorCommand). The fusion
//! stage is pure; tracker and steering own the only mutable state in the
//! system and are never shared across threads.

mod fusion;
mod pipeline;
mod steering;
mod tracker;

pub use fusion::fuse;
pub use pipeline::FollowPipeline;
pub use steering::{SteeringPolicy, SteeringState};
pub use tracker::{TemporalTracker, Track};
