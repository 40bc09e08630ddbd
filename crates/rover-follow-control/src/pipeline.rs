use rover_follow_core::{Circle, ConfigError, FollowParams, MotorCommand, SmoothedCircle};

use crate::fusion::fuse;
use crate::steering::{SteeringPolicy, SteeringState};
use crate::tracker::{TemporalTracker, Track};

/// The per-frame control pipeline: fusion voter → temporal tracker →
/// steering policy.
///
/// All mutable state of the system lives here, owned by whichever single
/// thread drives the loop. One [`tick`](Self::tick) consumes one frame's
/// estimator candidates and emits exactly one [`MotorCommand`].
#[derive(Debug)]
pub struct FollowPipeline {
    params: FollowParams,
    tracker: TemporalTracker,
    steering: SteeringPolicy,
}

impl FollowPipeline {
    /// Build a pipeline from validated parameters.
    ///
    /// Malformed configuration fails here, before the first frame.
    pub fn new(params: FollowParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            tracker: TemporalTracker::new(params.tracker),
            steering: SteeringPolicy::new(params.steering, params.frame_width),
        })
    }

    pub fn params(&self) -> &FollowParams {
        &self.params
    }

    /// Current steering state, for debug overlays.
    pub fn state(&self) -> SteeringState {
        self.steering.state()
    }

    /// Current smoothed track estimate, for debug overlays.
    pub fn estimate(&self) -> Option<SmoothedCircle> {
        self.tracker.estimate()
    }

    /// Current track, for debug overlays.
    pub fn track(&self) -> Option<&Track> {
        self.tracker.track()
    }

    /// Run one frame through the pipeline.
    ///
    /// `hough` and `contour` are the two independent estimator candidates
    /// for the same mask; `area_hint` is the frame's colored-pixel count
    /// when the mask source provides it.
    pub fn tick(
        &mut self,
        hough: Option<Circle>,
        contour: Option<Circle>,
        area_hint: Option<u32>,
    ) -> MotorCommand {
        let fused = fuse(hough, contour, &self.params.fusion);
        let estimate = self.tracker.update(fused);
        self.steering.step(estimate, area_hint)
    }
}
