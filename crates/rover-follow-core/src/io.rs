//! Collaborator interfaces.
//!
//! Camera, estimators and the motor driver live outside this workspace;
//! the control loop only talks to them through these traits. "No
//! detection" is a normal `None`, never an error.

use crate::circle::{Circle, MotorCommand};
use crate::error::DriverError;

/// A binary color mask plus the colored-pixel count of the frame it came
/// from. The area is a cheap proximity hint used when the target fills the
/// view and no circle outline is resolvable.
#[derive(Clone, Debug)]
pub struct Frame<M> {
    pub mask: M,
    pub color_area: Option<u32>,
}

/// Source of per-frame masks. `Ok(None)` ends the loop cleanly.
pub trait MaskSource {
    type Mask;

    fn next_frame(&mut self) -> Result<Option<Frame<Self::Mask>>, DriverError>;
}

/// One circle estimation strategy over a binary mask.
///
/// Implemented twice by the vision layer: once for the Hough transform and
/// once for contour-circularity scoring. Both are opaque here.
pub trait CircleEstimator<M> {
    fn detect(&mut self, mask: &M) -> Option<Circle>;
}

impl<M, F> CircleEstimator<M> for F
where
    F: FnMut(&M) -> Option<Circle>,
{
    fn detect(&mut self, mask: &M) -> Option<Circle> {
        self(mask)
    }
}

/// Differential-drive motor driver. Speeds in `[-100, 100]`, positive =
/// forward.
pub trait MotorSink {
    fn drive(&mut self, command: MotorCommand) -> Result<(), DriverError>;

    /// De-energize both wheels. Must be safe to call repeatedly.
    fn stop(&mut self) -> Result<(), DriverError>;
}
