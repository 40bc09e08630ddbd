use log::debug;
use nalgebra::Point2;

use rover_follow_core::{Circle, SmoothedCircle, SmoothingLaw, TrackerParams};

/// The single target track maintained across frames.
///
/// `sample_count >= 1` whenever the track exists; `miss_count` counts the
/// consecutive frames without an accepted detection since the last one.
#[derive(Clone, Copy, Debug)]
pub struct Track {
    pub center: Point2<f32>,
    pub radius: f32,
    pub sample_count: u32,
    pub miss_count: u32,
    // Accumulated raw samples, used by the running-sum law only.
    sums: [f32; 3],
}

impl Track {
    fn start(det: Circle) -> Self {
        Self {
            center: Point2::new(det.x as f32, det.y as f32),
            radius: det.r as f32,
            sample_count: 1,
            miss_count: 0,
            sums: [det.x as f32, det.y as f32, det.r as f32],
        }
    }

    fn estimate(&self) -> SmoothedCircle {
        SmoothedCircle {
            center: self.center,
            radius: self.radius,
        }
    }

    /// True if the detection stays within the identity-continuity window
    /// of the current smoothed estimate in all of x, y and r.
    fn is_same_target(&self, det: Circle, tolerance: f32) -> bool {
        (det.x as f32 - self.center.x).abs() <= tolerance
            && (det.y as f32 - self.center.y).abs() <= tolerance
            && (det.r as f32 - self.radius).abs() <= tolerance
    }

    fn accumulate(&mut self, det: Circle, law: SmoothingLaw) {
        self.sample_count += 1;
        match law {
            SmoothingLaw::Exponential { alpha } => {
                self.center.x = alpha * det.x as f32 + (1.0 - alpha) * self.center.x;
                self.center.y = alpha * det.y as f32 + (1.0 - alpha) * self.center.y;
                self.radius = alpha * det.r as f32 + (1.0 - alpha) * self.radius;
            }
            SmoothingLaw::RunningSum => {
                self.sums[0] += det.x as f32;
                self.sums[1] += det.y as f32;
                self.sums[2] += det.r as f32;
                let n = self.sample_count as f32;
                self.center.x = self.sums[0] / n;
                self.center.y = self.sums[1] / n;
                self.radius = self.sums[2] / n;
            }
        }
    }
}

/// Temporal smoothing of fused detections.
///
/// Absorbs per-frame detection noise and coasts through brief dropouts:
/// the last smoothed estimate is held for up to `max_misses - 1`
/// consecutive empty frames before the track is discarded.
#[derive(Debug)]
pub struct TemporalTracker {
    params: TrackerParams,
    track: Option<Track>,
}

impl TemporalTracker {
    pub fn new(params: TrackerParams) -> Self {
        Self {
            params,
            track: None,
        }
    }

    /// Current track, if any.
    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    /// Current smoothed estimate, if a track exists.
    pub fn estimate(&self) -> Option<SmoothedCircle> {
        self.track.as_ref().map(Track::estimate)
    }

    /// Consume one frame's fused detection and return the smoothed
    /// estimate. Called exactly once per frame.
    pub fn update(&mut self, fused: Option<Circle>) -> Option<SmoothedCircle> {
        match fused {
            Some(det) => {
                let tolerance = self.params.continuity_tolerance;
                let law = self.params.smoothing;
                let restart = match self.track.as_mut() {
                    Some(track) if track.is_same_target(det, tolerance) => {
                        track.accumulate(det, law);
                        track.miss_count = 0;
                        false
                    }
                    Some(_) => {
                        debug!("detection outside continuity window, restarting track");
                        true
                    }
                    None => {
                        debug!("new track at ({}, {}) r={}", det.x, det.y, det.r);
                        true
                    }
                };
                if restart {
                    self.track = Some(Track::start(det));
                }
            }
            None => {
                if let Some(track) = self.track.as_mut() {
                    track.miss_count += 1;
                    if track.miss_count >= self.params.max_misses {
                        debug!("track dropped after {} misses", track.miss_count);
                        self.track = None;
                    }
                }
            }
        }

        self.estimate()
    }
}
