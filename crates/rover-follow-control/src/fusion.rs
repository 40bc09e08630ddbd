use rover_follow_core::{Circle, FusionParams};

/// Reconcile the two estimator candidates into one fused detection.
///
/// With a single candidate that candidate passes through unchanged. With
/// two, an agreement test compares positions against `pos_tolerance` and
/// radii against `radius_rel_tolerance * r_hough`; agreeing candidates are
/// averaged componentwise (integer truncation, matching the pixel grid).
/// Disagreeing candidates resolve to the contour estimate: the
/// circularity score behind it validates actual outline geometry, while a
/// Hough peak can fire on a partial arc. The asymmetry is deliberate.
pub fn fuse(
    hough: Option<Circle>,
    contour: Option<Circle>,
    params: &FusionParams,
) -> Option<Circle> {
    let (h, c) = match (hough, contour) {
        (None, None) => return None,
        (Some(h), None) => return Some(h),
        (None, Some(c)) => return Some(c),
        (Some(h), Some(c)) => (h, c),
    };

    let agree_pos =
        (h.x - c.x).abs() < params.pos_tolerance && (h.y - c.y).abs() < params.pos_tolerance;
    let agree_radius = ((h.r - c.r).abs() as f32) < params.radius_rel_tolerance * h.r as f32;

    if agree_pos && agree_radius {
        Some(Circle::new(
            (h.x + c.x) / 2,
            (h.y + c.y) / 2,
            (h.r + c.r) / 2,
        ))
    } else {
        Some(c)
    }
}
