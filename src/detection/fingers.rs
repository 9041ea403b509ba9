use opencv::core::Point;

use crate::models::{DegreeConversion, Defect, Valley};

/// Widest far-point angle still counted as the gap between two fingers
pub const MAX_VALLEY_ANGLE: f64 = 90.0;

/// Keep the defects that look like the gap between two raised fingers.
///
/// A defect qualifies when it is deeper than `min_depth` and the angle at its far
/// point is at most [`MAX_VALLEY_ANGLE`]. Degenerate triangles never qualify.
pub fn find_valleys(
    defects: &[Defect],
    contour: &[Point],
    conversion: DegreeConversion,
    min_depth: f32,
) -> Vec<Valley> {
    defects
        .iter()
        .filter(|d| d.depth >= min_depth)
        .filter_map(|d| {
            let triangle = d.triangle(contour)?;
            let angle = triangle.angle_at_far(conversion)?;
            (angle <= MAX_VALLEY_ANGLE).then_some(Valley {
                far: triangle.far,
                angle,
            })
        })
        .collect()
}

/// One more finger than there are valleys between them.
///
/// Can't tell a fist from a single finger, and noisy masks can push it past five.
pub fn finger_count(valleys: usize) -> u32 {
    valleys as u32 + 1
}
