use anyhow::Result;
use opencv::core::{Point, Vec4i, Vector};
use opencv::imgproc;
use opencv::prelude::*;

use crate::models::Defect;

/// Convex hull of `contour` as indices into it
pub fn convex_hull_indices(contour: &Vector<Point>, hull: &mut Vector<i32>) -> Result<()> {
    hull.clear();
    imgproc::convex_hull(contour, hull, false, false)?;
    Ok(())
}

/// Map hull indices back to contour points. Out-of-range indices are skipped.
pub fn hull_points(hull: &[i32], contour: &[Point]) -> Vec<Point> {
    hull.iter()
        .filter_map(|&idx| usize::try_from(idx).ok())
        .filter_map(|idx| contour.get(idx).copied())
        .collect()
}

/// Convexity defects of `contour` relative to its hull.
///
/// OpenCV needs at least three hull points; smaller hulls have no defects.
pub fn convexity_defects(contour: &Vector<Point>, hull: &Vector<i32>) -> Result<Vec<Defect>> {
    if hull.len() < 3 || contour.len() < 4 {
        return Ok(Vec::new());
    }

    let mut raw = Vector::<Vec4i>::new();
    imgproc::convexity_defects(contour, hull, &mut raw)?;

    let defects = raw.to_vec()
        .into_iter()
        .filter_map(Defect::from_vec4i)
        .collect();
    Ok(defects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_points_are_taken_from_the_contour() {
        let contour = [
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(5, 3),
            Point::new(10, 10),
            Point::new(0, 10),
        ];
        let hull = [4, 3, 1, 0];

        let points = hull_points(&hull, &contour);
        assert_eq!(points.len(), hull.len());
        for p in &points {
            assert!(contour.contains(p));
        }
        assert!(!points.contains(&Point::new(5, 3)));
    }

    #[test]
    fn hull_points_skip_bad_indices() {
        let contour = [Point::new(1, 1), Point::new(2, 2)];
        assert_eq!(hull_points(&[-1, 1, 7], &contour), vec![Point::new(2, 2)]);
    }

    #[test]
    fn tiny_hull_has_no_defects() {
        let contour = Vector::<Point>::from_iter([Point::new(0, 0), Point::new(4, 4)]);
        let hull = Vector::<i32>::from_iter([0, 1]);
        assert!(convexity_defects(&contour, &hull).unwrap().is_empty());
    }
}
