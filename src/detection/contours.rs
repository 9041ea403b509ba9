use anyhow::Result;
use opencv::core::{Mat, Point, Vector};
use opencv::imgproc;

pub type Contours = Vector<Vector<Point>>;

/// Find the outer contours of every region in a binary mask
pub fn find_contours(mask: &Mat, contours: &mut Contours) -> Result<()> {
    contours.clear();
    imgproc::find_contours(
        mask,
        contours,
        imgproc::RETR_EXTERNAL,
        imgproc::CHAIN_APPROX_SIMPLE,
        Point::new(0, 0),
    )?;
    Ok(())
}

/// Unsigned area of every contour, in order
pub fn contour_areas(contours: &Contours) -> Result<Vec<f64>> {
    let mut areas = Vec::with_capacity(contours.len());
    for contour in contours.iter() {
        areas.push(imgproc::contour_area(&contour, false)?);
    }
    Ok(areas)
}

/// Index of the largest area strictly above `min_area`.
///
/// Ties keep the first index. Returns None when nothing qualifies.
pub fn largest_contour(areas: &[f64], min_area: f64) -> Option<usize> {
    let mut largest = min_area;
    let mut index = None;
    for (i, &area) in areas.iter().enumerate() {
        if area > largest {
            largest = area;
            index = Some(i);
        }
    }
    index
}
