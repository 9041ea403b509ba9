use anyhow::Result;
use opencv::core::{Mat, Point, Scalar, Vector};
use opencv::imgproc;

use crate::detection::contours::Contours;
use crate::models::Valley;

const OUTLINE_THICKNESS: i32 = 10;

// BGR
fn cyan() -> Scalar {
    Scalar::new(255.0, 255.0, 0.0, 0.0)
}

fn red() -> Scalar {
    Scalar::new(0.0, 0.0, 255.0, 0.0)
}

fn magenta() -> Scalar {
    Scalar::new(255.0, 0.0, 255.0, 0.0)
}

/// Outline the selected contour
pub fn draw_hand_contour(frame: &mut Mat, contours: &Contours, index: usize) -> Result<()> {
    imgproc::draw_contours(
        frame,
        contours,
        index as i32,
        cyan(),
        OUTLINE_THICKNESS,
        imgproc::LINE_8,
        &Mat::default(),
        i32::MAX,
        Point::new(0, 0),
    )?;
    Ok(())
}

/// Draw the hull points as a closed polygon
pub fn draw_hull(frame: &mut Mat, hull_points: &[Point]) -> Result<()> {
    if hull_points.is_empty() {
        return Ok(());
    }

    let mut outline = Contours::new();
    outline.push(Vector::from_iter(hull_points.iter().copied()));
    imgproc::draw_contours(
        frame,
        &outline,
        -1,
        red(),
        OUTLINE_THICKNESS,
        imgproc::LINE_8,
        &Mat::default(),
        i32::MAX,
        Point::new(0, 0),
    )?;
    Ok(())
}

/// Mark the far point of every accepted valley
pub fn draw_valleys(frame: &mut Mat, valleys: &[Valley]) -> Result<()> {
    for valley in valleys {
        imgproc::circle(frame, valley.far, 1, magenta(), 2, imgproc::LINE_8, 0)?;
    }
    Ok(())
}

pub fn label_text(finger_count: Option<u32>) -> String {
    match finger_count {
        Some(n) => format!("Fingers Up: {}", n),
        None => "No hand".to_string(),
    }
}

/// Print the finger count in the top-left corner
pub fn draw_label(frame: &mut Mat, finger_count: Option<u32>) -> Result<()> {
    imgproc::put_text(
        frame,
        &label_text(finger_count),
        Point::new(10, 20),
        imgproc::FONT_HERSHEY_PLAIN,
        1.2,
        red(),
        2,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}
