#![allow(dead_code)]

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use opencv::core::Mat;

/// Light skin tone; hue ~11 and value 230 on OpenCV's HSV scale
pub const SKIN: Rgb<u8> = Rgb([230, 180, 150]);

pub const WIDTH: u32 = 400;
pub const HEIGHT: u32 = 480;

/// Black frame with nothing in it
pub fn blank_frame() -> RgbImage {
    RgbImage::new(WIDTH, HEIGHT)
}

/// A skin-coloured rectangle: a hand with no gaps between fingers
pub fn fist_frame() -> RgbImage {
    silhouette(&[(100, 100), (300, 100), (300, 440), (100, 440)])
}

/// Two raised fingers forming a narrow "V"
pub fn two_finger_frame() -> RgbImage {
    silhouette(&[
        (100, 440),
        (100, 150),
        (140, 60),
        (200, 300),
        (260, 60),
        (300, 150),
        (300, 440),
    ])
}

/// Three raised fingers with two narrow gaps; the middle one is longest
pub fn three_finger_frame() -> RgbImage {
    silhouette(&[
        (60, 440),
        (60, 150),
        (95, 60),
        (145, 300),
        (200, 40),
        (255, 300),
        (305, 60),
        (340, 150),
        (340, 440),
    ])
}

/// Two skin regions of different size
pub fn two_blob_frame() -> RgbImage {
    let mut img = blank_frame();
    fill(&mut img, &[(20, 20), (80, 20), (80, 80), (20, 80)]);
    fill(&mut img, &[(150, 150), (350, 150), (350, 400), (150, 400)]);
    img
}

pub fn silhouette(points: &[(i32, i32)]) -> RgbImage {
    let mut img = blank_frame();
    fill(&mut img, points);
    img
}

fn fill(img: &mut RgbImage, points: &[(i32, i32)]) {
    let poly: Vec<Point<i32>> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    draw_polygon_mut(img, &poly, SKIN);
}

/// Convert to the BGR Mat a camera would produce
pub fn to_mat(img: &RgbImage) -> Mat {
    fingercount::frame::image_to_mat(img).expect("Failed to convert test image")
}
