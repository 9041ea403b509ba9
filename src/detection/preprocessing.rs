use anyhow::Result;
use opencv::core::{self, Mat, Scalar, Size, BORDER_DEFAULT};
use opencv::imgproc;

/// Inclusive HSV bounds (OpenCV scale: hue 0-180, saturation and value 0-255)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinRange {
    pub lower: [f64; 3],
    pub upper: [f64; 3],
}

impl SkinRange {
    pub fn lower_scalar(&self) -> Scalar {
        Scalar::new(self.lower[0], self.lower[1], self.lower[2], 0.0)
    }

    pub fn upper_scalar(&self) -> Scalar {
        Scalar::new(self.upper[0], self.upper[1], self.upper[2], 0.0)
    }
}

impl Default for SkinRange {
    /// Bare skin under ordinary indoor lighting. Not adaptive.
    fn default() -> Self {
        Self {
            lower: [0.0, 0.0, 100.0],
            upper: [30.0, 255.0, 255.0],
        }
    }
}

/// Apply Gaussian blur to reduce noise. Sigma is derived from the kernel size.
pub fn apply_blur(src: &Mat, dst: &mut Mat, kernel: i32) -> Result<()> {
    imgproc::gaussian_blur(src, dst, Size::new(kernel, kernel), 0.0, 0.0, BORDER_DEFAULT)?;
    Ok(())
}

/// Convert a BGR frame to HSV
pub fn to_hsv(src: &Mat, dst: &mut Mat) -> Result<()> {
    imgproc::cvt_color(src, dst, imgproc::COLOR_BGR2HSV, 0)?;
    Ok(())
}

/// Threshold an HSV image into a binary skin mask
pub fn skin_mask(hsv: &Mat, mask: &mut Mat, range: &SkinRange) -> Result<()> {
    core::in_range(hsv, &range.lower_scalar(), &range.upper_scalar(), mask)?;
    Ok(())
}
