use anyhow::{Result, bail};
use image::{DynamicImage, GrayImage, RgbImage};
use opencv::core::{self, Mat, Scalar};
use opencv::prelude::*;

/// Copy an 8-bit, 1- or 3-channel Mat into an `image` buffer
pub fn mat_to_image(mat: &Mat) -> Result<DynamicImage> {
    let width = mat.cols() as u32;
    let height = mat.rows() as u32;

    let owned;
    let mat = if mat.is_continuous() {
        mat
    } else {
        owned = mat.try_clone()?;
        &owned
    };
    let bytes = mat.data_bytes()?;

    match mat.typ() {
        core::CV_8UC1 => {
            let gray = GrayImage::from_raw(width, height, bytes.to_vec())
                .ok_or_else(|| anyhow::anyhow!("Mat buffer too small for {}x{}", width, height))?;
            Ok(DynamicImage::ImageLuma8(gray))
        }
        core::CV_8UC3 => {
            let mut rgb = bytes.to_vec();
            for px in rgb.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            let rgb = RgbImage::from_raw(width, height, rgb)
                .ok_or_else(|| anyhow::anyhow!("Mat buffer too small for {}x{}", width, height))?;
            Ok(DynamicImage::ImageRgb8(rgb))
        }
        other => bail!("Unsupported Mat type {} for image conversion", other),
    }
}

/// Copy an RGB image into a new BGR Mat. A zero-sized image gives an empty Mat.
pub fn image_to_mat(img: &RgbImage) -> opencv::Result<Mat> {
    if img.width() == 0 || img.height() == 0 {
        return Ok(Mat::default());
    }

    let mut mat = Mat::new_rows_cols_with_default(
        img.height() as i32,
        img.width() as i32,
        core::CV_8UC3,
        Scalar::all(0.0),
    )?;

    let dst = mat.data_bytes_mut()?;
    for (out, px) in dst.chunks_exact_mut(3).zip(img.pixels()) {
        out[0] = px[2];
        out[1] = px[1];
        out[2] = px[0];
    }
    Ok(mat)
}
