use crate::detection::{contours, fingers, hull, overlay, preprocessing};
use crate::detection::preprocessing::SkinRange;
use crate::models::DegreeConversion;
use crate::pipeline::{FrameData, PipelineStep};
use anyhow::Result;
use opencv::core::Mat;
use opencv::prelude::*;

/// Apply Gaussian blur
pub struct BlurStep {
    pub kernel: i32,
}

impl PipelineStep for BlurStep {
    fn process(&self, data: &mut FrameData) -> Result<()> {
        preprocessing::apply_blur(&data.frame, &mut data.blurred, self.kernel)
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }

    fn debug_image<'a>(&self, data: &'a FrameData) -> &'a Mat {
        &data.blurred
    }
}

/// Convert the blurred frame to HSV
pub struct HsvStep;

impl PipelineStep for HsvStep {
    fn process(&self, data: &mut FrameData) -> Result<()> {
        preprocessing::to_hsv(&data.blurred, &mut data.hsv)
    }

    fn name(&self) -> &str {
        "HSV Conversion"
    }

    fn debug_image<'a>(&self, data: &'a FrameData) -> &'a Mat {
        &data.hsv
    }
}

/// Threshold the HSV frame into a skin mask
pub struct SkinMaskStep {
    pub range: SkinRange,
}

impl PipelineStep for SkinMaskStep {
    fn process(&self, data: &mut FrameData) -> Result<()> {
        preprocessing::skin_mask(&data.hsv, &mut data.mask, &self.range)
    }

    fn name(&self) -> &str {
        "Skin Mask"
    }

    fn debug_image<'a>(&self, data: &'a FrameData) -> &'a Mat {
        &data.mask
    }
}

/// Find external contours and select the largest as the hand
pub struct ContourSelectionStep {
    pub min_area: f64,
}

impl PipelineStep for ContourSelectionStep {
    fn process(&self, data: &mut FrameData) -> Result<()> {
        contours::find_contours(&data.mask, &mut data.contours)?;
        let areas = contours::contour_areas(&data.contours)?;

        data.hand = contours::largest_contour(&areas, self.min_area);
        if let Some(idx) = data.hand {
            data.hand_area = areas[idx];
            log::debug!("frame {}: {} contours, hand is #{} ({:.0} px²)",
                data.index, areas.len(), idx, data.hand_area);
        } else {
            log::debug!("frame {}: {} contours, no hand", data.index, areas.len());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "Contour Selection"
    }

    fn debug_image<'a>(&self, data: &'a FrameData) -> &'a Mat {
        &data.mask
    }
}

/// Convex hull and convexity defects of the selected contour
pub struct HullStep;

impl PipelineStep for HullStep {
    fn process(&self, data: &mut FrameData) -> Result<()> {
        let Some(contour) = data.hand_contour()? else {
            return Ok(());
        };

        hull::convex_hull_indices(&contour, &mut data.hull)?;
        data.hull_points = hull::hull_points(&data.hull.to_vec(), &contour.to_vec());

        // Self-intersecting contours make OpenCV reject the hull; treat that as no defects
        data.defects = match hull::convexity_defects(&contour, &data.hull) {
            Ok(defects) => defects,
            Err(e) => {
                log::warn!("frame {}: convexity defects failed: {}", data.index, e);
                Vec::new()
            }
        };

        log::debug!("frame {}: hull has {} points, {} defects",
            data.index, data.hull_points.len(), data.defects.len());
        Ok(())
    }

    fn name(&self) -> &str {
        "Convex Hull"
    }
}

/// Classify defects by their far-point angle and count fingers
pub struct FingerCountStep {
    pub conversion: DegreeConversion,
    pub min_defect_depth: f32,
}

impl PipelineStep for FingerCountStep {
    fn process(&self, data: &mut FrameData) -> Result<()> {
        let Some(contour) = data.hand_contour()? else {
            return Ok(());
        };

        data.valleys = fingers::find_valleys(
            &data.defects,
            &contour.to_vec(),
            self.conversion,
            self.min_defect_depth,
        );
        let count = fingers::finger_count(data.valleys.len());
        data.finger_count = Some(count);

        log::debug!("frame {}: {} valleys, {} fingers", data.index, data.valleys.len(), count);
        Ok(())
    }

    fn name(&self) -> &str {
        "Finger Count"
    }
}

/// Draw contour, hull, valleys and the finger count onto the frame
pub struct OverlayStep;

impl PipelineStep for OverlayStep {
    fn process(&self, data: &mut FrameData) -> Result<()> {
        if let Some(idx) = data.hand {
            overlay::draw_hand_contour(&mut data.frame, &data.contours, idx)?;
            overlay::draw_hull(&mut data.frame, &data.hull_points)?;
            overlay::draw_valleys(&mut data.frame, &data.valleys)?;
        }
        overlay::draw_label(&mut data.frame, data.finger_count)
    }

    fn name(&self) -> &str {
        "Overlay"
    }
}
