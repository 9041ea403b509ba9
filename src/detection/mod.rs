pub mod preprocessing;
pub mod contours;
pub mod hull;
pub mod fingers;
pub mod overlay;
pub mod steps;

use anyhow::Result;
use opencv::core::Mat;
use opencv::prelude::*;

use crate::detection::preprocessing::SkinRange;
use crate::models::{DegreeConversion, HandReading};
use crate::pipeline::{FrameData, Pipeline};

/// Gaussian kernel edge length, in pixels
pub const DEFAULT_BLUR_KERNEL: i32 = 25;

/// Finger counting parameters and the pipeline built from them
#[derive(Debug, Clone)]
pub struct FingerCounter {
    pub blur_kernel: i32,
    pub skin_range: SkinRange,
    /// Contours at or below this area are never taken for a hand
    pub min_hand_area: f64,
    /// Defects shallower than this are ignored before the angle test
    pub min_defect_depth: f32,
    pub conversion: DegreeConversion,
}

impl FingerCounter {
    pub fn new() -> Self {
        Self {
            blur_kernel: DEFAULT_BLUR_KERNEL,
            skin_range: SkinRange::default(),
            min_hand_area: 0.0,
            min_defect_depth: 0.0,
            conversion: DegreeConversion::Exact,
        }
    }

    pub fn with_skin_range(mut self, range: SkinRange) -> Self {
        self.skin_range = range;
        self
    }

    pub fn with_min_hand_area(mut self, area: f64) -> Self {
        self.min_hand_area = area;
        self
    }

    pub fn with_min_defect_depth(mut self, depth: f32) -> Self {
        self.min_defect_depth = depth;
        self
    }

    pub fn with_conversion(mut self, conversion: DegreeConversion) -> Self {
        self.conversion = conversion;
        self
    }

    /// The analysis stages, without drawing anything
    pub fn analysis_pipeline(&self) -> Pipeline {
        use crate::detection::steps::*;

        Pipeline::new()
            .add_step(Box::new(BlurStep { kernel: self.blur_kernel }))
            .add_step(Box::new(HsvStep))
            .add_step(Box::new(SkinMaskStep { range: self.skin_range }))
            .add_step(Box::new(ContourSelectionStep { min_area: self.min_hand_area }))
            .add_step(Box::new(HullStep))
            .add_step(Box::new(FingerCountStep {
                conversion: self.conversion,
                min_defect_depth: self.min_defect_depth,
            }))
    }

    /// Analysis followed by the overlay
    pub fn pipeline(&self) -> Pipeline {
        self.analysis_pipeline()
            .add_step(Box::new(steps::OverlayStep))
    }

    /// Count fingers in a single BGR frame. The frame is left untouched.
    pub fn analyze(&self, frame: &Mat) -> Result<Option<HandReading>> {
        let mut data = FrameData::from_frame(frame.try_clone()?);
        self.analysis_pipeline().run(&mut data)?;
        Ok(data.reading())
    }
}

impl Default for FingerCounter {
    fn default() -> Self {
        Self::new()
    }
}
