use anyhow::Result;
use opencv::core::{Mat, Point, Vector};
use opencv::prelude::*;
use std::path::PathBuf;

use crate::detection::contours::Contours;
use crate::frame;
use crate::models::{Defect, HandReading, Valley};

/// Every buffer a frame passes through.
///
/// Allocated once and reused: OpenCV overwrites the Mats in place, and
/// [`FrameData::reset`] drops the previous frame's contours and results.
pub struct FrameData {
    /// Sequence number of the frame currently held
    pub index: u64,

    /// Captured frame; the overlay is drawn onto it
    pub frame: Mat,
    pub blurred: Mat,
    pub hsv: Mat,
    /// Binary skin mask
    pub mask: Mat,

    pub contours: Contours,
    /// Index of the selected contour, None when no region qualified
    pub hand: Option<usize>,
    pub hand_area: f64,
    /// Convex hull of the selected contour, as indices into it
    pub hull: Vector<i32>,
    pub hull_points: Vec<Point>,
    pub defects: Vec<Defect>,
    pub valleys: Vec<Valley>,
    pub finger_count: Option<u32>,
}

impl FrameData {
    pub fn new() -> Self {
        Self {
            index: 0,
            frame: Mat::default(),
            blurred: Mat::default(),
            hsv: Mat::default(),
            mask: Mat::default(),
            contours: Contours::new(),
            hand: None,
            hand_area: 0.0,
            hull: Vector::new(),
            hull_points: Vec::new(),
            defects: Vec::new(),
            valleys: Vec::new(),
            finger_count: None,
        }
    }

    /// Wrap a single frame, mostly useful for one-off analysis
    pub fn from_frame(frame: Mat) -> Self {
        let mut data = Self::new();
        data.frame = frame;
        data
    }

    /// Forget everything derived from the previous frame. Image buffers are kept for reuse.
    pub fn reset(&mut self) {
        self.contours.clear();
        self.hand = None;
        self.hand_area = 0.0;
        self.hull.clear();
        self.hull_points.clear();
        self.defects.clear();
        self.valleys.clear();
        self.finger_count = None;
    }

    /// The selected contour's points
    pub fn hand_contour(&self) -> Result<Option<Vector<Point>>> {
        match self.hand {
            Some(idx) => Ok(Some(self.contours.get(idx)?)),
            None => Ok(None),
        }
    }

    /// Summary of the current frame, if a hand was found and counted
    pub fn reading(&self) -> Option<HandReading> {
        let contour_index = self.hand?;
        let finger_count = self.finger_count?;
        Some(HandReading {
            contour_index,
            contour_area: self.hand_area,
            valley_count: self.valleys.len(),
            finger_count,
        })
    }
}

impl Default for FrameData {
    fn default() -> Self {
        Self::new()
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Save every n-th frame
    pub every: u64,
}

impl DebugConfig {
    fn wants(&self, frame_index: u64) -> bool {
        frame_index % self.every == 0
    }
}

/// A single stage of the per-frame pipeline
pub trait PipelineStep: Send + Sync {
    /// Read the buffers earlier steps produced and fill in this step's own
    fn process(&self, data: &mut FrameData) -> Result<()>;

    /// Human-readable name for this step (used in logs and debug directories)
    fn name(&self) -> &str;

    /// Image written to the debug directory after this step ran
    fn debug_image<'a>(&self, data: &'a FrameData) -> &'a Mat {
        &data.frame
    }
}

/// Composable pipeline builder
pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
    debug: Option<DebugConfig>,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            debug: None,
        }
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf, every: u64) -> Result<Self> {
        if every == 0 {
            anyhow::bail!("Debug interval must be at least 1");
        }
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig { output_dir, every });
        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step on the frame held in `data`
    pub fn run(&self, data: &mut FrameData) -> Result<()> {
        self.run_partial(data, self.steps.len())
    }

    /// Run only the first `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, data: &mut FrameData, num_steps: usize) -> Result<()> {
        data.reset();

        let debug = self.debug.as_ref().filter(|d| d.wants(data.index));
        if let Some(debug) = debug {
            self.save_debug_image(debug, "00_input", data.index, &data.frame)?;
        }

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            log::trace!("frame {}: running step {}", data.index, step.name());
            step.process(data)?;

            if let Some(debug) = debug {
                let step_dir = format!("{:02}_{}", step_idx + 1,
                    step.name().to_lowercase().replace(' ', "_"));
                self.save_debug_image(debug, &step_dir, data.index, step.debug_image(data))?;
            }
        }

        Ok(())
    }

    fn save_debug_image(&self, debug: &DebugConfig, step_dir: &str, frame_index: u64, image: &Mat) -> Result<()> {
        if image.empty() {
            return Ok(());
        }

        let dir = debug.output_dir.join(step_dir);
        std::fs::create_dir_all(&dir)?;
        let filename = format!("{:06}.png", frame_index);
        frame::mat_to_image(image)?
            .save(dir.join(&filename))
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;

        log::debug!("Debug: saved {}/{}", step_dir, filename);
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Count(&'static str);

    impl PipelineStep for Count {
        fn process(&self, data: &mut FrameData) -> Result<()> {
            data.finger_count = Some(data.finger_count.unwrap_or(0) + 1);
            Ok(())
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn runs_steps_in_order_and_partially() {
        let pipeline = Pipeline::new()
            .add_step(Box::new(Count("First")))
            .add_step(Box::new(Count("Second")))
            .add_step(Box::new(Count("Third")));
        assert_eq!(pipeline.step_names(), vec!["First", "Second", "Third"]);

        let mut data = FrameData::new();
        pipeline.run(&mut data).unwrap();
        assert_eq!(data.finger_count, Some(3));

        // each run starts from a clean slate
        pipeline.run_partial(&mut data, 2).unwrap();
        assert_eq!(data.finger_count, Some(2));
    }

    #[test]
    fn reset_drops_derived_state() {
        let mut data = FrameData::new();
        data.contours.push(Vector::from_iter([Point::new(0, 0), Point::new(3, 0), Point::new(0, 3)]));
        data.hand = Some(0);
        data.hull.push(0);
        data.hull_points.push(Point::new(0, 0));
        data.finger_count = Some(1);

        data.reset();
        assert!(data.contours.is_empty());
        assert!(data.hull.is_empty());
        assert!(data.hull_points.is_empty());
        assert_eq!(data.hand, None);
        assert!(data.reading().is_none());
        assert!(data.hand_contour().unwrap().is_none());
    }

    #[test]
    fn reading_needs_hand_and_count() {
        let mut data = FrameData::new();
        data.finger_count = Some(2);
        assert!(data.reading().is_none());

        data.hand = Some(4);
        data.hand_area = 1200.0;
        data.valleys.push(Valley { far: Point::new(1, 1), angle: 30.0 });
        let reading = data.reading().unwrap();
        assert_eq!(reading.contour_index, 4);
        assert_eq!(reading.valley_count, 1);
        assert_eq!(reading.finger_count, 2);
    }

    #[test]
    fn debug_dir_must_be_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("stale.png"), b"x").unwrap();
        assert!(Pipeline::new().with_debug(dir.path().to_path_buf(), 1).is_err());

        let fresh = dir.path().join("fresh");
        assert!(Pipeline::new().with_debug(fresh.clone(), 1).is_ok());
        assert!(fresh.is_dir());
    }

    #[test]
    fn debug_interval_of_zero_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("never");
        assert!(Pipeline::new().with_debug(out.clone(), 0).is_err());
        assert!(!out.exists());
    }
}
