pub mod app;
pub mod capture;
pub mod detection;
pub mod display;
pub mod frame;
pub mod models;
pub mod pipeline;

pub use models::{DegreeConversion, Defect, HandReading, Triangle, Valley};
pub use detection::FingerCounter;
pub use capture::{Camera, CaptureError, FrameSource, FrameStatus, StillImage, VideoFile};
pub use pipeline::{FrameData, Pipeline, PipelineStep, DebugConfig};
