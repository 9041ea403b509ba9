mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from fingercount for tests
pub use fingercount::{FingerCounter, FrameData, HandReading, StillImage};
