use anyhow::Result;

use crate::capture::{FrameSource, FrameStatus};
use crate::detection::overlay;
use crate::display::{Display, KeyAction};
use crate::pipeline::{FrameData, Pipeline};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop after this many processed frames
    pub max_frames: Option<u64>,
    /// Print every frame's reading to stdout
    pub print_readings: bool,
    /// How long the display waits for a key after each frame
    pub frame_delay_ms: i32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_frames: None,
            print_readings: false,
            frame_delay_ms: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames that went through the pipeline
    pub frames: u64,
    /// Empty frames that were skipped
    pub skipped: u64,
    /// Frames in which a hand was found
    pub hands: u64,
}

/// Read, process and show frames until the source ends, Escape is pressed,
/// or `max_frames` is reached.
///
/// Capture errors are returned to the caller; end of stream is a normal exit.
pub fn run(
    source: &mut dyn FrameSource,
    pipeline: &Pipeline,
    display: Option<&Display>,
    options: &RunOptions,
) -> Result<RunSummary> {
    let mut data = FrameData::new();
    let mut summary = RunSummary::default();
    let mut quit = false;

    log::info!("reading from {}", source.describe());

    while options.max_frames.is_none_or(|max| summary.frames < max) {
        match source.read_frame(&mut data.frame)? {
            FrameStatus::Frame => {}
            FrameStatus::Empty => {
                summary.skipped += 1;
                continue;
            }
            FrameStatus::EndOfStream => {
                log::info!("end of stream after {} frames", summary.frames);
                break;
            }
        }

        data.index = summary.frames;
        pipeline.run(&mut data)?;
        summary.frames += 1;

        if data.reading().is_some() {
            summary.hands += 1;
        }
        if options.print_readings {
            println!("frame {}: {}", data.index, overlay::label_text(data.finger_count));
        }

        if let Some(display) = display {
            if display.show(&data.frame, options.frame_delay_ms)? == KeyAction::Quit {
                log::info!("escape pressed, stopping");
                quit = true;
                break;
            }
        }
    }

    if source.is_still() && !quit && summary.frames > 0 {
        if let Some(display) = display {
            display.hold()?;
        }
    }

    Ok(summary)
}
