use clap::Parser;
use env_logger::Env;
use log::LevelFilter;
use std::path::PathBuf;

use fingercount::app::{self, RunOptions};
use fingercount::display::Display;
use fingercount::{Camera, DegreeConversion, FingerCounter, FrameSource, StillImage, VideoFile};

#[derive(Parser)]
#[command(name = "fingercount")]
#[command(about = "Count raised fingers in a live camera feed")]
struct Cli {
    /// Camera device index
    #[arg(long, value_name = "N", default_value_t = 0, conflicts_with_all = ["video", "image"])]
    camera: i32,

    /// Read frames from a video file instead of a camera
    #[arg(long, value_name = "PATH", conflicts_with = "image")]
    video: Option<PathBuf>,

    /// Process a single still image
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Don't open a window; print each frame's reading instead
    #[arg(long)]
    headless: bool,

    /// Stop after this many processed frames
    #[arg(long, value_name = "N")]
    max_frames: Option<u64>,

    /// Convert angles with a multiplier of 57 instead of 180/pi
    #[arg(long)]
    legacy_angles: bool,

    /// Ignore convexity defects shallower than this many pixels
    #[arg(long, value_name = "PX", default_value_t = 0.0)]
    min_defect_depth: f32,

    /// Ignore skin regions whose area is at or below this many square pixels
    #[arg(long, value_name = "PX2", default_value_t = 0.0)]
    min_hand_area: f64,

    /// Save per-step images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// With --debug-out, save every n-th frame
    #[arg(long, value_name = "N", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..))]
    debug_every: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}

fn open_source(args: &Cli) -> anyhow::Result<Box<dyn FrameSource>> {
    let source: Box<dyn FrameSource> = if let Some(path) = &args.image {
        Box::new(StillImage::open(path)?)
    } else if let Some(path) = &args.video {
        Box::new(VideoFile::open(path)?)
    } else {
        Box::new(Camera::open(args.camera)?)
    };
    Ok(source)
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let conversion = if args.legacy_angles {
        DegreeConversion::Approximate
    } else {
        DegreeConversion::Exact
    };
    let counter = FingerCounter::new()
        .with_conversion(conversion)
        .with_min_defect_depth(args.min_defect_depth)
        .with_min_hand_area(args.min_hand_area);

    let mut pipeline = counter.pipeline();
    if let Some(debug_dir) = args.debug_out.clone() {
        pipeline = pipeline.with_debug(debug_dir, args.debug_every)?;
    }

    // Opening the source fails before any window appears
    let mut source = open_source(&args)?;
    let display = if args.headless {
        None
    } else {
        Some(Display::open("Capture Window")?)
    };

    let options = RunOptions {
        max_frames: args.max_frames,
        print_readings: args.headless,
        ..RunOptions::default()
    };
    let summary = app::run(source.as_mut(), &pipeline, display.as_ref(), &options)?;

    log::info!(
        "processed {} frames ({} skipped), hand found in {}",
        summary.frames, summary.skipped, summary.hands
    );
    Ok(())
}
