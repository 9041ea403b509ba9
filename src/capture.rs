use std::path::{Path, PathBuf};

use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use thiserror::Error;

use crate::frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("camera {index} could not be opened")]
    DeviceUnavailable { index: i32 },
    #[error("{} could not be opened", path.display())]
    FileUnavailable { path: PathBuf },
    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read frame")]
    Read(#[from] opencv::Error),
}

/// Outcome of a single read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// A frame was written into the buffer
    Frame,
    /// The source produced an empty frame; try again
    Empty,
    /// No more frames will come
    EndOfStream,
}

pub trait FrameSource {
    /// Read the next frame into `frame`, reusing its allocation when possible
    fn read_frame(&mut self, frame: &mut Mat) -> Result<FrameStatus, CaptureError>;

    /// Short description for logs
    fn describe(&self) -> String;

    /// Whether the source yields a single image rather than a stream
    fn is_still(&self) -> bool {
        false
    }
}

fn read_capture(capture: &mut VideoCapture, frame: &mut Mat) -> Result<FrameStatus, CaptureError> {
    if !capture.read(frame)? {
        return Ok(FrameStatus::EndOfStream);
    }
    if frame.empty() {
        return Ok(FrameStatus::Empty);
    }
    Ok(FrameStatus::Frame)
}

/// A camera device. Released on drop.
pub struct Camera {
    index: i32,
    capture: VideoCapture,
}

impl Camera {
    pub fn open(index: i32) -> Result<Self, CaptureError> {
        let unavailable = |e: opencv::Error| {
            log::debug!("camera {}: {}", index, e);
            CaptureError::DeviceUnavailable { index }
        };

        let capture = VideoCapture::new(index, videoio::CAP_ANY).map_err(unavailable)?;
        if !capture.is_opened().map_err(unavailable)? {
            return Err(CaptureError::DeviceUnavailable { index });
        }

        log::info!("opened camera {}", index);
        Ok(Self { index, capture })
    }
}

impl FrameSource for Camera {
    fn read_frame(&mut self, frame: &mut Mat) -> Result<FrameStatus, CaptureError> {
        read_capture(&mut self.capture, frame)
    }

    fn describe(&self) -> String {
        format!("camera {}", self.index)
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            log::warn!("failed to release camera {}: {}", self.index, e);
        }
    }
}

/// Frames decoded from a video file
pub struct VideoFile {
    path: PathBuf,
    capture: VideoCapture,
}

impl VideoFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref().to_path_buf();
        let unavailable = || CaptureError::FileUnavailable { path: path.clone() };

        let name = path.to_str().ok_or_else(unavailable)?;
        let capture = VideoCapture::from_file(name, videoio::CAP_ANY).map_err(|_| unavailable())?;
        if !capture.is_opened().map_err(|_| unavailable())? {
            return Err(unavailable());
        }

        log::info!("opened video {}", path.display());
        Ok(Self { path, capture })
    }
}

impl FrameSource for VideoFile {
    fn read_frame(&mut self, frame: &mut Mat) -> Result<FrameStatus, CaptureError> {
        read_capture(&mut self.capture, frame)
    }

    fn describe(&self) -> String {
        format!("video {}", self.path.display())
    }
}

impl Drop for VideoFile {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            log::warn!("failed to release {}: {}", self.path.display(), e);
        }
    }
}

/// A single image, yielded once
pub struct StillImage {
    path: PathBuf,
    image: Option<Mat>,
}

impl StillImage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref().to_path_buf();
        let decoded = image::ImageReader::open(&path)
            .map_err(|e| {
                log::debug!("{}: {}", path.display(), e);
                CaptureError::FileUnavailable { path: path.clone() }
            })?
            .decode()
            .map_err(|e| CaptureError::Decode { path: path.clone(), source: e })?;

        log::info!("loaded {} ({}x{})", path.display(), decoded.width(), decoded.height());
        Self::from_image(path, &decoded.to_rgb8())
    }

    /// Wrap an image that is already in memory
    pub fn from_image(path: impl Into<PathBuf>, image: &image::RgbImage) -> Result<Self, CaptureError> {
        let mat = frame::image_to_mat(image)?;
        Ok(Self { path: path.into(), image: Some(mat) })
    }
}

impl FrameSource for StillImage {
    fn read_frame(&mut self, frame: &mut Mat) -> Result<FrameStatus, CaptureError> {
        match self.image.take() {
            Some(mat) if mat.empty() => Ok(FrameStatus::Empty),
            Some(mat) => {
                *frame = mat;
                Ok(FrameStatus::Frame)
            }
            None => Ok(FrameStatus::EndOfStream),
        }
    }

    fn describe(&self) -> String {
        format!("image {}", self.path.display())
    }

    fn is_still(&self) -> bool {
        true
    }
}
