//! Camera frames.
//!
//! A `Frame` is owned by the pipeline for exactly one analysis pass. Detectors
//! only ever borrow it, so the pixel buffer is released when the pass returns,
//! whichever way it returns.

use image::{DynamicImage, GenericImageView};

use crate::error::FrameError;
use crate::kernel::time::Timestamp;

pub struct Frame {
    image: DynamicImage,
    width: u32,
    height: u32,
    /// Clockwise rotation the detectors should apply, in degrees.
    pub rotation: u16,
    pub captured_at: Timestamp,
    /// Assigned by the frame feed, strictly increasing.
    pub seq: u64,
}

impl Frame {
    pub fn new(image: DynamicImage, rotation: u16, captured_at: Timestamp) -> Result<Self, FrameError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(FrameError::Empty { width, height });
        }
        Ok(Self { image, width, height, rotation, captured_at, seq: 0 })
    }

    /// Blank frame of the given size. Scripted detectors ignore pixels, so this
    /// is what the demo feeds and what tests analyze.
    pub fn blank(width: u32, height: u32, captured_at: Timestamp) -> Result<Self, FrameError> {
        Self::new(DynamicImage::new_rgb8(width, height), 0, captured_at)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels for detector backends.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("seq", &self.seq)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rotation", &self.rotation)
            .field("captured_at", &self.captured_at)
            .finish()
    }
}

/// What a camera hands to the feed: either pixels already decoded or an
/// encoded buffer (JPEG/PNG) that is decoded when the pipeline pulls it.
pub enum Capture {
    Decoded(Frame),
    Encoded { bytes: Vec<u8>, rotation: u16, captured_at: Timestamp },
}

impl Capture {
    pub fn captured_at(&self) -> Timestamp {
        match self {
            Capture::Decoded(frame) => frame.captured_at,
            Capture::Encoded { captured_at, .. } => *captured_at,
        }
    }

    pub fn into_frame(self) -> Result<Frame, FrameError> {
        match self {
            Capture::Decoded(frame) => Ok(frame),
            Capture::Encoded { bytes, rotation, captured_at } => {
                let image = image::load_from_memory(&bytes)?;
                Frame::new(image, rotation, captured_at)
            }
        }
    }
}
