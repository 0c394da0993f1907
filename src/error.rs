//! Error types for the perception pipeline.
//!
//! Every error here is local to one frame or one detection. None of them stop
//! the pipeline.

use thiserror::Error;

use crate::vision::detector::DetectorKind;

/// Raised by the spatial locator. The offending detection is dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocatorError {
    #[error("degenerate frame dimensions {width}x{height}")]
    DegenerateFrame { width: u32, height: u32 },

    #[error("non-finite bounding box")]
    NonFiniteBox,
}

/// A detector failed or did not answer in time. Its contribution is empty.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorFailure {
    #[error("{detector} detector failed: {reason}")]
    Failed { detector: DetectorKind, reason: String },

    #[error("{detector} detector timed out after {waited_ms}ms")]
    TimedOut { detector: DetectorKind, waited_ms: u64 },
}

impl DetectorFailure {
    pub fn failed(detector: DetectorKind, reason: impl Into<String>) -> Self {
        Self::Failed { detector, reason: reason.into() }
    }

    pub fn detector(&self) -> DetectorKind {
        match self {
            Self::Failed { detector, .. } | Self::TimedOut { detector, .. } => *detector,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// The frame could not be read. It is skipped and nothing is published.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("frame decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("empty frame {width}x{height}")]
    Empty { width: u32, height: u32 },

    #[error("frame source closed")]
    Closed,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be within 0.0..=1.0, got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{lower} must not exceed {upper}")]
    Inverted { lower: &'static str, upper: &'static str },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
