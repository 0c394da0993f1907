//! Scripted detectors and a synthetic camera.
//!
//! Stand-ins for real model backends: each detector replays a fixed script of
//! results, one step per call, wrapping around at the end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::detector::{DetectorKind, ObjectDetector, RawDetection, SceneLabeler, SceneTag, TextReader};
use super::frame::{Capture, Frame};
use super::source::FrameFeed;
use crate::error::DetectorFailure;
use crate::kernel::time::Clock;

pub struct Scripted<T> {
    steps: Vec<Result<T, DetectorFailure>>,
    cursor: AtomicUsize,
    latency: Duration,
}

impl<T: Clone> Scripted<T> {
    pub fn new(steps: Vec<Result<T, DetectorFailure>>) -> Self {
        Self { steps, cursor: AtomicUsize::new(0), latency: Duration::ZERO }
    }

    /// Always returns the same result.
    pub fn constant(value: T) -> Self {
        Self::new(vec![Ok(value)])
    }

    /// Simulated inference time per call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    async fn step(&self, detector: DetectorKind) -> Result<T, DetectorFailure> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.steps.is_empty() {
            return Err(DetectorFailure::failed(detector, "empty script"));
        }
        self.steps[index % self.steps.len()].clone()
    }
}

#[async_trait]
impl ObjectDetector for Scripted<Vec<RawDetection>> {
    async fn detect_objects(&self, _frame: &Frame) -> Result<Vec<RawDetection>, DetectorFailure> {
        self.step(DetectorKind::Object).await
    }
}

#[async_trait]
impl SceneLabeler for Scripted<Vec<SceneTag>> {
    async fn label_scene(&self, _frame: &Frame) -> Result<Vec<SceneTag>, DetectorFailure> {
        self.step(DetectorKind::Scene).await
    }
}

#[async_trait]
impl TextReader for Scripted<String> {
    async fn read_text(&self, _frame: &Frame) -> Result<String, DetectorFailure> {
        self.step(DetectorKind::Text).await
    }
}

/// Offers a blank frame every `interval` until cancelled.
pub struct SyntheticCamera {
    pub width: u32,
    pub height: u32,
    pub interval: Duration,
}

impl SyntheticCamera {
    pub async fn run(self, feed: FrameFeed, clock: Clock, cancel: CancellationToken) {
        info!("Synthetic camera {}x{} every {:?}", self.width, self.height, self.interval);
        let mut cadence = tokio::time::interval(self.interval);
        cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = cadence.tick() => {}
            }
            match Frame::blank(self.width, self.height, clock.now()) {
                Ok(frame) => {
                    feed.offer(Capture::Decoded(frame));
                }
                Err(e) => {
                    tracing::warn!("Synthetic camera cannot build frames: {}", e);
                    break;
                }
            }
        }
        feed.close();
    }
}
