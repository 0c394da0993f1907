use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::aggregator::Aggregator;
use super::detector::{ConfidenceFloor, DetectorKind, Detections, ObjectDetector, RecognizedText, SceneLabeler, TextReader};
use super::frame::Frame;
use super::locator::SpatialLocator;
use super::source::FrameSource;
use crate::config::PipelineConfig;
use crate::error::{DetectorFailure, FrameError};
use crate::kernel::event::{Event, FrameAnalysis, FrameReport};
use crate::kernel::mode::{Mode, ModeSnapshot};
use crate::kernel::telemetry::event::TelemetryEvent;

/// The three detector adapters the pipeline fans out to.
#[derive(Clone)]
pub struct Detectors {
    pub objects: Arc<dyn ObjectDetector>,
    pub scene: Arc<dyn SceneLabeler>,
    pub text: Arc<dyn TextReader>,
}

impl Detectors {
    /// Wraps the labeler in the confidence floor from `config`.
    pub fn new<O, S, T>(objects: O, scene: S, text: T, config: &PipelineConfig) -> Self
    where
        O: ObjectDetector + 'static,
        S: SceneLabeler + 'static,
        T: TextReader + 'static,
    {
        Self {
            objects: Arc::new(objects),
            scene: Arc::new(ConfidenceFloor::new(scene, config.labeler_confidence_floor)),
            text: Arc::new(text),
        }
    }
}

/// Sequential frame executor. Pulls one frame, runs the detector branch for the
/// current mode, publishes one complete report, then pulls the next. Frames
/// that arrive meanwhile overwrite each other in the source and are never queued.
pub struct VisionPipeline<S> {
    source: S,
    detectors: Detectors,
    aggregator: Aggregator,
    mode_rx: watch::Receiver<ModeSnapshot>,
    tx: mpsc::Sender<Event>,
    detector_timeout: Duration,
    frame_wait: Duration,
}

impl<S: FrameSource> VisionPipeline<S> {
    pub fn new(
        source: S,
        detectors: Detectors,
        config: &PipelineConfig,
        mode_rx: watch::Receiver<ModeSnapshot>,
        tx: mpsc::Sender<Event>,
    ) -> Self {
        Self {
            source,
            detectors,
            aggregator: Aggregator::new(SpatialLocator::new(config.locator), config.scene_announce_threshold),
            mode_rx,
            tx,
            detector_timeout: config.detector_timeout(),
            frame_wait: config.frame_wait(),
        }
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        info!("Vision Pipeline Started (detector timeout {:?})", self.detector_timeout);

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => break,
                next = self.source.next_frame(self.frame_wait) => next,
            };

            match next {
                Ok(Some(frame)) => {
                    let report = self.analyze(frame).await;
                    if self.tx.send(Event::Frame(report)).await.is_err() {
                        info!("Kernel channel closed");
                        break;
                    }
                }
                // Nothing within the bounded wait. Previous description stays up.
                Ok(None) => continue,
                Err(FrameError::Closed) => {
                    info!("Frame source closed");
                    break;
                }
                Err(e) => {
                    warn!("Skipping frame: {}", e);
                    self.telemetry(TelemetryEvent::FrameSkipped).await;
                }
            }
        }

        info!("Vision Pipeline Stopped");
    }

    /// One analysis pass. Takes the frame by value: it is released when this
    /// returns, after every detector call for it has completed or failed.
    pub async fn analyze(&self, frame: Frame) -> FrameReport {
        let snapshot = *self.mode_rx.borrow();
        debug!("Analyzing frame {} in {:?}", frame.seq, snapshot.mode);

        let analysis = match snapshot.mode {
            Mode::ObjectDetection => {
                let (objects, scene) = tokio::join!(
                    self.bounded(DetectorKind::Object, self.detectors.objects.detect_objects(&frame)),
                    self.bounded(DetectorKind::Scene, self.detectors.scene.label_scene(&frame)),
                );
                let outputs = [
                    self.settle(objects.map(Detections::Objects)).await,
                    self.settle(scene.map(Detections::Scene)).await,
                ];
                FrameAnalysis::Described(self.aggregator.aggregate(&outputs, frame.width(), frame.height()))
            }
            Mode::TextReading => {
                let text = match self.bounded(DetectorKind::Text, self.detectors.text.read_text(&frame)).await {
                    Ok(text) => RecognizedText(text),
                    Err(failure) => {
                        self.record_failure(&failure).await;
                        RecognizedText::default()
                    }
                };
                FrameAnalysis::Read(text)
            }
        };

        FrameReport { seq: frame.seq, captured_at: frame.captured_at, epoch: snapshot.epoch, analysis }
    }

    async fn bounded<T, F>(&self, detector: DetectorKind, call: F) -> Result<T, DetectorFailure>
    where
        F: Future<Output = Result<T, DetectorFailure>>,
    {
        match tokio::time::timeout(self.detector_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(DetectorFailure::TimedOut {
                detector,
                waited_ms: self.detector_timeout.as_millis() as u64,
            }),
        }
    }

    /// A failed detector contributes nothing; the frame still publishes.
    async fn settle(&self, result: Result<Detections, DetectorFailure>) -> Detections {
        match result {
            Ok(detections) => detections,
            Err(failure) => {
                self.record_failure(&failure).await;
                Detections::empty(failure.detector())
            }
        }
    }

    async fn record_failure(&self, failure: &DetectorFailure) {
        warn!("{}", failure);
        self.telemetry(TelemetryEvent::DetectorFailed {
            detector: failure.detector(),
            timed_out: failure.is_timeout(),
        })
        .await;
    }

    async fn telemetry(&self, event: TelemetryEvent) {
        let _ = self.tx.send(Event::Telemetry(event)).await;
    }
}
