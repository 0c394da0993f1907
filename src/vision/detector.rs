//! Detector adapters.
//!
//! The models behind these traits are opaque. Each adapter turns one frame into
//! structured results and reports failure instead of hanging; the pipeline also
//! bounds every call with a timeout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::frame::Frame;
use crate::error::DetectorFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectorKind {
    Object,
    Scene,
    Text,
}

impl std::fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DetectorKind::Object => "object",
            DetectorKind::Scene => "scene",
            DetectorKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// Box in source-frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.top.is_finite() && self.right.is_finite() && self.bottom.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCandidate {
    pub label: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub bbox: BoundingBox,
    /// May be empty when the detector found an object it cannot classify.
    pub labels: Vec<LabelCandidate>,
}

impl RawDetection {
    pub fn new(bbox: BoundingBox) -> Self {
        Self { bbox, labels: Vec::new() }
    }

    pub fn with_label(mut self, label: impl Into<String>, confidence: f32) -> Self {
        self.labels.push(LabelCandidate { label: label.into(), confidence });
        self
    }

    /// Highest-confidence candidate; the earlier one wins a tie.
    pub fn top_label(&self) -> Option<&LabelCandidate> {
        let mut best: Option<&LabelCandidate> = None;
        for candidate in &self.labels {
            match best {
                Some(b) if candidate.confidence <= b.confidence => {}
                _ => best = Some(candidate),
            }
        }
        best
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTag {
    pub label: String,
    pub confidence: f32,
}

impl SceneTag {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self { label: label.into(), confidence }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecognizedText(pub String);

impl RecognizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn trimmed(&self) -> &str {
        self.0.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

/// One detector's result for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Detections {
    Objects(Vec<RawDetection>),
    Scene(Vec<SceneTag>),
    Text(RecognizedText),
}

impl Detections {
    pub fn kind(&self) -> DetectorKind {
        match self {
            Detections::Objects(_) => DetectorKind::Object,
            Detections::Scene(_) => DetectorKind::Scene,
            Detections::Text(_) => DetectorKind::Text,
        }
    }

    /// What a failed detector contributes.
    pub fn empty(kind: DetectorKind) -> Self {
        match kind {
            DetectorKind::Object => Detections::Objects(Vec::new()),
            DetectorKind::Scene => Detections::Scene(Vec::new()),
            DetectorKind::Text => Detections::Text(RecognizedText::default()),
        }
    }
}

#[async_trait]
pub trait ObjectDetector: Send + Sync {
    async fn detect_objects(&self, frame: &Frame) -> Result<Vec<RawDetection>, DetectorFailure>;
}

#[async_trait]
pub trait SceneLabeler: Send + Sync {
    async fn label_scene(&self, frame: &Frame) -> Result<Vec<SceneTag>, DetectorFailure>;
}

#[async_trait]
pub trait TextReader: Send + Sync {
    async fn read_text(&self, frame: &Frame) -> Result<String, DetectorFailure>;
}

/// Labeler adapter that discards tags below a confidence floor before
/// they reach the aggregator.
pub struct ConfidenceFloor<L> {
    inner: L,
    floor: f32,
}

impl<L> ConfidenceFloor<L> {
    pub fn new(inner: L, floor: f32) -> Self {
        Self { inner, floor }
    }
}

#[async_trait]
impl<L: SceneLabeler> SceneLabeler for ConfidenceFloor<L> {
    async fn label_scene(&self, frame: &Frame) -> Result<Vec<SceneTag>, DetectorFailure> {
        let mut tags = self.inner.label_scene(frame).await?;
        tags.retain(|tag| tag.confidence >= self.floor);
        Ok(tags)
    }
}
