//! Fuses one frame's detector outputs into the description the user hears and sees.

use tracing::debug;

use super::detector::{BoundingBox, Detections, RawDetection, SceneTag};
use super::locator::{PositionDescriptor, SpatialLocator};

pub const OBJECT_BULLET: &str = "•";
pub const SCENE_MARKER: &str = "📍";
pub const UNKNOWN_OBJECT: &str = "unknown object";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Object,
    Scene,
}

/// One line of the current description.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionEntry {
    pub kind: EntryKind,
    pub text: String,
    pub position: Option<PositionDescriptor>,
    pub overlay: Option<BoundingBox>,
}

/// Everything published for one frame. Replaced as a whole, never patched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneDescription {
    pub entries: Vec<DetectionEntry>,
    /// Same order as the object entries; the scene entry has no box.
    pub boxes: Vec<BoundingBox>,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl SceneDescription {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.text.clone()).collect()
    }
}

pub struct Aggregator {
    locator: SpatialLocator,
    announce_threshold: f32,
}

impl Aggregator {
    pub fn new(locator: SpatialLocator, announce_threshold: f32) -> Self {
        Self { locator, announce_threshold }
    }

    /// Builds the description from every detector output for one frame.
    /// Object entries keep detector order; the scene entry, if any, is last.
    pub fn aggregate(&self, outputs: &[Detections], frame_width: u32, frame_height: u32) -> SceneDescription {
        let mut description = SceneDescription { frame_width, frame_height, ..Default::default() };
        let mut scene: Option<&SceneTag> = None;

        for output in outputs {
            match output {
                Detections::Objects(detections) => {
                    for detection in detections {
                        if let Some(entry) = self.object_entry(detection, frame_width, frame_height) {
                            description.boxes.push(detection.bbox);
                            description.entries.push(entry);
                        }
                    }
                }
                Detections::Scene(tags) => {
                    for tag in tags {
                        if tag.confidence <= self.announce_threshold {
                            continue;
                        }
                        match scene {
                            Some(best) if tag.confidence <= best.confidence => {}
                            _ => scene = Some(tag),
                        }
                    }
                }
                Detections::Text(_) => {
                    debug!("Ignoring text output in scene aggregation");
                }
            }
        }

        if let Some(tag) = scene {
            description.entries.push(DetectionEntry {
                kind: EntryKind::Scene,
                text: format!("{} Scene: {}", SCENE_MARKER, tag.label),
                position: None,
                overlay: None,
            });
        }

        description
    }

    fn object_entry(&self, detection: &RawDetection, width: u32, height: u32) -> Option<DetectionEntry> {
        let position = match self.locator.locate(&detection.bbox, width, height) {
            Ok(position) => position,
            Err(e) => {
                debug!("Dropping detection: {}", e);
                return None;
            }
        };

        let label = match detection.top_label() {
            Some(top) => format!("{} ({}%)", top.label, percent(top.confidence)),
            None => UNKNOWN_OBJECT.to_string(),
        };

        Some(DetectionEntry {
            kind: EntryKind::Object,
            text: format!("{} {} — {}", OBJECT_BULLET, label, position.phrase()),
            position: Some(position),
            overlay: Some(detection.bbox),
        })
    }
}

fn percent(confidence: f32) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}
