use super::mode::{Mode, ModeEpoch};
use super::telemetry::event::TelemetryEvent;
use super::time::Timestamp;
use crate::vision::aggregator::SceneDescription;
use crate::vision::detector::RecognizedText;

#[derive(Debug, Clone)]
pub enum Event {
    /// A fully analyzed frame from the vision pipeline.
    Frame(FrameReport),
    /// Explicit user triggers (buttons, gestures, console).
    Action(UserAction),
    /// Observations from outside the kernel, recorded verbatim.
    Telemetry(TelemetryEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    ToggleMode,
    SpeakAll,
}

/// Result of one analysis pass, stamped with the mode epoch it ran under.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub seq: u64,
    pub captured_at: Timestamp,
    pub epoch: ModeEpoch,
    pub analysis: FrameAnalysis,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameAnalysis {
    Described(SceneDescription),
    Read(RecognizedText),
}

impl FrameAnalysis {
    pub fn mode(&self) -> Mode {
        match self {
            FrameAnalysis::Described(_) => Mode::ObjectDetection,
            FrameAnalysis::Read(_) => Mode::TextReading,
        }
    }
}
