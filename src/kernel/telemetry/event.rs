use serde::{Deserialize, Serialize};

use crate::kernel::mode::Mode;
use crate::vision::detector::DetectorKind;

// Allowed: sequence numbers, counts, durations, enums.
// Forbidden: spoken phrases, recognized text, labels, pixels.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    FrameLifecycle {
        seq: u64,
        event: FrameEventKind,
    },

    /// A capture could not be decoded and was never analyzed.
    FrameSkipped,

    DetectorFailed {
        detector: DetectorKind,
        timed_out: bool,
    },

    /// A frame pass finished; `latency_ms` is capture to publication.
    AnalysisCompleted {
        seq: u64,
        latency_ms: u64,
    },

    Utterance {
        kind: UtteranceKind,
    },

    Suppressed {
        reason: SuppressReason,
    },

    ModeTransition {
        from: Mode,
        to: Mode,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameEventKind {
    /// Description or text replaced the current one.
    Published,
    /// Analyzed under a mode that is no longer current, or overtaken.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtteranceKind {
    Greeting,
    Detection,
    RecognizedText,
    SpeakAll,
    ModeSwitch,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuppressReason {
    /// Inside the throttle window.
    Throttled,
    /// Same phrase as the last one spoken.
    Duplicate,
    /// Nothing detected, or blank text.
    NothingToSay,
}
