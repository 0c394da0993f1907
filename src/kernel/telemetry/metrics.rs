use std::collections::VecDeque;

use super::event::{FrameEventKind, SuppressReason, TelemetryEvent, UtteranceKind};
use crate::vision::detector::DetectorKind;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub frame_stats: FrameStats,
    pub detector_stats: DetectorStats,
    pub speech_stats: SpeechStats,
    pub mode_transitions: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub published: u64,
    pub stale: u64,
    pub skipped: u64,
    pub analyzed: u64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorStats {
    pub object_failures: u64,
    pub scene_failures: u64,
    pub text_failures: u64,
    pub timeouts: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeechStats {
    pub detections: u64,
    pub recognized_texts: u64,
    pub speak_all: u64,
    pub mode_switches: u64,
    pub throttled: u64,
    pub duplicates: u64,
    pub silent: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut total_latency = 0u64;

    for event in events {
        match event {
            TelemetryEvent::FrameLifecycle { event, .. } => match event {
                FrameEventKind::Published => snap.frame_stats.published += 1,
                FrameEventKind::Stale => snap.frame_stats.stale += 1,
            },
            TelemetryEvent::FrameSkipped => snap.frame_stats.skipped += 1,
            TelemetryEvent::DetectorFailed { detector, timed_out } => {
                match detector {
                    DetectorKind::Object => snap.detector_stats.object_failures += 1,
                    DetectorKind::Scene => snap.detector_stats.scene_failures += 1,
                    DetectorKind::Text => snap.detector_stats.text_failures += 1,
                }
                if *timed_out {
                    snap.detector_stats.timeouts += 1;
                }
            }
            TelemetryEvent::AnalysisCompleted { latency_ms, .. } => {
                snap.frame_stats.analyzed += 1;
                total_latency += latency_ms;
                snap.frame_stats.max_latency_ms = snap.frame_stats.max_latency_ms.max(*latency_ms);
            }
            TelemetryEvent::Utterance { kind } => match kind {
                UtteranceKind::Detection => snap.speech_stats.detections += 1,
                UtteranceKind::RecognizedText => snap.speech_stats.recognized_texts += 1,
                UtteranceKind::SpeakAll => snap.speech_stats.speak_all += 1,
                UtteranceKind::ModeSwitch => snap.speech_stats.mode_switches += 1,
                UtteranceKind::Greeting | UtteranceKind::Closing => {}
            },
            TelemetryEvent::Suppressed { reason } => match reason {
                SuppressReason::Throttled => snap.speech_stats.throttled += 1,
                SuppressReason::Duplicate => snap.speech_stats.duplicates += 1,
                SuppressReason::NothingToSay => snap.speech_stats.silent += 1,
            },
            TelemetryEvent::ModeTransition { .. } => snap.mode_transitions += 1,
        }
    }

    if snap.frame_stats.analyzed > 0 {
        snap.frame_stats.avg_latency_ms = total_latency as f64 / snap.frame_stats.analyzed as f64;
    }

    snap
}
