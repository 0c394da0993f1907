use std::time::Duration;

use super::mode::Mode;
use super::state::{OutputState, StateDelta};
use super::telemetry::event::{SuppressReason, UtteranceKind};
use super::time::Timestamp;
use crate::config::PipelineConfig;
use crate::outputs::realizer::{self, NO_TEXT};
use crate::vision::aggregator::SceneDescription;
use crate::vision::detector::RecognizedText;

/// Something the arbitrator decided should be said.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub phrase: String,
    pub kind: UtteranceKind,
    /// Presentation delay before the utterance starts.
    pub delay: Duration,
    /// Accompany with a short haptic pulse.
    pub haptic: bool,
}

impl Announcement {
    fn immediate(phrase: impl Into<String>, kind: UtteranceKind) -> Self {
        Self { phrase: phrase.into(), kind, delay: Duration::ZERO, haptic: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Speak(Announcement),
    Silent(SuppressReason),
}

/// Decides what, if anything, is spoken. Sole owner of `OutputState`: every
/// decision reads the history, decides and writes back inside one `&mut self`
/// call, so two frames can never both win the same throttle window.
pub struct OutputArbitrator {
    state: OutputState,
    throttle_ms: u64,
    text_delay: Duration,
}

impl OutputArbitrator {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            state: OutputState::new(),
            throttle_ms: config.speech_throttle_ms,
            text_delay: config.text_presentation_delay(),
        }
    }

    pub fn state(&self) -> &OutputState {
        &self.state
    }

    /// Object/scene mode: announce the top entry when it is new and the
    /// throttle window has passed.
    pub fn on_description(&mut self, description: &SceneDescription, now: Timestamp) -> Verdict {
        if let Some(at) = self.state.last_spoken_at() {
            if now.since(at) < self.throttle_ms {
                return Verdict::Silent(SuppressReason::Throttled);
            }
        }

        let Some(top) = description.entries.first() else {
            return Verdict::Silent(SuppressReason::NothingToSay);
        };

        let phrase = realizer::spoken_form(&top.text);
        if self.state.last_spoken() == Some(phrase.as_str()) {
            return Verdict::Silent(SuppressReason::Duplicate);
        }

        self.state.reduce(StateDelta::Spoke { phrase: phrase.clone(), at: now });
        Verdict::Speak(Announcement {
            phrase,
            kind: UtteranceKind::Detection,
            delay: Duration::ZERO,
            haptic: true,
        })
    }

    /// Text mode: read each newly appeared block once. No time throttle.
    pub fn on_text(&mut self, text: &RecognizedText) -> Verdict {
        let text = text.trimmed();
        if text.is_empty() {
            return Verdict::Silent(SuppressReason::NothingToSay);
        }
        if self.state.last_recognized() == Some(text) {
            return Verdict::Silent(SuppressReason::Duplicate);
        }

        self.state.reduce(StateDelta::TextRecognized(text.to_string()));
        Verdict::Speak(Announcement {
            phrase: realizer::reading_phrase(text),
            kind: UtteranceKind::RecognizedText,
            delay: self.text_delay,
            haptic: false,
        })
    }

    /// On-demand read-out. Bypasses throttling and leaves the history untouched.
    pub fn speak_all(&self, current: Option<&SceneDescription>) -> Announcement {
        let phrase = match self.state.mode() {
            Mode::ObjectDetection => {
                let entries = current.map(|d| d.entries.as_slice()).unwrap_or(&[]);
                realizer::speak_all_phrase(entries)
            }
            Mode::TextReading => match self.state.last_recognized() {
                Some(text) => realizer::reading_phrase(text),
                None => NO_TEXT.to_string(),
            },
        };
        Announcement::immediate(phrase, UtteranceKind::SpeakAll)
    }

    /// Called by the reactor right after the mode controller transitions.
    pub fn on_mode_entered(&mut self, mode: Mode, now: Timestamp) -> Announcement {
        self.state.reduce(StateDelta::ModeEntered { mode, at: now });
        Announcement::immediate(mode.announcement(), UtteranceKind::ModeSwitch)
    }

    /// Session start: the greeting holds the throttle window like a mode switch.
    pub fn greeting(&mut self, now: Timestamp) -> Announcement {
        self.state.reduce(StateDelta::ModeEntered { mode: Mode::ObjectDetection, at: now });
        Announcement::immediate(realizer::GREETING, UtteranceKind::Greeting)
    }

    pub fn closing(&self) -> Announcement {
        Announcement::immediate(realizer::CLOSING, UtteranceKind::Closing)
    }
}
