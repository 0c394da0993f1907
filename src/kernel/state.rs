use super::mode::Mode;
use super::time::Timestamp;

/// Strict state delta. This is the ONLY way `OutputState` mutates.
#[derive(Debug, Clone, PartialEq)]
pub enum StateDelta {
    /// An automatic object announcement went out.
    Spoke { phrase: String, at: Timestamp },
    /// New text was read aloud in text mode.
    TextRecognized(String),
    /// The mode controller switched; the entered mode starts with a clean history.
    ModeEntered { mode: Mode, at: Timestamp },
}

/// Output history. Owned by the arbitrator; lives for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputState {
    last_spoken: Option<String>,
    last_spoken_at: Option<Timestamp>,
    last_recognized: Option<String>,
    mode: Mode,
}

impl OutputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(&mut self, delta: StateDelta) {
        match delta {
            StateDelta::Spoke { phrase, at } => {
                self.last_spoken = Some(phrase);
                self.last_spoken_at = Some(at);
            }
            StateDelta::TextRecognized(text) => {
                self.last_recognized = Some(text);
            }
            StateDelta::ModeEntered { mode, at } => {
                self.mode = mode;
                match mode {
                    Mode::ObjectDetection => self.last_spoken = None,
                    Mode::TextReading => self.last_recognized = None,
                }
                // The announcement holds the throttle window so the first
                // detection in the new mode does not cut it off.
                self.last_spoken_at = Some(at);
            }
        }
    }

    pub fn last_spoken(&self) -> Option<&str> {
        self.last_spoken.as_deref()
    }

    pub fn last_spoken_at(&self) -> Option<Timestamp> {
        self.last_spoken_at
    }

    pub fn last_recognized(&self) -> Option<&str> {
        self.last_recognized.as_deref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}
