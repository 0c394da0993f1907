use std::time::Duration;

use super::arbitrator::Announcement;
use crate::config::UserProfile;
use crate::vision::detector::BoundingBox;

/// Work for the driver. The kernel never performs I/O itself.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// Flush semantics: replaces anything in flight or pending.
    Speak { phrase: String, delay: Duration },
    Pulse(Duration),
    /// Lines and boxes from the same frame, always delivered together.
    Render {
        lines: Vec<String>,
        boxes: Vec<BoundingBox>,
        frame_width: u32,
        frame_height: u32,
    },
    ShowMode(String),
}

pub struct Scheduler {
    profile: UserProfile,
    pulse: Duration,
}

impl Scheduler {
    pub fn new(profile: UserProfile, pulse: Duration) -> Self {
        Self { profile, pulse }
    }

    /// Pure Projection: Announcement + Profile -> SideEffects
    pub fn schedule(&self, announcement: Announcement) -> Vec<SideEffect> {
        let mut effects = Vec::with_capacity(2);
        if announcement.haptic {
            effects.push(SideEffect::Pulse(self.pulse));
        }
        if self.profile.speech_enabled() {
            effects.push(SideEffect::Speak { phrase: announcement.phrase, delay: announcement.delay });
        }
        effects
    }
}
