//! Output sinks. The kernel decides, these deliver.

use std::time::Duration;

use crate::kernel::scheduler::SideEffect;
use crate::vision::detector::BoundingBox;

pub mod overlay;
pub mod realizer;
pub mod speech;
pub mod text;

pub trait SpeechSink: Send {
    /// Flush semantics: cancels any utterance in flight or waiting on its delay.
    fn speak(&mut self, phrase: &str, delay: Duration);
    fn stop(&mut self);
}

pub trait HapticSink: Send {
    fn pulse(&mut self, duration: Duration);
}

pub trait VisualSink: Send {
    /// Boxes are in frame pixels; scaling to the display is the sink's job.
    fn render(&mut self, lines: &[String], boxes: &[BoundingBox], frame_width: u32, frame_height: u32);
    fn show_mode(&mut self, indicator: &str);
}

pub struct Sinks {
    pub speech: Box<dyn SpeechSink>,
    pub haptic: Box<dyn HapticSink>,
    pub visual: Box<dyn VisualSink>,
}

impl Sinks {
    pub fn execute(&mut self, effect: SideEffect) {
        match effect {
            SideEffect::Speak { phrase, delay } => self.speech.speak(&phrase, delay),
            SideEffect::Pulse(duration) => self.haptic.pulse(duration),
            SideEffect::Render { lines, boxes, frame_width, frame_height } => {
                self.visual.render(&lines, &boxes, frame_width, frame_height)
            }
            SideEffect::ShowMode(indicator) => self.visual.show_mode(&indicator),
        }
    }
}
