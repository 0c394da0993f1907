use std::time::Duration;

use tracing::info;

use super::overlay::scale_boxes;
use super::{HapticSink, VisualSink};
use crate::vision::detector::BoundingBox;

/// What one `render` call drew: lines and boxes from the same frame.
#[derive(Debug, Clone, Default, PartialEq)]
struct Drawn {
    lines: Vec<String>,
    boxes: Vec<BoundingBox>,
    frame_width: u32,
    frame_height: u32,
}

/// Terminal stand-in for the caption panel and preview overlay.
pub struct ConsoleDisplay {
    /// Overlay boxes are reported in this view's coordinates.
    pub view_width: f32,
    pub view_height: f32,
    last: Drawn,
    renders: u64,
}

impl ConsoleDisplay {
    pub fn new(view_width: f32, view_height: f32) -> Self {
        Self { view_width, view_height, last: Drawn::default(), renders: 0 }
    }

    pub fn last_lines(&self) -> &[String] {
        &self.last.lines
    }

    /// Boxes currently on screen, in frame pixels.
    pub fn last_boxes(&self) -> &[BoundingBox] {
        &self.last.boxes
    }

    /// Number of times the panel was redrawn.
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

impl VisualSink for ConsoleDisplay {
    fn render(&mut self, lines: &[String], boxes: &[BoundingBox], frame_width: u32, frame_height: u32) {
        let next = Drawn { lines: lines.to_vec(), boxes: boxes.to_vec(), frame_width, frame_height };
        // Skip only an identical redraw; moved boxes replace the old set.
        if next == self.last {
            return;
        }
        println!("----");
        for line in &next.lines {
            println!("{}", line);
        }
        for b in scale_boxes(&next.boxes, frame_width, frame_height, self.view_width, self.view_height) {
            println!("  [box] ({:.0},{:.0})-({:.0},{:.0})", b.left, b.top, b.right, b.bottom);
        }
        self.last = next;
        self.renders += 1;
    }

    fn show_mode(&mut self, indicator: &str) {
        println!("==== {} ====", indicator);
    }
}

pub struct ConsoleHaptic;

impl HapticSink for ConsoleHaptic {
    fn pulse(&mut self, duration: Duration) {
        info!("[HAPTIC] {}ms", duration.as_millis());
    }
}
