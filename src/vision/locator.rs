use serde::{Deserialize, Serialize};

use super::detector::BoundingBox;
use crate::config::LocatorThresholds;
use crate::error::LocatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizontal {
    Left,
    Ahead,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vertical {
    Above,
    EyeLevel,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Proximity {
    VeryClose,
    Nearby,
    Distant,
}

impl Horizontal {
    pub fn phrase(&self) -> &'static str {
        match self {
            Horizontal::Left => "on your left",
            Horizontal::Ahead => "straight ahead",
            Horizontal::Right => "on your right",
        }
    }
}

impl Vertical {
    pub fn phrase(&self) -> &'static str {
        match self {
            Vertical::Above => "above",
            Vertical::EyeLevel => "at eye level",
            Vertical::Below => "below",
        }
    }
}

impl Proximity {
    pub fn phrase(&self) -> &'static str {
        match self {
            Proximity::VeryClose => "very close",
            Proximity::Nearby => "nearby",
            Proximity::Distant => "distant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionDescriptor {
    pub horizontal: Horizontal,
    pub vertical: Vertical,
    pub proximity: Proximity,
}

impl PositionDescriptor {
    /// "on your left, nearby"
    pub fn phrase(&self) -> String {
        format!("{}, {}", self.horizontal.phrase(), self.proximity.phrase())
    }

    /// "on your left, above, nearby"
    pub fn phrase_with_elevation(&self) -> String {
        format!("{}, {}, {}", self.horizontal.phrase(), self.vertical.phrase(), self.proximity.phrase())
    }
}

/// Maps a detection box to where it sits relative to the user.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialLocator {
    thresholds: LocatorThresholds,
}

impl SpatialLocator {
    pub fn new(thresholds: LocatorThresholds) -> Self {
        Self { thresholds }
    }

    /// Pure function of the box and frame size. Rejects zero-sized frames
    /// instead of dividing by them.
    pub fn locate(&self, bbox: &BoundingBox, width: u32, height: u32) -> Result<PositionDescriptor, LocatorError> {
        if width == 0 || height == 0 {
            return Err(LocatorError::DegenerateFrame { width, height });
        }
        if !bbox.is_finite() {
            return Err(LocatorError::NonFiniteBox);
        }
        let t = &self.thresholds;
        let (w, h) = (width as f32, height as f32);
        let (cx, cy) = bbox.center();
        let center_x = cx / w;
        let center_y = cy / h;

        let horizontal = if center_x < t.left_max {
            Horizontal::Left
        } else if center_x > t.right_min {
            Horizontal::Right
        } else {
            Horizontal::Ahead
        };

        let vertical = if center_y < t.above_max {
            Vertical::Above
        } else if center_y > t.below_min {
            Vertical::Below
        } else {
            Vertical::EyeLevel
        };

        let area = (bbox.width() * bbox.height()) / (w * h);
        let proximity = if area > t.very_close_area {
            Proximity::VeryClose
        } else if area > t.nearby_area {
            Proximity::Nearby
        } else {
            Proximity::Distant
        };

        Ok(PositionDescriptor { horizontal, vertical, proximity })
    }
}
