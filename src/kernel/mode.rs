use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

/// Which detector branch the pipeline runs. The two are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    ObjectDetection,
    TextReading,
}

impl Default for Mode {
    fn default() -> Self {
        Self::ObjectDetection
    }
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::ObjectDetection => Mode::TextReading,
            Mode::TextReading => Mode::ObjectDetection,
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            Mode::ObjectDetection => "🔍 OBJECT DETECTION MODE",
            Mode::TextReading => "📝 TEXT READER MODE",
        }
    }

    pub fn announcement(&self) -> &'static str {
        match self {
            Mode::ObjectDetection => "Object detection mode. I will identify objects around you.",
            Mode::TextReading => "Text reader mode. Point camera at signs, labels or menus.",
        }
    }
}

/// Incremented on every transition. Reports analyzed under an older epoch are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ModeEpoch(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSnapshot {
    pub mode: Mode,
    pub epoch: ModeEpoch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: Mode,
    pub to: Mode,
    pub epoch: ModeEpoch,
}

/// Sole owner of the operating mode. The pipeline observes it through a
/// watch channel and routes each frame by the snapshot it reads.
pub struct ModeController {
    current: ModeSnapshot,
    tx: watch::Sender<ModeSnapshot>,
}

impl ModeController {
    pub fn new() -> Self {
        let current = ModeSnapshot::default();
        let (tx, _rx) = watch::channel(current);
        Self { current, tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<ModeSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> ModeSnapshot {
        self.current
    }

    pub fn mode(&self) -> Mode {
        self.current.mode
    }

    pub fn is_current(&self, epoch: ModeEpoch) -> bool {
        self.current.epoch == epoch
    }

    /// Only reachable from an explicit user action.
    pub fn toggle(&mut self) -> ModeTransition {
        let from = self.current.mode;
        let to = from.toggled();
        self.current = ModeSnapshot { mode: to, epoch: ModeEpoch(self.current.epoch.0 + 1) };
        self.tx.send_replace(self.current);
        info!("Mode {:?} -> {:?} (epoch {})", from, to, self.current.epoch.0);
        ModeTransition { from, to, epoch: self.current.epoch }
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}
