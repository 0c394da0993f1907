use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::{debug, warn};

use super::frame::{Capture, Frame};
use crate::error::FrameError;
use crate::kernel::time::Timestamp;

/// Pull-based frame supply. `Ok(None)` means nothing arrived within `wait`.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self, wait: Duration) -> Result<Option<Frame>, FrameError>;
}

#[derive(Default)]
struct Slot {
    latest: Option<(u64, Capture)>,
    next_seq: u64,
    last_captured: Option<Timestamp>,
    dropped: u64,
    closed: bool,
}

struct Shared {
    slot: Mutex<Slot>,
    ready: Notify,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        // A panicking producer leaves the slot in a usable state.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Producer half of a single-slot "keep only latest" feed.
///
/// A capture offered while the previous one is still unclaimed replaces it;
/// frames are never queued behind an analysis pass.
#[derive(Clone)]
pub struct FrameFeed {
    shared: Arc<Shared>,
}

/// Consumer half; the pipeline pulls from this.
pub struct LatestFrameSource {
    shared: Arc<Shared>,
}

pub fn frame_feed() -> (FrameFeed, LatestFrameSource) {
    let shared = Arc::new(Shared { slot: Mutex::new(Slot::default()), ready: Notify::new() });
    (FrameFeed { shared: shared.clone() }, LatestFrameSource { shared })
}

impl FrameFeed {
    /// Offer a capture. Returns false if it was rejected because its timestamp
    /// runs backwards or the feed is closed.
    pub fn offer(&self, capture: Capture) -> bool {
        let captured_at = capture.captured_at();
        {
            let mut slot = self.shared.lock();
            if slot.closed {
                return false;
            }
            if let Some(last) = slot.last_captured {
                if captured_at < last {
                    warn!("Dropping out-of-order capture ({}ms < {}ms)", captured_at.ms, last.ms);
                    return false;
                }
            }
            let seq = slot.next_seq;
            slot.next_seq += 1;
            slot.last_captured = Some(captured_at);
            if slot.latest.replace((seq, capture)).is_some() {
                slot.dropped += 1;
                debug!("Frame {} superseded an unclaimed capture", seq);
            }
        }
        self.shared.ready.notify_one();
        true
    }

    /// Captures replaced before the pipeline claimed them.
    pub fn dropped(&self) -> u64 {
        self.shared.lock().dropped
    }

    pub fn close(&self) {
        self.shared.lock().closed = true;
        self.shared.ready.notify_one();
    }
}

impl LatestFrameSource {
    fn take(&self) -> Result<Option<(u64, Capture)>, FrameError> {
        let mut slot = self.shared.lock();
        match slot.latest.take() {
            Some(entry) => Ok(Some(entry)),
            None if slot.closed => Err(FrameError::Closed),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl FrameSource for LatestFrameSource {
    async fn next_frame(&mut self, wait: Duration) -> Result<Option<Frame>, FrameError> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            if let Some((seq, capture)) = self.take()? {
                let mut frame = capture.into_frame()?;
                frame.seq = seq;
                return Ok(Some(frame));
            }
            if tokio::time::timeout_at(deadline, self.shared.ready.notified()).await.is_err() {
                return Ok(None);
            }
        }
    }
}
