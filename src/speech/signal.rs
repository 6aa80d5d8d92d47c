//! Voice-change signal
//!
//! Engines report voice-list changes through a callback that may run on
//! any thread. The callback only raises a flag and wakes the event loop;
//! the loop performs the actual refresh between handlers, so a refresh
//! never interleaves with a speak.

use super::engine::VoicesChanged;
use log::{debug, warn};
use mio::Waker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared pending flag for voice-change notifications
#[derive(Clone, Default)]
pub struct VoiceSignal {
    pending: Arc<AtomicBool>,
    waker: Option<Arc<Waker>>,
}

impl VoiceSignal {
    /// Signal without a waker (the loop polls `take()` itself)
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that also wakes a `mio::Poll`
    pub fn with_waker(waker: Arc<Waker>) -> Self {
        Self {
            pending: Arc::new(AtomicBool::new(false)),
            waker: Some(waker),
        }
    }

    /// Mark the voice list as changed
    pub fn notify(&self) {
        debug!("Voice list change notified");
        self.pending.store(true, Ordering::Release);
        if let Some(waker) = &self.waker {
            if let Err(e) = waker.wake() {
                warn!("Failed to wake event loop: {}", e);
            }
        }
    }

    /// Clear the flag, returning whether a change was pending
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Callback to hand to `SpeechEngine::subscribe`
    pub fn callback(&self) -> VoicesChanged {
        let signal = self.clone();
        Box::new(move || signal.notify())
    }
}
