//! The per-edge handoff: a bounded, capacity-one, blocking, closeable exchange point.
//!
//! This is the Rust re-expression of the original's two-mutex-plus-condvar dance (see
//! `original_source/include/pipe/Module.hh`), reformulated as a bounded single-slot channel.
//! A raw `Mutex`/`Condvar` guard in Rust is RAII-scoped to the acquiring call and cannot be
//! handed across threads or unlocked from a different call site, unlike the original's
//! `std::unique_lock` toggling; a single `Mutex<HandoffState>` plus one `Condvar` gives the same
//! FIFO-and-at-most-one-in-flight guarantees without needing that.

#[cfg(not(loom))]
use std::sync::{Condvar, Mutex};

#[cfg(loom)]
use loom::sync::{Condvar, Mutex};

use crate::bundle::Bundle;

struct HandoffState {
    slot: Option<Bundle>,
    closed: bool,
}

/// The exchange point owned by the *receiving* side of one pipeline edge.
pub(crate) struct Handoff {
    state: Mutex<HandoffState>,
    cond: Condvar,
}

impl Handoff {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(HandoffState {
                slot: None,
                closed: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// Blocks until the slot is empty, then installs `bundle`.
    ///
    /// Returns `Err(bundle)` if the handoff has been closed (the owning stage is Not-Alive);
    /// the caller is expected to drop the returned bundle.
    pub(crate) fn push(&self, bundle: Bundle) -> Result<(), Bundle> {
        let mut state = self.state.lock().expect("handoff mutex poisoned");
        loop {
            if state.closed {
                return Err(bundle);
            }
            if state.slot.is_none() {
                break;
            }
            state = self.cond.wait(state).expect("handoff mutex poisoned");
        }
        state.slot = Some(bundle);
        self.cond.notify_all();
        Ok(())
    }

    /// Blocks until a bundle is available, or the handoff is closed with nothing pending.
    pub(crate) fn recv(&self) -> Option<Bundle> {
        let mut state = self.state.lock().expect("handoff mutex poisoned");
        loop {
            if let Some(bundle) = state.slot.take() {
                self.cond.notify_all();
                return Some(bundle);
            }
            if state.closed {
                return None;
            }
            state = self.cond.wait(state).expect("handoff mutex poisoned");
        }
    }

    /// Marks the handoff closed, waking any thread parked in [`Self::push`]. Idempotent.
    pub(crate) fn close(&self) {
        let mut state = self.state.lock().expect("handoff mutex poisoned");
        state.closed = true;
        self.cond.notify_all();
    }
}
