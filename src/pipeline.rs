//! The pipeline head: assembles stages, spawns their threads, produces fresh bundles, closes the
//! ring, and translates tail interrupts into control messages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::accessor::TypeKeyedAccessor;
use crate::bundle::Bundle;
use crate::config::PipelineOptions;
use crate::error::PipeError;
use crate::handoff::Handoff;
use crate::message::{translate_interrupt, ControlKind, ControlMessage, Interrupt};
use crate::stage::{run_stage_loop, Stage};

/// The ordered chain of stages plus the coordination state needed to run it.
pub struct Pipeline<'p> {
    stages: Vec<Box<dyn Stage + 'p>>,
    options: PipelineOptions,
    terminate: Arc<AtomicBool>,
}

impl<'p> Default for Pipeline<'p> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> Pipeline<'p> {
    pub fn new() -> Self {
        Self::with_options(PipelineOptions::default())
    }

    pub fn with_options(options: PipelineOptions) -> Self {
        Self {
            stages: Vec::new(),
            options,
            terminate: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Appends a borrowed stage. Returns `self` for chaining; per the original design's own note
    /// that its owned-stage chaining "doesn't really work," no fancier typestate is attempted.
    pub fn connect<S>(&mut self, stage: &'p mut S) -> &mut Self
    where
        S: Stage + 'p,
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// Appends a stage and transfers ownership of it into the pipeline.
    pub fn connect_owned<S>(&mut self, stage: S) -> &mut Self
    where
        S: Stage + 'p,
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// A thread-safe, idempotent request for orderly shutdown. Callable from any thread, before
    /// or during [`Self::run`].
    pub fn terminate(&self) {
        self.terminate.store(true, Ordering::SeqCst);
    }

    /// Returns a cheaply-cloneable handle that can call [`Self::terminate`] from another thread
    /// without borrowing the pipeline.
    pub fn terminate_handle(&self) -> TerminateHandle {
        TerminateHandle {
            flag: Arc::clone(&self.terminate),
        }
    }

    /// Blocks until the pipeline shuts down. Returns immediately, spawning no threads, if no
    /// stages are attached.
    pub fn run(&mut self, persist: bool) {
        if self.stages.is_empty() {
            tracing::debug!("pipeline has no stages attached, returning immediately");
            return;
        }

        let n = self.stages.len();
        // ring[0] = stage0's inbound = head's outbound.
        // ring[i] = stage i's inbound, for i in 1..n.
        // ring[n] = head's inbound = stage (n-1)'s downstream, closing the ring.
        let ring: Vec<Handoff> = (0..=n).map(|_| Handoff::new()).collect();

        std::thread::scope(|scope| {
            for (i, stage) in self.stages.iter_mut().enumerate() {
                let inbound = &ring[i];
                let downstream = &ring[i + 1];
                let name = format!("{}-{i}", self.options.stage_name_prefix);
                let stage_ref: &mut dyn Stage = stage.as_mut();
                let builder = std::thread::Builder::new().name(name.clone());
                builder
                    .spawn_scoped(scope, move || {
                        run_stage_loop(&name, stage_ref, inbound, downstream, persist);
                    })
                    .expect("failed to spawn stage thread");
            }

            self.head_loop(persist, &ring[0], &ring[n]);
        });
    }

    /// Builds the outbound bundle for one head cycle: fresh, empty, with at most one control
    /// message attached according to the external terminate flag or the previous cycle's
    /// end-of-line interrupt.
    fn build_outbound(&self, eol: &Bundle) -> Bundle {
        let mut out = Bundle::new();
        let control = TypeKeyedAccessor::<ControlMessage>::new();

        let to_attach = if self.terminate.load(Ordering::SeqCst) {
            Some(ControlMessage::shutdown())
        } else {
            match TypeKeyedAccessor::<Interrupt>::new().read(eol) {
                Ok(Some(interrupt)) => Some(translate_interrupt(interrupt)),
                Ok(None) => None,
                Err(err) => {
                    tracing::warn!(%err, "interrupt type mismatch on end-of-line bundle, ignoring");
                    None
                }
            }
        };

        if let Some(cm) = to_attach {
            if !control.attach(&mut out, cm) {
                // Unreachable given `out` is always freshly allocated above, but checked and
                // logged defensively, matching the original's log-and-continue behavior.
                let existing = control
                    .read(&out)
                    .ok()
                    .flatten()
                    .map(|m| m.kind)
                    .unwrap_or(ControlKind::Normal);
                let err = PipeError::ControlAttachCollision {
                    attempted: cm.kind,
                    existing,
                };
                tracing::error!(%err, "control message collision during head injection");
            }
        }

        out
    }

    fn head_loop(&mut self, persist: bool, outbound: &Handoff, inbound: &Handoff) {
        let control = TypeKeyedAccessor::<ControlMessage>::new();

        // Cycle 0: the head produces the first bundle itself, using an empty placeholder as
        // "end-of-line" so an already-pending terminate() still takes effect immediately.
        let first_out = self.build_outbound(&Bundle::new());
        if outbound.push(first_out).is_err() {
            return;
        }

        let mut alive = true;
        loop {
            let eol = match inbound.recv() {
                Some(bundle) => bundle,
                None => break,
            };

            match control.read(&eol) {
                Ok(Some(cm)) if cm.kind == ControlKind::Shutdown => alive = false,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%err, "control message type mismatch on end-of-line bundle, ignoring");
                }
            }

            if !persist {
                // One-shot mode: every stage has now completed exactly one cycle (we just
                // observed the bundle return from the tail). Don't push a further cycle.
                break;
            }

            let out = self.build_outbound(&eol);
            if outbound.push(out).is_err() {
                break;
            }

            if !alive {
                break;
            }
        }
    }
}

/// A cloneable, thread-safe handle for requesting pipeline termination from outside the thread
/// that called [`Pipeline::run`].
#[derive(Clone)]
pub struct TerminateHandle {
    flag: Arc<AtomicBool>,
}

impl TerminateHandle {
    pub fn terminate(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}
