//! The stage trait and the per-stage run loop: `waitForData -> processControlMessage ->
//! processData -> pushData`, repeated while `persist && alive`.

use crate::accessor::TypeKeyedAccessor;
use crate::bundle::Bundle;
use crate::handoff::Handoff;
use crate::message::{ControlKind, ControlMessage};

/// A pipeline node implemented by user code.
///
/// Only [`Stage::process_data`] is required; the remaining hooks default to no-ops.
pub trait Stage: Send {
    /// Called once before the first cycle.
    fn initialize(&mut self) {}

    /// Called once per cycle with the current bundle.
    fn process_data(&mut self, bundle: &mut Bundle);

    /// Called when a SOFT_RESET control message is observed.
    fn reset(&mut self) {}

    /// Called when a SHUTDOWN control message is observed, in addition to the engine marking
    /// the stage Not-Alive.
    fn on_shutdown(&mut self) {}

    /// Called once after the last cycle, before the stage's thread exits.
    fn clean_up(&mut self) {}
}

impl<T: Stage + ?Sized> Stage for Box<T> {
    fn initialize(&mut self) {
        (**self).initialize()
    }

    fn process_data(&mut self, bundle: &mut Bundle) {
        (**self).process_data(bundle)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn on_shutdown(&mut self) {
        (**self).on_shutdown()
    }

    fn clean_up(&mut self) {
        (**self).clean_up()
    }
}

impl<'a, T: Stage + ?Sized> Stage for &'a mut T {
    fn initialize(&mut self) {
        (**self).initialize()
    }

    fn process_data(&mut self, bundle: &mut Bundle) {
        (**self).process_data(bundle)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn on_shutdown(&mut self) {
        (**self).on_shutdown()
    }

    fn clean_up(&mut self) {
        (**self).clean_up()
    }
}

/// Runs one stage's lifecycle on the calling thread until it observes SHUTDOWN (or `persist` is
/// false, in which case it runs exactly one cycle).
pub(crate) fn run_stage_loop(
    name: &str,
    stage: &mut dyn Stage,
    inbound: &Handoff,
    downstream: &Handoff,
    persist: bool,
) {
    stage.initialize();
    let control = TypeKeyedAccessor::<ControlMessage>::new();
    let mut alive = true;

    loop {
        let mut bundle = match inbound.recv() {
            Some(bundle) => bundle,
            None => break,
        };

        match control.read(&bundle) {
            Ok(Some(cm)) => match cm.kind {
                ControlKind::SoftReset => {
                    tracing::debug!(stage = name, "soft reset observed");
                    stage.reset();
                }
                ControlKind::Shutdown => {
                    tracing::debug!(stage = name, "shutdown observed");
                    alive = false;
                    stage.on_shutdown();
                }
                ControlKind::Normal => {}
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(stage = name, %err, "control message type mismatch, ignoring");
            }
        }

        stage.process_data(&mut bundle);

        if downstream.push(bundle).is_err() {
            tracing::trace!(stage = name, "downstream already shut down, dropping bundle");
        }

        if !(persist && alive) {
            break;
        }
    }

    stage.clean_up();
    inbound.close();
}
