//! The two in-band coordination messages: [`ControlMessage`] and [`Interrupt`].

use std::fmt;

use crate::accessor::CanonicalMessage;

/// A control signal injected by the pipeline head and carried downstream through every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Normal,
    Shutdown,
    SoftReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlMessage {
    pub kind: ControlKind,
}

impl ControlMessage {
    pub fn new(kind: ControlKind) -> Self {
        Self { kind }
    }

    pub fn normal() -> Self {
        Self::new(ControlKind::Normal)
    }

    pub fn shutdown() -> Self {
        Self::new(ControlKind::Shutdown)
    }

    pub fn soft_reset() -> Self {
        Self::new(ControlKind::SoftReset)
    }
}

impl Default for ControlMessage {
    fn default() -> Self {
        Self::normal()
    }
}

impl fmt::Display for ControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControlMessage::{:?}", self.kind)
    }
}

impl CanonicalMessage for ControlMessage {
    const MESSAGE_TYPE: &'static str = "pipe::ControlMessage";
}

/// A signal emitted by a stage for the head to observe and translate into a [`ControlMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    BreakPoint,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupt {
    pub kind: InterruptKind,
}

impl Interrupt {
    pub fn new(kind: InterruptKind) -> Self {
        Self { kind }
    }

    pub fn break_point() -> Self {
        Self::new(InterruptKind::BreakPoint)
    }

    pub fn finished() -> Self {
        Self::new(InterruptKind::Finished)
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::finished()
    }
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interrupt::{:?}", self.kind)
    }
}

impl CanonicalMessage for Interrupt {
    const MESSAGE_TYPE: &'static str = "pipe::Interrupt";
}

/// Translates a stage-emitted interrupt into the control message the head should inject next.
pub(crate) fn translate_interrupt(interrupt: Interrupt) -> ControlMessage {
    match interrupt.kind {
        InterruptKind::BreakPoint => ControlMessage::soft_reset(),
        InterruptKind::Finished => ControlMessage::shutdown(),
    }
}
