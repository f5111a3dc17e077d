//! Error hierarchy for the pipeline crate.

use thiserror::Error;

use crate::message::ControlKind;

/// Errors surfaced by accessors and the pipeline head.
///
/// Nothing in this crate panics on a foreseeable, documented condition; every fallible operation
/// returns a `Result<_, PipeError>` instead.
#[derive(Debug, Error)]
pub enum PipeError {
    #[error("payload under \"{name}\" has type {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("no message present under \"{name}\"")]
    MissingMessage { name: String },

    #[error(
        "control message collision while injecting {attempted:?} onto a bundle that already carries {existing:?}"
    )]
    ControlAttachCollision {
        attempted: ControlKind,
        existing: ControlKind,
    },
}

pub type PipeResult<T> = Result<T, PipeError>;
