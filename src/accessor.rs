//! Typed access to a [`Bundle`]. These accessor types are the only public door into a bundle's
//! contents — `Bundle` itself exposes no public data operations.

use std::marker::PhantomData;

use crate::bundle::Bundle;
use crate::error::{PipeError, PipeResult};

/// A payload type with a stable canonical name, usable with [`TypeKeyedAccessor`].
///
/// At most one payload per canonical name may exist in a bundle at a time.
pub trait CanonicalMessage: Clone + Send + 'static {
    const MESSAGE_TYPE: &'static str;
}

/// Accesses a bundle slot keyed by `T`'s canonical name.
pub struct TypeKeyedAccessor<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for TypeKeyedAccessor<T> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> TypeKeyedAccessor<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> TypeKeyedAccessor<T>
where
    T: CanonicalMessage,
{
    /// Does a payload exist under `T`'s canonical name?
    pub fn has(&self, bundle: &Bundle) -> bool {
        bundle.contains(T::MESSAGE_TYPE)
    }

    /// Copies the payload out, if present. `Err(TypeMismatch)` if a payload exists under this
    /// name but isn't a `T`.
    pub fn read(&self, bundle: &Bundle) -> PipeResult<Option<T>> {
        bundle.get::<T>(T::MESSAGE_TYPE)
    }

    /// Like [`Self::read`], but asserts presence: absence becomes `Err(MissingMessage)` instead
    /// of `Ok(None)`.
    pub fn read_required(&self, bundle: &Bundle) -> PipeResult<T> {
        self.read(bundle)?.ok_or_else(|| PipeError::MissingMessage {
            name: T::MESSAGE_TYPE.to_string(),
        })
    }

    /// Inserts `value` iff absent. Returns `false`, bundle unchanged, if already present.
    pub fn attach(&self, bundle: &mut Bundle, value: T) -> bool {
        bundle.insert(T::MESSAGE_TYPE, value)
    }
}

/// Accesses a bundle slot keyed by an arbitrary string name rather than a canonical type name.
pub struct NameKeyedAccessor<T> {
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> NameKeyedAccessor<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _marker: PhantomData,
        }
    }

    pub fn has(&self, bundle: &Bundle) -> bool {
        bundle.contains(&self.name)
    }

    pub fn read(&self, bundle: &Bundle) -> PipeResult<Option<T>> {
        bundle.get::<T>(&self.name)
    }

    pub fn read_required(&self, bundle: &Bundle) -> PipeResult<T> {
        self.read(bundle)?.ok_or_else(|| PipeError::MissingMessage {
            name: self.name.clone(),
        })
    }

    pub fn attach(&self, bundle: &mut Bundle, value: T) -> bool {
        bundle.insert(&self.name, value)
    }
}
