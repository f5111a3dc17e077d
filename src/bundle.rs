//! Heterogeneous, name-keyed payload storage.
//!
//! A [`Bundle`] never exposes its map directly outside this crate; the only public doors into it
//! are the accessor types in [`crate::accessor`].

use std::any::Any;
use std::collections::HashMap;

use crate::error::{PipeError, PipeResult};

/// A type-erased payload held in a bundle slot.
///
/// Any `T: Any + Clone + Send + 'static` gets this impl for free; user code never implements it
/// by hand.
pub trait Payload: Any + Send {
    fn as_any(&self) -> &dyn Any;
    fn payload_type_name(&self) -> &'static str;
}

impl<T> Payload for T
where
    T: Any + Clone + Send + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn payload_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// The unit of work that travels through the pipeline.
///
/// A bundle is a name -> payload map with no public read/write API; see [`crate::accessor`].
#[derive(Default)]
pub struct Bundle {
    slots: HashMap<String, Box<dyn Payload>>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub(crate) fn get<T>(&self, name: &str) -> PipeResult<Option<T>>
    where
        T: Clone + 'static,
    {
        match self.slots.get(name) {
            None => Ok(None),
            Some(boxed) => match boxed.as_any().downcast_ref::<T>() {
                Some(value) => Ok(Some(value.clone())),
                None => Err(PipeError::TypeMismatch {
                    name: name.to_string(),
                    expected: std::any::type_name::<T>(),
                    found: boxed.payload_type_name(),
                }),
            },
        }
    }

    pub(crate) fn insert<T>(&mut self, name: &str, value: T) -> bool
    where
        T: Clone + Send + 'static,
    {
        if self.slots.contains_key(name) {
            return false;
        }
        self.slots.insert(name.to_string(), Box::new(value));
        true
    }
}
