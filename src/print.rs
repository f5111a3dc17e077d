//! An optional, best-effort bundle-to-text renderer. Out of scope for correctness; kept for
//! parity with the original's `BundlePrinter`, which recursed over a compile-time template pack
//! of probed message types. Rust has no equivalent recursion, so this re-expresses the same idea
//! as a runtime loop over boxed probe closures.

use std::fmt::{self, Write as _};

use crate::accessor::{CanonicalMessage, TypeKeyedAccessor};
use crate::bundle::Bundle;

/// A message type that can be rendered to text by [`BundlePrinter`].
pub trait Printable: CanonicalMessage + fmt::Display {}

impl<T> Printable for T where T: CanonicalMessage + fmt::Display {}

type Probe = Box<dyn Fn(&Bundle, &mut String) -> bool + Send + Sync>;

/// Probes a bundle for a fixed set of message types and renders whichever are present.
#[derive(Default)]
pub struct BundlePrinter {
    probes: Vec<Probe>,
}

impl BundlePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` as a type to probe for.
    pub fn with<T: Printable>(mut self) -> Self {
        self.probes.push(Box::new(|bundle, out| {
            let accessor = TypeKeyedAccessor::<T>::new();
            match accessor.read(bundle) {
                Ok(Some(value)) => {
                    let _ = writeln!(out, "{value}");
                    true
                }
                _ => false,
            }
        }));
        self
    }

    /// Renders every present probed message to a string, one per line. Returns how many were
    /// found.
    pub fn render(&self, bundle: &Bundle) -> (String, usize) {
        let mut out = String::new();
        let mut found = 0;
        for probe in &self.probes {
            if probe(bundle, &mut out) {
                found += 1;
            }
        }
        if found == 0 {
            out.push_str("no message!\n");
        }
        (out, found)
    }
}
