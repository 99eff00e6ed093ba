//! Opaque client handle for the linkstack engine boundary.
//!
//! Host processes that embed linkstack across a library seam hold a
//! [`Client`] without seeing any engine internals. The factory is the whole
//! surface: one call, one new handle, one initialization side effect.
//!
//! Initialization is a pluggable [`Initializer`] rather than a hard-coded
//! external symbol, so hosts can substitute a no-op (or a counter) in tests.

use tracing::info;

/// Zero-argument initialization hook run once per factory call.
///
/// The engine treats this as an opaque collaborator: no arguments, no return
/// value, side effect only. Failures are not caught here; a panicking
/// implementation propagates to the caller.
pub trait Initializer {
    fn run(&self);
}

/// Default initializer with no side effect.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopInitializer;

impl Initializer for NoopInitializer {
    fn run(&self) {}
}

/// Opaque handle returned to callers across the library boundary.
///
/// Carries no observable state: handles from separate factory calls compare
/// equal, but each call produces a new, uniquely owned instance. Nothing is
/// cached or pooled between calls.
#[derive(Debug, PartialEq, Eq)]
pub struct Client {
    _opaque: (),
}

/// Construct a new [`Client`] with the default no-op initializer.
#[must_use]
pub fn new_client() -> Client {
    new_client_with(&NoopInitializer)
}

/// Construct a new [`Client`], running `init` exactly once before returning.
///
/// Ownership of the handle transfers exclusively to the caller.
#[must_use]
pub fn new_client_with(init: &dyn Initializer) -> Client {
    info!("linkstack client bridge online");
    init.run();
    Client { _opaque: () }
}
