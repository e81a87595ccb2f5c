//! Feature-gated logging macros.
//!
//! With the `tracing` feature the macros forward to the `tracing` crate.
//! Without it they expand to nothing, so the insert and search paths carry
//! no logging cost in a normal build.
//!
//! ```bash
//! # Log every splice and level change while running the stress tests
//! RUST_LOG=byteskip=trace cargo test --features tracing --test stress_tests
//! ```
//!
//! Public operations are instrumented with
//! `#[cfg_attr(feature = "tracing", tracing::instrument(...))]`, which is
//! likewise a no-op when the feature is off.

#![allow(unused_macros, unused_imports)]

/// Per-operation detail (walks, splices, overwrites).
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Structural events (construction, level growth, teardown).
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
