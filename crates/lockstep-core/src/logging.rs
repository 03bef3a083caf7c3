#![forbid(unsafe_code)]

//! Tracing macro shims.
//!
//! With the `tracing` feature enabled this module re-exports the `tracing`
//! macros. Without it, crate-root no-op macros with the same names compile
//! every call site away. Call sites import unconditionally:
//!
//! ```ignore
//! #[cfg(feature = "tracing")]
//! use crate::logging::trace;
//! #[cfg(not(feature = "tracing"))]
//! use crate::trace;
//! ```

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

/// No-op `trace!` used when the `tracing` feature is disabled.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

/// No-op `debug!` used when the `tracing` feature is disabled.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

/// No-op `warn!` used when the `tracing` feature is disabled.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(test)]
mod tests {
    // The shims only need to expand; there is nothing to observe.
    #[test]
    fn noop_macros_expand_with_any_arguments() {
        #[cfg(feature = "tracing")]
        use crate::logging::{debug, trace, warn};
        #[cfg(not(feature = "tracing"))]
        use crate::{debug, trace, warn};

        let id = 7u64;
        trace!("bare message");
        debug!(field = 1, other = "two", "message {}", 3);
        warn!(id = %id, "display shorthand");
    }
}
