//! Internal event shim.
//!
//! Containers report state transitions through [`spill_trace!`]. With the
//! `tracing` feature enabled the events are forwarded to `tracing::trace!`;
//! without it the macro expands to nothing and the arguments are never
//! evaluated.

#[cfg(feature = "tracing")]
macro_rules! spill_trace {
    ($($arg:tt)+) => {
        ::tracing::trace!(target: "planck_spill", $($arg)+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! spill_trace {
    ($($arg:tt)+) => {};
}
