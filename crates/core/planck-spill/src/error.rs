//! Recoverable errors reported by the containers in this crate.

/// Errors returned by the checked accessors of [`HybridBuffer`] and
/// [`RingBuffer`].
///
/// Only conditions the caller can reasonably handle are reported here.
/// Programming errors, such as indexing past the end with `[]`, panic instead.
///
/// [`HybridBuffer`]: crate::buffer::HybridBuffer
/// [`RingBuffer`]: crate::ringbuf::RingBuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested logical position does not hold an element.
    #[error("index {index} is out of range for length {len}")]
    OutOfRange {
        /// The position that was requested.
        index: usize,
        /// The number of elements in the container at the time of the call.
        len: usize,
    },
}

impl Error {
    pub(crate) const fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }
}
