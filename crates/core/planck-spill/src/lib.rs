//! Inline-first containers that keep small collections off the heap.
//!
//! This crate provides two generic containers whose storage lives inside the
//! container object itself. They are meant for hot paths where a heap
//! allocation per collection is too expensive, but where the element count is
//! usually (or always) bounded.
//!
//! # Overview
//!
//! - [`buffer::HybridBuffer`] - A growable sequence with `N` inline slots. The
//!   first `N` elements never touch the heap; anything beyond that spills into
//!   an overflow `Vec`.
//! - [`ringbuf::RingBuffer`] - A circular buffer of exactly `N` slots that
//!   overwrites its oldest element once full ("keep the last N items").
//!
//! Both containers:
//! - Are generic over the element type and a compile-time capacity
//! - Do not require `T: Default` or `T: Clone` for their core operations
//! - Offer a checked accessor (`at`) returning [`Error::OutOfRange`], a
//!   panicking `Index` impl, and an `unsafe` unchecked accessor
//! - Work in `no_std` environments that provide `alloc`
//!
//! # Examples
//!
//! ## Using `HybridBuffer`
//!
//! ```
//! use planck_spill::buffer::HybridBuffer;
//!
//! let mut buf = HybridBuffer::<i32, 2>::from([1, 2]);
//! assert!(!buf.is_spilled());
//!
//! buf.push(3);
//! assert!(buf.is_spilled());
//! assert_eq!(buf.inline_slice(), &[1, 2]);
//! assert_eq!(buf.overflow_slice(), &[3]);
//! assert_eq!(buf.at(2), Ok(&3));
//! ```
//!
//! ## Using `RingBuffer`
//!
//! ```
//! use planck_spill::ringbuf::RingBuffer;
//!
//! let mut ring = RingBuffer::<i32, 3>::new();
//! ring.push_back(1);
//! ring.push_back(2);
//! ring.push_back(3);
//!
//! // Full: the oldest element is evicted.
//! assert_eq!(ring.push_back(4), Some(1));
//! assert_eq!(ring.iter().copied().collect::<Vec<_>>(), [2, 3, 4]);
//! ```
//!
//! # Features
//!
//! - `std` (default): Enables the unit test modules
//! - `tracing`: Emits `tracing` events when a buffer spills to the heap or a
//!   ring buffer becomes full
//!
//! # Thread safety
//!
//! Neither container synchronizes access. They are `Send`/`Sync` exactly when
//! `T` is, like the standard collections.

#![no_std]

extern crate alloc;

#[macro_use]
mod trace;

pub mod buffer;
pub mod error;
pub mod ringbuf;

pub use buffer::HybridBuffer;
pub use error::Error;
pub use ringbuf::RingBuffer;
