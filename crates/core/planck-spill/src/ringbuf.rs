//! Fixed-capacity ring buffer that overwrites on overflow.
//!
//! This module provides [`RingBuffer`], a circular buffer of exactly `N`
//! slots. Unlike a queue that rejects pushes once full, a `RingBuffer` evicts
//! an element to make room, which makes it the natural container for "the
//! last N items" (recent log lines, sample windows, input history).
//!
//! # Layout
//!
//! The elements live in a `[MaybeUninit<T>; N]` array. `head` is the physical
//! slot of the oldest element and logical position `i` maps to physical slot
//! `(head + i) % N`. The physical array is therefore a rotated view of the
//! logical sequence; [`RingBuffer::as_slices`] returns it in logical order as
//! two contiguous parts.
//!
//! # States
//!
//! A buffer is either *not full* (`len < N`) or *full* (`len == N`). Every
//! push on a not-full buffer grows it by one. Every push on a full buffer
//! evicts exactly one element and returns it, so a full buffer stays full for
//! the rest of its life.
//!
//! # Performance
//!
//! - `push_back`/`push_front`: O(1), never allocates
//! - Indexing: O(1)
//! - Construction from an iterator: O(n)
//!
//! # Examples
//!
//! ```
//! use planck_spill::ringbuf::RingBuffer;
//!
//! let mut recent = RingBuffer::<u32, 3>::new();
//! for sample in 1..=5 {
//!     recent.push_back(sample);
//! }
//!
//! assert!(recent.is_full());
//! assert_eq!(recent.front(), Some(&3));
//! assert_eq!(recent.back(), Some(&5));
//! assert_eq!(recent.iter().sum::<u32>(), 12);
//! ```

use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::mem::{self, ManuallyDrop, MaybeUninit};
use core::ops::{Index, IndexMut};
use core::{fmt, ptr, slice};

use crate::error::Error;

/// A circular buffer holding at most `N` elements.
///
/// Pushing onto a full buffer overwrites the element at the opposite end:
/// [`push_back`](RingBuffer::push_back) evicts the oldest element and
/// [`push_front`](RingBuffer::push_front) evicts the newest.
///
/// # Type Parameters
///
/// - `T`: The type of elements stored
/// - `N`: The fixed capacity. Must be non-zero; `RingBuffer<T, 0>` fails to
///   compile when constructed.
///
/// # Examples
///
/// ```
/// use planck_spill::ringbuf::RingBuffer;
///
/// let ring = RingBuffer::<i32, 5>::from([1, 2, 3, 4, 5, 6]);
/// assert_eq!(ring.len(), 5);
/// assert_eq!(ring.at(0), Ok(&2));
/// assert_eq!(ring.at(4), Ok(&6));
/// assert!(ring.at(5).is_err());
/// ```
pub struct RingBuffer<T, const N: usize> {
    slots: [MaybeUninit<T>; N],
    head: usize,
    len: usize,
}

impl<T, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> RingBuffer<T, N> {
    /// The fixed number of elements the buffer can hold.
    pub const CAPACITY: usize = N;

    /// Creates an empty ring buffer.
    ///
    /// This method does not allocate memory.
    ///
    /// # Example
    /// ```
    /// use planck_spill::ringbuf::RingBuffer;
    ///
    /// let ring = RingBuffer::<u8, 8>::new();
    /// assert!(ring.is_empty());
    /// assert_eq!(ring.capacity(), 8);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        const { assert!(N > 0, "RingBuffer capacity must be non-zero") };
        Self {
            slots: [const { MaybeUninit::uninit() }; N],
            head: 0,
            len: 0,
        }
    }

    /// Returns the number of elements in the buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true once the buffer holds `N` elements. Further pushes evict.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// Returns the fixed capacity `N`.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    const fn physical(&self, index: usize) -> usize {
        (self.head + index) % N
    }

    /// Appends `value` as the newest element.
    ///
    /// If the buffer is full the oldest element is evicted and returned.
    ///
    /// # Example
    /// ```
    /// use planck_spill::ringbuf::RingBuffer;
    ///
    /// let mut ring = RingBuffer::<i32, 5>::from([1, 2, 3, 4, 5]);
    /// assert_eq!(ring.push_back(6), Some(1));
    /// assert_eq!(ring.at(0), Ok(&2));
    /// assert_eq!(ring.at(4), Ok(&6));
    /// ```
    pub fn push_back(&mut self, value: T) -> Option<T> {
        if self.len < N {
            let slot = self.physical(self.len);
            self.slots[slot].write(value);
            self.len += 1;
            self.note_if_full();
            return None;
        }

        // SAFETY: The buffer is full, so every slot is initialized. `head`
        // holds the oldest element.
        let oldest = unsafe { self.slots[self.head].assume_init_mut() };
        let evicted = mem::replace(oldest, value);
        self.head = (self.head + 1) % N;
        Some(evicted)
    }

    /// Prepends `value` as the oldest element.
    ///
    /// If the buffer is full the newest element is evicted and returned.
    ///
    /// # Example
    /// ```
    /// use planck_spill::ringbuf::RingBuffer;
    ///
    /// let mut ring = RingBuffer::<i32, 5>::from([1, 2, 3, 4, 5]);
    /// assert_eq!(ring.push_front(6), Some(5));
    /// assert_eq!(ring.at(0), Ok(&6));
    /// assert_eq!(ring.at(4), Ok(&4));
    /// ```
    pub fn push_front(&mut self, value: T) -> Option<T> {
        // The slot before `head` is free when not full, and holds the newest
        // element when full.
        let slot = (self.head + N - 1) % N;
        self.head = slot;

        if self.len < N {
            self.slots[slot].write(value);
            self.len += 1;
            self.note_if_full();
            return None;
        }

        // SAFETY: The buffer is full, so every slot is initialized.
        let newest = unsafe { self.slots[slot].assume_init_mut() };
        Some(mem::replace(newest, value))
    }

    fn note_if_full(&self) {
        if self.len == N {
            spill_trace!(capacity = N, "ring buffer full, further pushes evict");
        }
    }

    /// Returns a reference to the element at logical position `index`
    /// (0 is the oldest), or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            // SAFETY: Logical positions below `len` map to initialized slots.
            Some(unsafe { self.slots[self.physical(index)].assume_init_ref() })
        } else {
            None
        }
    }

    /// Returns a mutable reference to the element at logical position
    /// `index`, or `None` if out of bounds.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            let slot = self.physical(index);
            // SAFETY: Logical positions below `len` map to initialized slots.
            Some(unsafe { self.slots[slot].assume_init_mut() })
        } else {
            None
        }
    }

    /// Returns a reference to the element at logical position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `index >= self.len()`.
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        self.get(index)
            .ok_or_else(|| Error::out_of_range(index, self.len))
    }

    /// Returns a mutable reference to the element at logical position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `index >= self.len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len;
        self.get_mut(index).ok_or_else(|| Error::out_of_range(index, len))
    }

    /// Returns a reference to the element at logical position `index` without
    /// bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`RingBuffer::len`]. This is checked with a
    /// debug assertion only.
    #[must_use]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "index out of bounds");
        // SAFETY: The caller guarantees the slot is initialized.
        unsafe { self.slots.get_unchecked(self.physical(index)).assume_init_ref() }
    }

    /// Returns a mutable reference to the element at logical position `index`
    /// without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`RingBuffer::len`]. This is checked with a
    /// debug assertion only.
    #[must_use]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "index out of bounds");
        let slot = self.physical(index);
        // SAFETY: The caller guarantees the slot is initialized.
        unsafe { self.slots.get_unchecked_mut(slot).assume_init_mut() }
    }

    /// Returns the oldest element, or `None` if empty.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a mutable reference to the oldest element, or `None` if empty.
    #[must_use]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns the newest element, or `None` if empty.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Returns a mutable reference to the newest element, or `None` if empty.
    #[must_use]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let last = self.len.checked_sub(1)?;
        self.get_mut(last)
    }

    /// Returns the logical sequence as two contiguous slices.
    ///
    /// The first slice starts with the oldest element. The second slice is
    /// empty unless the sequence wraps around the end of the backing array.
    ///
    /// # Example
    /// ```
    /// use planck_spill::ringbuf::RingBuffer;
    ///
    /// let mut ring = RingBuffer::<i32, 3>::from([1, 2, 3]);
    /// ring.push_back(4);
    /// assert_eq!(ring.as_slices(), (&[2, 3][..], &[4][..]));
    /// ```
    #[must_use]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let first_len = self.len.min(N - self.head);
        let base = self.slots.as_ptr().cast::<T>();
        // SAFETY: Slots `head..head + first_len` and `0..len - first_len` are
        // the initialized logical ranges and do not overlap.
        unsafe {
            (
                slice::from_raw_parts(base.add(self.head), first_len),
                slice::from_raw_parts(base, self.len - first_len),
            )
        }
    }

    /// Returns the logical sequence as two contiguous mutable slices.
    #[must_use]
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let first_len = self.len.min(N - self.head);
        let second_len = self.len - first_len;
        let (wrapped, tail) = self.slots.split_at_mut(self.head);
        // SAFETY: See `as_slices`. `second_len <= head` because the sequence
        // only wraps once it has filled `head..N`.
        unsafe {
            (
                slice::from_raw_parts_mut(tail.as_mut_ptr().cast::<T>(), first_len),
                slice::from_raw_parts_mut(wrapped.as_mut_ptr().cast::<T>(), second_len),
            )
        }
    }

    /// Rotates the backing array so the oldest element sits in slot 0, and
    /// returns the elements as a single slice.
    ///
    /// # Example
    /// ```
    /// use planck_spill::ringbuf::RingBuffer;
    ///
    /// let mut ring = RingBuffer::<i32, 3>::from([1, 2, 3]);
    /// ring.push_back(4);
    /// assert_eq!(ring.make_contiguous(), &[2, 3, 4]);
    /// ```
    pub fn make_contiguous(&mut self) -> &mut [T] {
        self.slots.rotate_left(self.head);
        self.head = 0;
        // SAFETY: After the rotation logical position `i` lives in slot `i`,
        // so slots `0..len` are initialized.
        unsafe { slice::from_raw_parts_mut(self.slots.as_mut_ptr().cast::<T>(), self.len) }
    }

    /// Returns a pointer to the physical backing array.
    ///
    /// The array is a rotated view of the logical sequence: the oldest
    /// element is not necessarily at offset 0, and slots past `len()` may be
    /// uninitialized when the buffer is not full.
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.slots.as_ptr().cast::<T>()
    }

    /// Returns a mutable pointer to the physical backing array.
    ///
    /// See [`RingBuffer::as_ptr`] for the layout caveats.
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.slots.as_mut_ptr().cast::<T>()
    }

    /// Returns an iterator over the elements from oldest to newest.
    pub fn iter(&self) -> Iter<'_, T> {
        let (front, back) = self.as_slices();
        Iter {
            front: front.iter(),
            back: back.iter(),
        }
    }

    /// Returns an iterator that allows modifying each element, from oldest to
    /// newest.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (front, back) = self.as_mut_slices();
        IterMut {
            front: front.iter_mut(),
            back: back.iter_mut(),
        }
    }
}

impl<T: Clone, const N: usize> RingBuffer<T, N> {
    /// Creates a ring buffer from clones of `items`, keeping only the last `N`.
    #[must_use]
    pub fn from_slice(items: &[T]) -> Self {
        let start = items.len().saturating_sub(N);
        items[start..].iter().cloned().collect()
    }
}

impl<T, const N: usize> Drop for RingBuffer<T, N> {
    fn drop(&mut self) {
        let (front, back) = self.as_mut_slices();
        // SAFETY: Both slices cover initialized elements exactly once and are
        // not accessed again.
        unsafe {
            ptr::drop_in_place(front);
            ptr::drop_in_place(back);
        }
    }
}

impl<T, const N: usize> Index<usize> for RingBuffer<T, N> {
    type Output = T;

    /// Returns a reference to the element at the given logical position.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    fn index(&self, index: usize) -> &Self::Output {
        assert!(index < self.len, "index out of bounds");
        // SAFETY: Bounds checked above.
        unsafe { self.get_unchecked(index) }
    }
}

impl<T, const N: usize> IndexMut<usize> for RingBuffer<T, N> {
    /// Returns a mutable reference to the element at the given logical
    /// position.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        assert!(index < self.len, "index out of bounds");
        // SAFETY: Bounds checked above.
        unsafe { self.get_unchecked_mut(index) }
    }
}

impl<T, const N: usize> Extend<T> for RingBuffer<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a, const N: usize> Extend<&'a T> for RingBuffer<T, N> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const N: usize> FromIterator<T> for RingBuffer<T, N> {
    /// Collects the iterator, keeping only the last `N` elements.
    ///
    /// The retained elements occupy the backing array in logical order,
    /// starting at slot 0.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ring = Self::new();
        ring.extend(iter);
        ring.make_contiguous();
        ring
    }
}

impl<T, const N: usize, const M: usize> From<[T; M]> for RingBuffer<T, N> {
    fn from(items: [T; M]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Clone, const N: usize> Clone for RingBuffer<T, N> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for RingBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U, const N: usize, const M: usize> PartialEq<RingBuffer<U, M>> for RingBuffer<T, N>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &RingBuffer<U, M>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T, U, const N: usize> PartialEq<[U]> for RingBuffer<T, N>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.len == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, U, const N: usize, const M: usize> PartialEq<[U; M]> for RingBuffer<T, N>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; M]) -> bool {
        *self == other[..]
    }
}

impl<T: Eq, const N: usize> Eq for RingBuffer<T, N> {}

impl<T: Hash, const N: usize> Hash for RingBuffer<T, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for item in self {
            item.hash(state);
        }
    }
}

/// Immutable iterator over a [`RingBuffer`], created by [`RingBuffer::iter`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    front: slice::Iter<'a, T>,
    back: slice::Iter<'a, T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.front.next().or_else(|| self.back.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.back.next_back().or_else(|| self.front.next_back())
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable iterator over a [`RingBuffer`], created by
/// [`RingBuffer::iter_mut`].
#[derive(Debug)]
pub struct IterMut<'a, T> {
    front: slice::IterMut<'a, T>,
    back: slice::IterMut<'a, T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.front.next().or_else(|| self.back.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.back.next_back().or_else(|| self.front.next_back())
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator over a [`RingBuffer`], created by its [`IntoIterator`]
/// implementation.
pub struct IntoIter<T, const N: usize> {
    slots: [MaybeUninit<T>; N],
    // Physical slot of the next element from the front.
    head: usize,
    remaining: usize,
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: `head` is initialized while elements remain, and is read
        // exactly once because `head` advances past it.
        let value = unsafe { self.slots[self.head].assume_init_read() };
        self.head = (self.head + 1) % N;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, const N: usize> DoubleEndedIterator for IntoIter<T, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let slot = (self.head + self.remaining) % N;
        // SAFETY: The last remaining element is initialized, and is read
        // exactly once because `remaining` shrinks past it.
        Some(unsafe { self.slots[slot].assume_init_read() })
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {}

impl<T, const N: usize> FusedIterator for IntoIter<T, N> {}

impl<T, const N: usize> fmt::Debug for IntoIter<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

impl<T, const N: usize> Drop for IntoIter<T, N> {
    fn drop(&mut self) {
        for _ in self.by_ref() {}
    }
}

impl<T, const N: usize> IntoIterator for RingBuffer<T, N> {
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so ownership of the initialized
        // slots moves to the iterator.
        let slots = unsafe { ptr::read(&this.slots) };
        IntoIter {
            slots,
            head: this.head,
            remaining: this.len,
        }
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a RingBuffer<T, N> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut RingBuffer<T, N> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
