//! Growable buffer with inline storage that spills to the heap.
//!
//! This module provides [`HybridBuffer`], a sequence container that stores its
//! first `N` elements inline in the container object and only allocates once
//! more than `N` elements are appended. It is intended for collections that
//! are *usually* small but must not fail when they are not.
//!
//! # Storage layout
//!
//! The buffer is made of two segments:
//!
//! - the inline segment, a `[MaybeUninit<T>; N]` array embedded in the object
//! - the overflow segment, a `Vec<T>` that stays empty (and unallocated) until
//!   the inline segment is full
//!
//! Logical position `i` lives in the inline segment when `i < N` and at
//! `i - N` in the overflow segment otherwise. The two segments are not
//! contiguous, so there is no single slice covering the whole buffer; use
//! [`HybridBuffer::as_slices`] or iterate instead.
//!
//! # Growth
//!
//! The buffer is append-only. Elements are added with [`HybridBuffer::push`]
//! or [`Extend`], and are only removed when the buffer is dropped or consumed
//! by value.
//!
//! # Examples
//!
//! ```
//! use planck_spill::buffer::HybridBuffer;
//!
//! let mut buf = HybridBuffer::<u32, 4>::new();
//! buf.extend([1, 2, 3]);
//! assert!(!buf.is_spilled());
//!
//! buf.extend([4, 5]);
//! assert!(buf.is_spilled());
//! assert_eq!(buf.len(), 5);
//! assert_eq!(buf.as_slices(), (&[1, 2, 3, 4][..], &[5][..]));
//!
//! let doubled: Vec<u32> = buf.iter().map(|x| x * 2).collect();
//! assert_eq!(doubled, [2, 4, 6, 8, 10]);
//! ```

use alloc::vec::Vec;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::mem::{self, ManuallyDrop, MaybeUninit};
use core::ops::{Index, IndexMut};
use core::{fmt, ptr, slice};

use crate::error::Error;

/// Inline capacity used when none is given.
pub const DEFAULT_INLINE_CAPACITY: usize = 16;

/// A growable sequence whose first `N` elements are stored inline.
///
/// # Type Parameters
///
/// - `T`: The type of elements stored in the buffer
/// - `N`: The number of elements stored inline before spilling to the heap
///
/// # Examples
///
/// ```
/// use planck_spill::buffer::HybridBuffer;
///
/// let buf = HybridBuffer::<i32, 2>::from([1, 2, 3]);
/// assert_eq!(buf.len(), 3);
/// assert_eq!(buf.at(0), Ok(&1));
/// assert_eq!(buf.at(2), Ok(&3));
/// assert!(buf.at(3).is_err());
///
/// // `2` fits inline, `3` was served from the heap.
/// assert_eq!(buf.inline_slice(), &[1, 2]);
/// assert_eq!(buf.overflow_slice(), &[3]);
/// ```
pub struct HybridBuffer<T, const N: usize = DEFAULT_INLINE_CAPACITY> {
    inline: [MaybeUninit<T>; N],
    inline_len: usize,
    overflow: Vec<T>,
}

impl<T, const N: usize> Default for HybridBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> HybridBuffer<T, N> {
    /// The number of elements stored inline before the buffer spills.
    pub const INLINE_CAPACITY: usize = N;

    /// Creates an empty buffer.
    ///
    /// This does not allocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use planck_spill::buffer::HybridBuffer;
    ///
    /// let buf = HybridBuffer::<u8>::new();
    /// assert!(buf.is_empty());
    /// assert_eq!(buf.inline_capacity(), 16);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inline: [const { MaybeUninit::uninit() }; N],
            inline_len: 0,
            overflow: Vec::new(),
        }
    }

    /// Appends an element to the back of the buffer.
    ///
    /// The element is stored inline while there is room, otherwise it is
    /// appended to the overflow segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use planck_spill::buffer::HybridBuffer;
    ///
    /// let mut buf = HybridBuffer::<u8, 1>::new();
    /// buf.push(1);
    /// assert!(!buf.is_spilled());
    /// buf.push(2);
    /// assert!(buf.is_spilled());
    /// assert_eq!(buf.back(), Some(&2));
    /// ```
    pub fn push(&mut self, value: T) {
        if self.inline_len < N {
            self.inline[self.inline_len].write(value);
            self.inline_len += 1;
            return;
        }

        if self.overflow.is_empty() {
            spill_trace!(
                inline_capacity = N,
                len = self.len() + 1,
                "inline storage exhausted, spilling to heap"
            );
        }
        self.overflow.push(value);
    }

    /// Returns the number of elements in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inline_len + self.overflow.len()
    }

    /// Returns true if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the inline capacity `N`.
    #[must_use]
    pub const fn inline_capacity(&self) -> usize {
        N
    }

    /// Returns true once elements have been stored in the overflow segment.
    #[must_use]
    pub fn is_spilled(&self) -> bool {
        !self.overflow.is_empty()
    }

    /// Returns the largest number of elements the buffer could theoretically
    /// hold.
    #[must_use]
    pub fn max_len(&self) -> usize {
        let overflow_max = match size_of::<T>() {
            0 => usize::MAX,
            size => isize::MAX.unsigned_abs() / size,
        };
        N.saturating_add(overflow_max)
    }

    /// Returns a reference to the element at `index`, or `None` if out of
    /// bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < N {
            self.inline_slice().get(index)
        } else {
            self.overflow.get(index - N)
        }
    }

    /// Returns a mutable reference to the element at `index`, or `None` if out
    /// of bounds.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < N {
            self.inline_slice_mut().get_mut(index)
        } else {
            self.overflow.get_mut(index - N)
        }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `index >= self.len()`. The buffer is
    /// left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use planck_spill::{Error, buffer::HybridBuffer};
    ///
    /// let buf = HybridBuffer::<i32>::from([1, 2, 3]);
    /// assert_eq!(buf.at(2), Ok(&3));
    /// assert_eq!(buf.at(3), Err(Error::OutOfRange { index: 3, len: 3 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        let len = self.len();
        self.get(index).ok_or_else(|| Error::out_of_range(index, len))
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `index >= self.len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len();
        self.get_mut(index).ok_or_else(|| Error::out_of_range(index, len))
    }

    /// Returns a reference to the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`HybridBuffer::len`]. This is checked with a
    /// debug assertion only.
    #[must_use]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len(), "index out of bounds");
        if index < N {
            // SAFETY: The caller guarantees `index < len`, and inline slots
            // below `inline_len` are initialized. Since `index < N`, either
            // `index < inline_len` or the overflow is empty and `len == inline_len`.
            unsafe { self.inline.get_unchecked(index).assume_init_ref() }
        } else {
            // SAFETY: `index >= N` and `index < len` imply the element is in
            // the overflow segment at `index - N`.
            unsafe { self.overflow.get_unchecked(index - N) }
        }
    }

    /// Returns a mutable reference to the element at `index` without bounds
    /// checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`HybridBuffer::len`]. This is checked with a
    /// debug assertion only.
    #[must_use]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len(), "index out of bounds");
        if index < N {
            // SAFETY: See `get_unchecked`.
            unsafe { self.inline.get_unchecked_mut(index).assume_init_mut() }
        } else {
            // SAFETY: See `get_unchecked`.
            unsafe { self.overflow.get_unchecked_mut(index - N) }
        }
    }

    /// Returns the first element, or `None` if empty.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a mutable reference to the first element, or `None` if empty.
    #[must_use]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns the last element, or `None` if empty.
    ///
    /// The last element lives in the overflow segment once the buffer has
    /// spilled, and in the inline segment before that.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        if self.overflow.is_empty() {
            self.inline_slice().last()
        } else {
            self.overflow.last()
        }
    }

    /// Returns a mutable reference to the last element, or `None` if empty.
    #[must_use]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.overflow.is_empty() {
            self.inline_slice_mut().last_mut()
        } else {
            self.overflow.last_mut()
        }
    }

    /// Returns the elements held in inline storage.
    #[must_use]
    pub fn inline_slice(&self) -> &[T] {
        // SAFETY: Slots 0..inline_len are initialized by the push invariant,
        // and `MaybeUninit<T>` has the same layout as `T`.
        unsafe { slice::from_raw_parts(self.inline.as_ptr().cast::<T>(), self.inline_len) }
    }

    /// Returns the elements held in inline storage, mutably.
    #[must_use]
    pub fn inline_slice_mut(&mut self) -> &mut [T] {
        // SAFETY: See `inline_slice`.
        unsafe { slice::from_raw_parts_mut(self.inline.as_mut_ptr().cast::<T>(), self.inline_len) }
    }

    /// Returns the elements held in the overflow segment.
    ///
    /// This is empty until the buffer has spilled.
    #[must_use]
    pub fn overflow_slice(&self) -> &[T] {
        &self.overflow
    }

    /// Returns the elements held in the overflow segment, mutably.
    #[must_use]
    pub fn overflow_slice_mut(&mut self) -> &mut [T] {
        &mut self.overflow
    }

    /// Returns both segments in logical order: inline first, then overflow.
    #[must_use]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        (self.inline_slice(), self.overflow_slice())
    }

    /// Returns an iterator over the elements in logical order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inline: self.inline_slice().iter(),
            overflow: self.overflow.iter(),
        }
    }

    /// Returns an iterator that allows modifying each element.
    ///
    /// # Examples
    ///
    /// ```
    /// use planck_spill::buffer::HybridBuffer;
    ///
    /// let mut buf = HybridBuffer::<i32, 2>::from([1, 2, 3]);
    /// for x in buf.iter_mut() {
    ///     *x *= 10;
    /// }
    /// assert_eq!(buf, [10, 20, 30]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        // SAFETY: See `inline_slice`. The inline and overflow segments are
        // disjoint fields, so both mutable borrows may coexist.
        let inline =
            unsafe { slice::from_raw_parts_mut(self.inline.as_mut_ptr().cast::<T>(), self.inline_len) };
        IterMut {
            inline: inline.iter_mut(),
            overflow: self.overflow.iter_mut(),
        }
    }
}

impl<T: Clone, const N: usize> HybridBuffer<T, N> {
    /// Creates a buffer holding clones of the elements of `items`, in order.
    #[must_use]
    pub fn from_slice(items: &[T]) -> Self {
        items.iter().cloned().collect()
    }

    /// Creates a buffer holding `count` clones of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use planck_spill::buffer::HybridBuffer;
    ///
    /// let buf = HybridBuffer::<char, 2>::from_elem('x', 3);
    /// assert_eq!(buf, ['x', 'x', 'x']);
    /// assert!(buf.is_spilled());
    /// ```
    #[must_use]
    pub fn from_elem(value: T, count: usize) -> Self {
        core::iter::repeat_n(value, count).collect()
    }
}

impl<T, const N: usize> Drop for HybridBuffer<T, N> {
    fn drop(&mut self) {
        // SAFETY: The inline slice covers exactly the initialized slots, which
        // are not accessed again. The overflow `Vec` drops its own elements.
        unsafe { ptr::drop_in_place(self.inline_slice_mut()) }
    }
}

impl<T, const N: usize> Index<usize> for HybridBuffer<T, N> {
    type Output = T;

    /// Returns a reference to the element at the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    fn index(&self, index: usize) -> &Self::Output {
        assert!(index < self.len(), "index out of bounds");
        // SAFETY: Bounds checked above.
        unsafe { self.get_unchecked(index) }
    }
}

impl<T, const N: usize> IndexMut<usize> for HybridBuffer<T, N> {
    /// Returns a mutable reference to the element at the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        assert!(index < self.len(), "index out of bounds");
        // SAFETY: Bounds checked above.
        unsafe { self.get_unchecked_mut(index) }
    }
}

impl<T, const N: usize> Extend<T> for HybridBuffer<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut iter = iter.into_iter();
        while self.inline_len < N {
            let Some(value) = iter.next() else {
                return;
            };
            self.inline[self.inline_len].write(value);
            self.inline_len += 1;
        }

        let was_spilled = self.is_spilled();
        self.overflow.extend(iter);
        if !was_spilled && self.is_spilled() {
            spill_trace!(
                inline_capacity = N,
                len = self.len(),
                "inline storage exhausted, spilling to heap"
            );
        }
    }
}

impl<'a, T: Copy + 'a, const N: usize> Extend<&'a T> for HybridBuffer<T, N> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const N: usize> FromIterator<T> for HybridBuffer<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = Self::new();
        buf.extend(iter);
        buf
    }
}

impl<T, const N: usize, const M: usize> From<[T; M]> for HybridBuffer<T, N> {
    fn from(items: [T; M]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Clone, const N: usize> Clone for HybridBuffer<T, N> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for HybridBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U, const N: usize, const M: usize> PartialEq<HybridBuffer<U, M>> for HybridBuffer<T, N>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &HybridBuffer<U, M>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, U, const N: usize> PartialEq<[U]> for HybridBuffer<T, N>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, U, const N: usize, const M: usize> PartialEq<[U; M]> for HybridBuffer<T, N>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; M]) -> bool {
        *self == other[..]
    }
}

impl<T: Eq, const N: usize> Eq for HybridBuffer<T, N> {}

impl<T: Hash, const N: usize> Hash for HybridBuffer<T, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self {
            item.hash(state);
        }
    }
}

/// Immutable iterator over a [`HybridBuffer`], created by
/// [`HybridBuffer::iter`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    inline: slice::Iter<'a, T>,
    overflow: slice::Iter<'a, T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inline: self.inline.clone(),
            overflow: self.overflow.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inline.next().or_else(|| self.overflow.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.overflow.next_back().or_else(|| self.inline.next_back())
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inline.len() + self.overflow.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable iterator over a [`HybridBuffer`], created by
/// [`HybridBuffer::iter_mut`].
#[derive(Debug)]
pub struct IterMut<'a, T> {
    inline: slice::IterMut<'a, T>,
    overflow: slice::IterMut<'a, T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inline.next().or_else(|| self.overflow.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.overflow.next_back().or_else(|| self.inline.next_back())
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    fn len(&self) -> usize {
        self.inline.len() + self.overflow.len()
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator over a [`HybridBuffer`], created by its
/// [`IntoIterator`] implementation.
pub struct IntoIter<T, const N: usize> {
    inline: [MaybeUninit<T>; N],
    // Inline slots `front..back` are initialized and not yet yielded.
    front: usize,
    back: usize,
    overflow: alloc::vec::IntoIter<T>,
}

impl<T, const N: usize> IntoIter<T, N> {
    fn remaining_inline(&self) -> &[T] {
        // SAFETY: Slots `front..back` are initialized and owned by the iterator.
        unsafe {
            slice::from_raw_parts(
                self.inline.as_ptr().add(self.front).cast::<T>(),
                self.back - self.front,
            )
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for IntoIter<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter")
            .field(&self.remaining_inline())
            .field(&self.overflow.as_slice())
            .finish()
    }
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            // SAFETY: The slot is initialized and is read exactly once, since
            // `front` moves past it.
            let value = unsafe { self.inline[self.front].assume_init_read() };
            self.front += 1;
            Some(value)
        } else {
            self.overflow.next()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T, const N: usize> DoubleEndedIterator for IntoIter<T, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.overflow.next_back() {
            return Some(value);
        }
        if self.front < self.back {
            self.back -= 1;
            // SAFETY: The slot is initialized and is read exactly once, since
            // `back` moves below it.
            Some(unsafe { self.inline[self.back].assume_init_read() })
        } else {
            None
        }
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {
    fn len(&self) -> usize {
        (self.back - self.front) + self.overflow.len()
    }
}

impl<T, const N: usize> FusedIterator for IntoIter<T, N> {}

impl<T, const N: usize> Drop for IntoIter<T, N> {
    fn drop(&mut self) {
        let remaining = ptr::slice_from_raw_parts_mut(
            // SAFETY: `front <= back <= N`, so the offset stays in bounds.
            unsafe { self.inline.as_mut_ptr().add(self.front).cast::<T>() },
            self.back - self.front,
        );
        // SAFETY: Slots `front..back` are initialized and never read again.
        unsafe { ptr::drop_in_place(remaining) }
    }
}

impl<T, const N: usize> IntoIterator for HybridBuffer<T, N> {
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        let mut this = ManuallyDrop::new(self);
        let overflow = mem::take(&mut this.overflow);
        // SAFETY: `this` is never dropped, so ownership of the initialized
        // inline slots moves to the iterator.
        let inline = unsafe { ptr::read(&this.inline) };
        IntoIter {
            inline,
            front: 0,
            back: this.inline_len,
            overflow: overflow.into_iter(),
        }
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a HybridBuffer<T, N> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut HybridBuffer<T, N> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
