#![allow(missing_docs)]

use planck_spill::{Error, HybridBuffer, RingBuffer};
use rstest::rstest;
use static_assertions::{assert_impl_all, assert_not_impl_any};

assert_impl_all!(HybridBuffer<u32, 4>: Send, Sync, Clone, Default);
assert_impl_all!(RingBuffer<u32, 4>: Send, Sync, Clone, Default);
assert_not_impl_any!(HybridBuffer<std::rc::Rc<u32>, 4>: Send, Sync);
assert_not_impl_any!(RingBuffer<std::cell::Cell<u32>, 4>: Sync);
assert_impl_all!(Error: Send, Sync, Copy, std::error::Error);

// ── HybridBuffer ──────────────────────────────────────────────────────

#[rstest]
#[case::empty(0)]
#[case::partial(2)]
#[case::exactly_inline(4)]
#[case::one_spilled(5)]
#[case::mostly_spilled(19)]
fn hybrid_capacity_split(#[case] len: u32) {
    let items: Vec<u32> = (100..100 + len).collect();
    let buf: HybridBuffer<u32, 4> = items.iter().copied().collect();

    assert_eq!(buf.len(), items.len());
    let inline_len = items.len().min(4);
    assert_eq!(buf.inline_slice(), &items[..inline_len]);
    assert_eq!(buf.overflow_slice(), &items[inline_len..]);
    for (i, expected) in items.iter().enumerate() {
        assert_eq!(buf.at(i), Ok(expected));
    }
}

#[rstest]
#[case::empty(0)]
#[case::inline(3)]
#[case::spilled(9)]
fn hybrid_bounds_checking(#[case] len: usize) {
    let buf = HybridBuffer::<usize, 3>::from_iter(0..len);
    for pos in 0..len {
        assert_eq!(buf.at(pos), Ok(&pos));
    }
    for pos in len..len + 4 {
        assert_eq!(buf.at(pos), Err(Error::OutOfRange { index: pos, len }));
    }
}

#[test]
fn hybrid_serves_tail_from_overflow() {
    let buf = HybridBuffer::<i32, 2>::from([1, 2, 3]);
    assert_eq!(buf.len(), 3);
    assert_eq!(buf.at(2), Ok(&3));
    assert_eq!(buf.overflow_slice(), &[3]);
    assert_eq!(buf.back(), Some(&3));
}

#[test]
fn hybrid_round_trip_within_capacity() {
    let items = [5, 4, 3, 2, 1];
    let buf = HybridBuffer::<i32, 5>::from(items);
    let read_back: Vec<i32> = buf.into_iter().collect();
    assert_eq!(read_back, items);
}

#[test]
fn hybrid_default_is_empty() {
    let buf = HybridBuffer::<i32>::default();
    assert_eq!(buf.len(), 0);
    assert!(buf.is_empty());
    assert!(buf.at(0).is_err());
    assert_eq!(buf.front(), None);
    assert_eq!(buf.back(), None);
}

// ── RingBuffer ────────────────────────────────────────────────────────

#[rstest]
#[case::exactly_full(5)]
#[case::one_over(6)]
#[case::wrapped_twice(12)]
#[case::many(101)]
fn ring_keeps_last_n_pushes(#[case] pushes: i32) {
    let mut ring = RingBuffer::<i32, 5>::new();
    for value in 1..=pushes {
        ring.push_back(value);
    }
    assert_eq!(ring.len(), 5);
    assert_eq!(ring.at(0), Ok(&(pushes - 4)));
    assert_eq!(ring.at(4), Ok(&pushes));
    let expected: Vec<i32> = (pushes - 4..=pushes).collect();
    assert_eq!(ring.iter().copied().collect::<Vec<_>>(), expected);
}

#[test]
fn ring_constructed_over_capacity_drops_oldest() {
    let ring = RingBuffer::<i32, 5>::from([1, 2, 3, 4, 5, 6]);
    assert_eq!(ring, [2, 3, 4, 5, 6]);
    assert_eq!(ring.at(0), Ok(&2));
    assert_eq!(ring.at(4), Ok(&6));
}

#[test]
fn ring_size_grows_then_saturates() {
    let mut ring = RingBuffer::<u8, 4>::new();
    for i in 0..4_u8 {
        assert_eq!(ring.len(), usize::from(i));
        ring.push_back(i);
        assert_eq!(ring.len(), usize::from(i) + 1);
    }
    for i in 4..20_u8 {
        assert_eq!(ring.push_back(i), Some(i - 4));
        assert_eq!(ring.len(), 4);
        assert!(ring.is_full());
    }
}

#[rstest]
#[case::empty(0)]
#[case::partial(3)]
#[case::full(8)]
#[case::over(11)]
fn ring_bounds_checking(#[case] pushes: usize) {
    let ring: RingBuffer<usize, 8> = (0..pushes).collect();
    let len = pushes.min(8);
    assert_eq!(ring.len(), len);
    for pos in 0..len {
        assert!(ring.at(pos).is_ok());
    }
    for pos in len..len + 3 {
        assert_eq!(ring.at(pos), Err(Error::OutOfRange { index: pos, len }));
    }
}

#[test]
fn ring_round_trip_within_capacity() {
    let items = ["alpha", "beta", "gamma"];
    let ring = RingBuffer::<&str, 4>::from(items);
    let read_back: Vec<&str> = ring.iter().copied().collect();
    assert_eq!(read_back, items);
}

#[test]
fn ring_default_is_empty() {
    let ring = RingBuffer::<i32, 3>::default();
    assert_eq!(ring.len(), 0);
    assert!(ring.is_empty());
    assert!(ring.at(0).is_err());
    assert_eq!(ring.front(), None);
    assert_eq!(ring.back(), None);
}

#[test]
fn ring_push_front_then_back() {
    let mut ring = RingBuffer::<i32, 5>::from([1, 2, 3, 4, 5]);
    ring.push_front(6);
    assert_eq!(ring, [6, 1, 2, 3, 4]);
    ring.push_back(7);
    assert_eq!(ring, [1, 2, 3, 4, 7]);
}
