#![cfg(feature = "tracing")]
#![allow(missing_docs)]

use std::fmt;
use std::sync::{Arc, Mutex};

use planck_spill::{HybridBuffer, RingBuffer};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};

/// Records the field names of every `planck_spill` event.
#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<Vec<&'static str>>>>,
}

impl Recorder {
    fn events(&self) -> Vec<Vec<&'static str>> {
        self.events.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct FieldNames(Vec<&'static str>);

impl Visit for FieldNames {
    fn record_debug(&mut self, field: &Field, _value: &dyn fmt::Debug) {
        self.0.push(field.name());
    }
}

impl Subscriber for Recorder {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        if event.metadata().target() != "planck_spill" {
            return;
        }
        let mut names = FieldNames::default();
        event.record(&mut names);
        self.events.lock().unwrap().push(names.0);
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

fn recorded(f: impl FnOnce()) -> Vec<Vec<&'static str>> {
    let recorder = Recorder::default();
    tracing::subscriber::with_default(recorder.clone(), f);
    recorder.events()
}

fn assert_single_event(events: &[Vec<&'static str>], fields: &[&str]) {
    assert_eq!(events.len(), 1, "expected exactly one event, got {events:?}");
    for field in fields {
        assert!(events[0].contains(field), "missing field `{field}` in {events:?}");
    }
}

#[test]
fn hybrid_spill_by_push_is_reported_once() {
    let events = recorded(|| {
        let mut buf = HybridBuffer::<u8, 2>::new();
        for i in 0..6 {
            buf.push(i);
        }
        buf.extend([6, 7, 8]);
        assert_eq!(buf.len(), 9);
    });
    assert_single_event(&events, &["inline_capacity", "len"]);
}

#[test]
fn hybrid_spill_by_extend_is_reported_once() {
    let events = recorded(|| {
        let mut buf = HybridBuffer::<u8, 2>::new();
        buf.extend([1, 2, 3, 4]);
        buf.extend([5, 6]);
        buf.push(7);
        assert_eq!(buf.overflow_slice(), &[3, 4, 5, 6, 7]);
    });
    assert_single_event(&events, &["inline_capacity", "len"]);
}

#[test]
fn hybrid_within_inline_capacity_is_silent() {
    let events = recorded(|| {
        let mut buf = HybridBuffer::<u8, 4>::new();
        buf.extend([1, 2, 3, 4]);
        assert!(!buf.is_spilled());
    });
    assert!(events.is_empty(), "unexpected events: {events:?}");
}

#[test]
fn ring_becoming_full_is_reported_once() {
    let events = recorded(|| {
        let mut ring = RingBuffer::<u8, 3>::new();
        for i in 0..10 {
            ring.push_back(i);
        }
        ring.push_front(10);
        assert!(ring.is_full());
    });
    assert_single_event(&events, &["capacity"]);
}

#[test]
fn ring_below_capacity_is_silent() {
    let events = recorded(|| {
        let mut ring = RingBuffer::<u8, 3>::new();
        ring.push_back(1);
        ring.push_front(0);
        assert_eq!(ring.len(), 2);
    });
    assert!(events.is_empty(), "unexpected events: {events:?}");
}
