//! Typed simulation events with per-kind ring buffers.
//!
//! The engine emits events while it runs the production stages and delivers
//! them in one batch at the end of the tick. Each event kind has its own
//! [`EventBuffer`], allocated on first emit. Kinds can be suppressed with
//! [`EventBus::suppress`], after which they are never buffered.
//!
//! Listeners are read-only: nothing a listener does can change the tick that
//! produced the event.

use crate::factory::{FactoryKind, StallReason};
use crate::fixed::Ticks;
use crate::hex::AxialCoord;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A simulation event. All events carry the tick at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // -- Grid --
    FactoryPlaced {
        coord: AxialCoord,
        kind: FactoryKind,
        tick: Ticks,
    },
    FactoryRemoved {
        coord: AxialCoord,
        kind: FactoryKind,
        tick: Ticks,
    },

    // -- Production --
    ItemProduced {
        coord: AxialCoord,
        item: String,
        quantity: u64,
        tick: Ticks,
    },
    ItemConsumed {
        coord: AxialCoord,
        item: String,
        quantity: u64,
        tick: Ticks,
    },
    FactoryStalled {
        coord: AxialCoord,
        reason: StallReason,
        tick: Ticks,
    },

    // -- Clock --
    TickCompleted {
        tick: Ticks,
    },
}

/// Discriminant tag for event types, used for suppression and subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FactoryPlaced,
    FactoryRemoved,
    ItemProduced,
    ItemConsumed,
    FactoryStalled,
    TickCompleted,
}

const EVENT_KIND_COUNT: usize = 6;

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::FactoryPlaced { .. } => EventKind::FactoryPlaced,
            Event::FactoryRemoved { .. } => EventKind::FactoryRemoved,
            Event::ItemProduced { .. } => EventKind::ItemProduced,
            Event::ItemConsumed { .. } => EventKind::ItemConsumed,
            Event::FactoryStalled { .. } => EventKind::FactoryStalled,
            Event::TickCompleted { .. } => EventKind::TickCompleted,
        }
    }

    pub fn tick(&self) -> Ticks {
        match self {
            Event::FactoryPlaced { tick, .. }
            | Event::FactoryRemoved { tick, .. }
            | Event::ItemProduced { tick, .. }
            | Event::ItemConsumed { tick, .. }
            | Event::FactoryStalled { tick, .. }
            | Event::TickCompleted { tick } => *tick,
        }
    }
}

impl EventKind {
    pub fn all() -> [EventKind; EVENT_KIND_COUNT] {
        [
            EventKind::FactoryPlaced,
            EventKind::FactoryRemoved,
            EventKind::ItemProduced,
            EventKind::ItemConsumed,
            EventKind::FactoryStalled,
            EventKind::TickCompleted,
        ]
    }

    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBuffer
// ---------------------------------------------------------------------------

/// Fixed-capacity ring buffer. When full, the oldest event is dropped.
#[derive(Debug)]
pub struct EventBuffer {
    events: Vec<Option<Event>>,
    /// Next write position.
    head: usize,
    len: usize,
    /// Total events ever written, dropped ones included.
    total_written: u64,
    /// Events overwritten before anyone read them.
    dropped: u64,
}

impl EventBuffer {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            total_written: 0,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: Event) {
        if self.len == self.capacity() {
            self.dropped += 1;
        } else {
            self.len += 1;
        }
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % self.capacity();
        self.total_written += 1;
    }

    pub fn capacity(&self) -> usize {
        self.events.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Events lost to overwrites since the buffer was created. Clearing
    /// does not reset it.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Events from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        let start = if self.len < self.capacity() {
            0
        } else {
            self.head
        };
        let capacity = self.capacity();
        (0..self.len).filter_map(move |offset| self.events[(start + offset) % capacity].as_ref())
    }

    pub fn clear(&mut self) {
        self.events.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// A read-only event listener.
pub type PassiveListener = Box<dyn FnMut(&Event)>;

/// One lazily allocated ring buffer per event kind, plus listeners and
/// suppression flags.
pub struct EventBus {
    buffers: [Option<EventBuffer>; EVENT_KIND_COUNT],
    suppressed: [bool; EVENT_KIND_COUNT],
    listeners: [Vec<PassiveListener>; EVENT_KIND_COUNT],
    capacity: usize,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("buffers", &self.buffers)
            .field("suppressed", &self.suppressed)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// `capacity` is the ring size used for every event kind.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: Default::default(),
            suppressed: [false; EVENT_KIND_COUNT],
            listeners: Default::default(),
            capacity,
        }
    }

    /// Stop recording a kind and free its buffer.
    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
        self.buffers[kind.index()] = None;
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Buffer an event. No-op for suppressed kinds.
    pub fn emit(&mut self, event: Event) {
        let idx = event.kind().index();
        if self.suppressed[idx] {
            return;
        }
        let capacity = self.capacity;
        self.buffers[idx]
            .get_or_insert_with(|| EventBuffer::new(capacity))
            .push(event);
    }

    /// Register a listener for one kind. Listeners run in registration order.
    pub fn on_passive(&mut self, kind: EventKind, listener: PassiveListener) {
        self.listeners[kind.index()].push(listener);
    }

    /// Hand every buffered event to its listeners, then clear the buffers.
    ///
    /// Kinds are delivered in [`EventKind`] declaration order; within a kind,
    /// oldest first.
    pub fn deliver(&mut self) {
        for idx in 0..EVENT_KIND_COUNT {
            if self.suppressed[idx] {
                continue;
            }
            let Some(buffer) = self.buffers[idx].as_mut() else {
                continue;
            };
            if buffer.is_empty() {
                continue;
            }

            let events: Vec<Event> = buffer.iter().cloned().collect();
            buffer.clear();

            for listener in &mut self.listeners[idx] {
                for event in &events {
                    listener(event);
                }
            }
        }
    }

    pub fn buffer(&self, kind: EventKind) -> Option<&EventBuffer> {
        self.buffers[kind.index()].as_ref()
    }

    pub fn buffered_count(&self, kind: EventKind) -> usize {
        self.buffer(kind).map_or(0, EventBuffer::len)
    }

    /// Events ever emitted for a kind, dropped ones included.
    pub fn total_emitted(&self, kind: EventKind) -> u64 {
        self.buffer(kind).map_or(0, EventBuffer::total_written)
    }

    /// Clear every buffer. Listeners and suppression stay.
    pub fn clear_all(&mut self) {
        for buffer in self.buffers.iter_mut().flatten() {
            buffer.clear();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn produced(tick: Ticks) -> Event {
        Event::ItemProduced {
            coord: AxialCoord::ORIGIN,
            item: "iron_ore".into(),
            quantity: 1,
            tick,
        }
    }

    #[test]
    fn ring_buffer_drops_oldest() {
        let mut buf = EventBuffer::new(3);
        for tick in 1..=5 {
            buf.push(produced(tick));
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.total_written(), 5);
        assert_eq!(buf.dropped_count(), 2);
        let ticks: Vec<Ticks> = buf.iter().map(Event::tick).collect();
        assert_eq!(ticks, vec![3, 4, 5]);
    }

    #[test]
    fn cleared_buffer_only_counts_real_overwrites() {
        let mut buf = EventBuffer::new(4);
        for round in 0..10 {
            for tick in 0..3 {
                buf.push(produced(round * 3 + tick));
            }
            buf.clear();
        }
        assert_eq!(buf.total_written(), 30);
        assert_eq!(buf.dropped_count(), 0);

        for tick in 0..6 {
            buf.push(produced(tick));
        }
        assert_eq!(buf.dropped_count(), 2);
        buf.clear();
        assert_eq!(buf.dropped_count(), 2);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut buf = EventBuffer::new(0);
        buf.push(produced(1));
        buf.push(produced(2));
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.iter().next().map(Event::tick), Some(2));
    }

    #[test]
    fn emit_buffers_by_kind() {
        let mut bus = EventBus::new(16);
        bus.emit(produced(1));
        bus.emit(Event::TickCompleted { tick: 1 });
        assert_eq!(bus.buffered_count(EventKind::ItemProduced), 1);
        assert_eq!(bus.buffered_count(EventKind::TickCompleted), 1);
        assert_eq!(bus.buffered_count(EventKind::ItemConsumed), 0);
        assert!(bus.buffer(EventKind::ItemConsumed).is_none());
    }

    #[test]
    fn suppressed_kinds_are_not_recorded() {
        let mut bus = EventBus::new(16);
        bus.suppress(EventKind::ItemProduced);
        bus.emit(produced(1));
        assert!(bus.is_suppressed(EventKind::ItemProduced));
        assert_eq!(bus.total_emitted(EventKind::ItemProduced), 0);
    }

    #[test]
    fn deliver_reaches_listeners_and_clears() {
        let mut bus = EventBus::new(16);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.on_passive(
            EventKind::ItemProduced,
            Box::new(move |e| sink.borrow_mut().push(e.tick())),
        );

        bus.emit(produced(1));
        bus.emit(produced(2));
        bus.emit(Event::TickCompleted { tick: 2 });
        bus.deliver();

        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(bus.buffered_count(EventKind::ItemProduced), 0);
        assert_eq!(bus.buffered_count(EventKind::TickCompleted), 0);
        assert_eq!(bus.total_emitted(EventKind::ItemProduced), 2);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let mut bus = EventBus::new(4);
        let order = Rc::new(RefCell::new(Vec::new()));
        for id in 0..3 {
            let sink = Rc::clone(&order);
            bus.on_passive(
                EventKind::TickCompleted,
                Box::new(move |_| sink.borrow_mut().push(id)),
            );
        }
        bus.emit(Event::TickCompleted { tick: 1 });
        bus.deliver();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn clear_all_keeps_suppression() {
        let mut bus = EventBus::default();
        bus.suppress(EventKind::FactoryStalled);
        bus.emit(produced(1));
        bus.clear_all();
        assert_eq!(bus.buffered_count(EventKind::ItemProduced), 0);
        assert!(bus.is_suppressed(EventKind::FactoryStalled));
    }
}
