//! Cooperative event scheduler.
//!
//! A bounded FIFO of `(event, handler)` pairs.  Producers (GATT write
//! callback, button task, interrupt handlers) call [`EventQueue::enqueue`],
//! which only copies a few bytes under a critical section and never
//! blocks.  The idle-loop task calls [`EventQueue::dispatch_next`] (or
//! [`EventQueue::drain`]), which pops one entry at a time and runs its
//! handler to completion before popping the next.
//!
//! The lock is released while a handler runs, so producers can keep
//! enqueueing while a long handler (a press pulse) is in progress.  A
//! handler that blocks stalls every later event; there is a single
//! actuator, and serialised access to it is what we want.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::error::Error;

/// Payload carried through the queue, copied by value at enqueue time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingEvent {
    pub kind: u8,
}

impl PendingEvent {
    pub const fn new(kind: u8) -> Self {
        Self { kind }
    }
}

/// Function invoked from the drain loop with the consumer context.
pub type Handler<C> = fn(&mut C, PendingEvent);

struct Slot<C> {
    event: PendingEvent,
    handler: Handler<C>,
}

struct Inner<C, const N: usize> {
    slots: Deque<Slot<C>, N>,
    overflows: u32,
}

/// Fixed-capacity event queue shared between producers and the drain task.
pub struct EventQueue<C, const N: usize> {
    inner: Mutex<RefCell<Inner<C, N>>>,
}

impl<C, const N: usize> EventQueue<C, N> {
    /// Create an empty queue. Usable in `static` initialisers.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                slots: Deque::new(),
                overflows: 0,
            })),
        }
    }

    /// Queue `event` for `handler`.
    ///
    /// On overflow the event is rejected, the overflow counter is bumped,
    /// and entries already queued are left untouched.
    pub fn enqueue(&self, event: PendingEvent, handler: Handler<C>) -> Result<(), Error> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if inner.slots.push_back(Slot { event, handler }).is_err() {
                inner.overflows = inner.overflows.saturating_add(1);
                return Err(Error::QueueFull);
            }
            Ok(())
        })
    }

    /// Dispatch the oldest pending event, if any.
    ///
    /// Runs at most one handler, so an async caller can yield between
    /// events. Returns `false` when the queue was empty.
    pub fn dispatch_next(&self, ctx: &mut C) -> bool {
        match self.pop() {
            Some(slot) => {
                (slot.handler)(ctx, slot.event);
                true
            }
            None => false,
        }
    }

    /// Dispatch every pending event in arrival order.
    ///
    /// Events enqueued by a handler (or by an interrupt while a handler
    /// runs) are dispatched in the same pass. Returns the number of
    /// handlers invoked.
    pub fn drain(&self, ctx: &mut C) -> usize {
        let mut dispatched = 0;
        while self.dispatch_next(ctx) {
            dispatched += 1;
        }
        dispatched
    }

    fn pop(&self) -> Option<Slot<C>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).slots.pop_front())
    }

    /// Number of events waiting.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Events rejected because the queue was full, since boot.
    pub fn overflow_count(&self) -> u32 {
        critical_section::with(|cs| self.inner.borrow_ref(cs).overflows)
    }
}

impl<C, const N: usize> Default for EventQueue<C, N> {
    fn default() -> Self {
        Self::new()
    }
}
