//! A bounded, lock-free, single producer single consumer ring buffer
//! with preallocated slots.
//!
//! Slots are created once up front and then overwritten in place by the producer
//! and read in place by the consumer, so pushing and pulling never allocates, even
//! when the slots are themselves heap buffers like `Box<[f32]>`.
//!
//! The read and write indices run modulo twice the capacity, which makes it possible
//! to tell a full buffer from an empty one without sacrificing a slot.

use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// The outcome of [`Consumer::pull_top_view_next_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopView {
    /// Nothing to read.
    NotReady,
    /// Only a single item was ready. It was passed as both the older and the
    /// newer item and is left in the buffer.
    Partial,
    /// The two oldest items were viewed. The older of the two was discarded,
    /// the newer one is left in the buffer.
    Pair,
}

/// Storage shared by a [`Producer`] and a [`Consumer`].
pub struct RingBuffer<T> {
    slots: Box<[UnsafeCell<T>]>,
    /// Index of the next slot to write, modulo `2 * capacity`. Only stored by the producer.
    write_index: AtomicUsize,
    /// Index of the next slot to read, modulo `2 * capacity`. Only stored by the consumer.
    read_index: AtomicUsize,
}

// The producer and the consumer never access the same slot at the same time:
// the producer only touches the slot at the write index when the buffer is not full,
// the consumer only touches slots between the read and write indices.
unsafe impl<T: Send> Sync for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    /// Creates a ring buffer with `capacity` slots, each initialized using `make_slot`,
    /// and splits it into its producer and consumer halves.
    pub fn with_slots<F>(capacity: usize, mut make_slot: F) -> (Producer<T>, Consumer<T>)
    where
        F: FnMut() -> T,
    {
        if capacity == 0 {
            panic!("Ring buffer capacity must be greater than 0")
        }
        let slots: Vec<UnsafeCell<T>> = (0..capacity).map(|_| UnsafeCell::new(make_slot())).collect();
        let ring = Arc::new(RingBuffer {
            slots: slots.into_boxed_slice(),
            write_index: AtomicUsize::new(0),
            read_index: AtomicUsize::new(0),
        });
        (
            Producer {
                ring: Arc::clone(&ring),
            },
            Consumer { ring },
        )
    }

    /// The maximum number of items the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn occupied(&self, write_index: usize, read_index: usize) -> usize {
        let wrap = 2 * self.capacity();
        (write_index + wrap - read_index) % wrap
    }

    fn advance(&self, index: usize) -> usize {
        (index + 1) % (2 * self.capacity())
    }

    fn slot(&self, index: usize) -> *mut T {
        self.slots[index % self.capacity()].get()
    }
}

/// The writing half of a [`RingBuffer`].
pub struct Producer<T> {
    ring: Arc<RingBuffer<T>>,
}

impl<T> Producer<T> {
    /// Overwrites the next free slot in place using `fill` and publishes it.
    /// Returns `false`, without calling `fill`, if the buffer is full.
    pub fn push_with<F>(&mut self, fill: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let ring = &*self.ring;
        let write_index = ring.write_index.load(Ordering::Relaxed);
        let read_index = ring.read_index.load(Ordering::Acquire);
        if ring.occupied(write_index, read_index) == ring.capacity() {
            return false;
        }

        // The consumer does not read this slot until the write index is published below.
        fill(unsafe { &mut *ring.slot(write_index) });

        ring.write_index
            .store(ring.advance(write_index), Ordering::Release);
        true
    }

    /// Moves `value` into the next free slot. Returns `false` and drops
    /// `value` if the buffer is full.
    pub fn push(&mut self, value: T) -> bool {
        self.push_with(|slot| *slot = value)
    }

    /// The number of slots available for writing.
    pub fn free_slots(&self) -> usize {
        let ring = &*self.ring;
        let write_index = ring.write_index.load(Ordering::Relaxed);
        let read_index = ring.read_index.load(Ordering::Acquire);
        ring.capacity() - ring.occupied(write_index, read_index)
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }
}

/// The reading half of a [`RingBuffer`].
pub struct Consumer<T> {
    ring: Arc<RingBuffer<T>>,
}

impl<T> Consumer<T> {
    /// The number of items available for reading.
    pub fn len(&self) -> usize {
        let ring = &*self.ring;
        let read_index = ring.read_index.load(Ordering::Relaxed);
        let write_index = ring.write_index.load(Ordering::Acquire);
        ring.occupied(write_index, read_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Passes the oldest item to `read` and then releases its slot.
    /// Returns `None` if the buffer is empty.
    pub fn pull_with<R, F>(&mut self, read: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        let ring = &*self.ring;
        let read_index = ring.read_index.load(Ordering::Relaxed);
        let write_index = ring.write_index.load(Ordering::Acquire);
        if ring.occupied(write_index, read_index) == 0 {
            return None;
        }

        let result = read(unsafe { &*ring.slot(read_index) });

        ring.read_index
            .store(ring.advance(read_index), Ordering::Release);
        Some(result)
    }

    /// Passes the two oldest items to `view`, oldest first, then discards
    /// the oldest one and keeps the other.
    ///
    /// If only one item is ready, it is passed as both arguments and kept.
    pub fn pull_top_view_next_with<F>(&mut self, view: F) -> TopView
    where
        F: FnOnce(&T, &T),
    {
        let ring = &*self.ring;
        let read_index = ring.read_index.load(Ordering::Relaxed);
        let write_index = ring.write_index.load(Ordering::Acquire);
        match ring.occupied(write_index, read_index) {
            0 => TopView::NotReady,
            1 => {
                let only = unsafe { &*ring.slot(read_index) };
                view(only, only);
                TopView::Partial
            }
            _ => {
                let older = unsafe { &*ring.slot(read_index) };
                let newer = unsafe { &*ring.slot(ring.advance(read_index)) };
                view(older, newer);
                ring.read_index
                    .store(ring.advance(read_index), Ordering::Release);
                TopView::Pair
            }
        }
    }
}
