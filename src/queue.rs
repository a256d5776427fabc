//! Bounded receive queue shared between the radio interrupt and the main loop
//!
//! The queue is a fixed-capacity ring of [`Frame`] slots with exactly one
//! producer (the interrupt handler) and one consumer (the transport). The
//! ownership split is enforced by [`FrameQueue::split`], which hands out a
//! single [`Producer`] and a single [`Consumer`].
//!
//! Read and write positions run over `0..2N` so that "full" and "empty" can
//! be told apart without a separate occupancy counter. Each side only ever
//! stores its own position:
//! - the producer fills a slot, then publishes it with a release store of
//!   the write position
//! - the consumer copies a slot out, then frees it with a release store of
//!   the read position
//!
//! Only atomic loads and stores are used, so the queue also works on cores
//! without compare-and-swap (e.g. Cortex-M0).
//!
//! Frames arriving while the queue is full are dropped and counted in a
//! saturating lost-frame counter. The counter is never reset.

#![allow(unsafe_code)]

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::frame::Frame;

/// Default number of receive slots
pub const DEFAULT_RX_QUEUE_CAPACITY: usize = 20;

/// Fixed-capacity single-producer/single-consumer frame queue
pub struct FrameQueue<const N: usize> {
    slots: [UnsafeCell<Frame>; N],
    /// Next slot to read, owned by the consumer
    head: AtomicUsize,
    /// Next slot to write, owned by the producer
    tail: AtomicUsize,
    /// Frames dropped because the queue was full, owned by the producer
    lost: AtomicU8,
}

// Slots are only touched by the side that currently owns them, see the
// module docs for the hand-over protocol.
unsafe impl<const N: usize> Sync for FrameQueue<N> {}

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: UnsafeCell<Frame> = UnsafeCell::new(Frame::new());

impl<const N: usize> FrameQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            slots: [EMPTY_SLOT; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            lost: AtomicU8::new(0),
        }
    }

    /// Split the queue into its producer and consumer halves
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let queue = &*self;
        (Producer { queue }, Consumer { queue })
    }

    /// Number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        occupied::<N>(
            self.head.load(Ordering::Acquire),
            self.tail.load(Ordering::Acquire),
        )
    }

    /// Whether no frame is waiting
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every slot is occupied
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Frames dropped because the queue was full, saturating at 255
    pub fn lost_frames(&self) -> u8 {
        self.lost.load(Ordering::Relaxed)
    }

    fn record_lost(&self) {
        // Single writer, so a load/store pair cannot lose an increment
        let lost = self.lost.load(Ordering::Relaxed);
        if lost < u8::MAX {
            self.lost.store(lost + 1, Ordering::Relaxed);
        }
    }
}

impl<const N: usize> Default for FrameQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Positions wrap at `2N`; the slot index is the position modulo `N`.
const fn advance<const N: usize>(pos: usize) -> usize {
    let next = pos + 1;
    if next == 2 * N {
        0
    } else {
        next
    }
}

const fn occupied<const N: usize>(head: usize, tail: usize) -> usize {
    if tail >= head {
        tail - head
    } else {
        tail + 2 * N - head
    }
}

/// Writing half of a [`FrameQueue`], used from the interrupt context
pub struct Producer<'q, const N: usize> {
    queue: &'q FrameQueue<N>,
}

impl<'q, const N: usize> Producer<'q, N> {
    /// Append a copy of `frame`
    ///
    /// Returns `false` and counts a lost frame when the queue is full.
    pub fn push(&mut self, frame: &Frame) -> bool {
        self.push_with(|slot| {
            slot.clone_from(frame);
            true
        })
    }

    /// Fill the next free slot in place
    ///
    /// `fill` is only called when a slot is free. The slot is published
    /// when `fill` returns `true`; otherwise it stays free. Returns whether
    /// a frame was queued. A full queue counts a lost frame.
    pub fn push_with<F>(&mut self, fill: F) -> bool
    where
        F: FnOnce(&mut Frame) -> bool,
    {
        let queue = self.queue;
        let tail = queue.tail.load(Ordering::Relaxed);
        let head = queue.head.load(Ordering::Acquire);
        if occupied::<N>(head, tail) == N {
            queue.record_lost();
            return false;
        }

        // SAFETY: the slot at `tail` is outside the readable range
        // `head..tail`, so the consumer does not touch it until the
        // release store below.
        let slot = unsafe { &mut *queue.slots[tail % N].get() };
        if !fill(slot) {
            return false;
        }

        queue.tail.store(advance::<N>(tail), Ordering::Release);
        true
    }

    /// Whether every slot is occupied
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no frame is waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Frames dropped because the queue was full
    pub fn lost_frames(&self) -> u8 {
        self.queue.lost_frames()
    }
}

/// Reading half of a [`FrameQueue`], used from the main context
pub struct Consumer<'q, const N: usize> {
    queue: &'q FrameQueue<N>,
}

impl<'q, const N: usize> Consumer<'q, N> {
    /// Remove and return the oldest frame
    pub fn pop(&mut self) -> Option<Frame> {
        let queue = self.queue;
        let head = queue.head.load(Ordering::Relaxed);
        let tail = queue.tail.load(Ordering::Acquire);
        if head == tail {
            return None;
        }

        // SAFETY: `head` is inside the readable range published by the
        // producer's release store, which the acquire load above observed.
        // The producer does not reuse the slot until the store below.
        let frame = unsafe { (*queue.slots[head % N].get()).clone() };

        queue.head.store(advance::<N>(head), Ordering::Release);
        Some(frame)
    }

    /// Capacity of the underlying queue
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no frame is waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether every slot is occupied
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    /// Frames dropped because the queue was full
    pub fn lost_frames(&self) -> u8 {
        self.queue.lost_frames()
    }
}
