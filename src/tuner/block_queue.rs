use alloc::{boxed::Box, vec};

use crate::common::{Consumer, Producer, RingBuffer};

/// A bounded FIFO of fixed size audio blocks.
pub struct BlockQueue {
    producer: Producer<Box<[f32]>>,
    consumer: Consumer<Box<[f32]>>,
    block_size: usize,
}

impl BlockQueue {
    /// Creates a queue with `capacity` preallocated blocks of `block_size` samples.
    pub fn new(capacity: usize, block_size: usize) -> Self {
        let (producer, consumer) =
            RingBuffer::with_slots(capacity, || vec![0.0; block_size].into_boxed_slice());
        BlockQueue {
            producer,
            consumer,
            block_size,
        }
    }

    /// Copies `block` into the queue. Returns `false` if the queue is full,
    /// in which case the block is dropped.
    pub fn push(&mut self, block: &[f32]) -> bool {
        debug_assert_eq!(block.len(), self.block_size);
        self.producer.push_with(|slot| slot.copy_from_slice(block))
    }

    /// Copies the oldest block into `block`. Returns `false` if the queue is empty.
    pub fn pull(&mut self, block: &mut [f32]) -> bool {
        self.consumer
            .pull_with(|slot| block.copy_from_slice(slot))
            .is_some()
    }

    /// Passes the oldest block to `read` without copying it.
    pub fn pull_with<R, F>(&mut self, read: F) -> Option<R>
    where
        F: FnOnce(&[f32]) -> R,
    {
        self.consumer.pull_with(|slot| read(slot))
    }

    pub fn num_available_for_reading(&self) -> usize {
        self.consumer.len()
    }

    pub fn capacity(&self) -> usize {
        self.consumer.capacity()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

/// Collects incoming samples of arbitrary chunk sizes into fixed size blocks
/// and pushes each completed block onto a [`BlockQueue`].
pub struct SampleAccumulator {
    block: Box<[f32]>,
    write_index: usize,
    queue: BlockQueue,
    dropped_blocks: usize,
}

impl SampleAccumulator {
    pub fn new(block_size: usize, queue_capacity: usize) -> Self {
        if block_size == 0 {
            panic!("Block size must be greater than 0")
        }
        SampleAccumulator {
            block: vec![0.0; block_size].into_boxed_slice(),
            write_index: 0,
            queue: BlockQueue::new(queue_capacity, block_size),
            dropped_blocks: 0,
        }
    }

    /// Discards all accumulated and queued samples and sets a new block size.
    pub fn prepare(&mut self, block_size: usize) {
        *self = SampleAccumulator::new(block_size, self.queue.capacity());
    }

    /// Appends `samples` one at a time, pushing a block onto the queue
    /// every time `block_size` samples have been collected.
    pub fn update(&mut self, samples: &[f32]) {
        for sample in samples {
            self.block[self.write_index] = *sample;
            self.write_index += 1;
            if self.write_index == self.block.len() {
                if !self.queue.push(&self.block) {
                    self.dropped_blocks += 1;
                }
                self.write_index = 0;
            }
        }
    }

    pub fn queue(&mut self) -> &mut BlockQueue {
        &mut self.queue
    }

    pub fn num_complete_blocks_available(&self) -> usize {
        self.queue.num_available_for_reading()
    }

    pub fn block_size(&self) -> usize {
        self.block.len()
    }

    /// The number of samples collected towards the next block.
    pub fn pending_samples(&self) -> usize {
        self.write_index
    }

    /// The number of completed blocks dropped because the queue was full.
    pub fn dropped_blocks(&self) -> usize {
        self.dropped_blocks
    }
}
