use alloc::{boxed::Box, vec};

use crate::common::{Complex32, Consumer, Producer, RingBuffer, TopView};

/// A bounded FIFO of spectral frames, each holding `fft_size / 2` complex bins.
///
/// Besides plain pulling, the queue can expose its two oldest frames at once,
/// which is what the phase vocoder needs to compare consecutive spectra.
pub struct SpectralFrameQueue {
    producer: Producer<Box<[Complex32]>>,
    consumer: Consumer<Box<[Complex32]>>,
    bin_count: usize,
}

impl SpectralFrameQueue {
    pub fn new(capacity: usize, fft_size: usize) -> Self {
        let bin_count = fft_size / 2;
        let (producer, consumer) = RingBuffer::with_slots(capacity, || {
            vec![Complex32::new(0.0, 0.0); bin_count].into_boxed_slice()
        });
        SpectralFrameQueue {
            producer,
            consumer,
            bin_count,
        }
    }

    /// Copies `frame` into the queue. Returns `false`, dropping the frame, if the queue is full.
    pub fn push(&mut self, frame: &[Complex32]) -> bool {
        debug_assert_eq!(frame.len(), self.bin_count);
        self.producer.push_with(|slot| slot.copy_from_slice(frame))
    }

    /// Copies the oldest frame into `frame` and removes it from the queue.
    pub fn pull(&mut self, frame: &mut [Complex32]) -> bool {
        self.consumer
            .pull_with(|slot| frame.copy_from_slice(slot))
            .is_some()
    }

    /// Copies the two oldest frames into `previous` and `current` and removes
    /// the oldest one from the queue. If only one frame is available, it is
    /// copied to both outputs and stays in the queue.
    pub fn pull_top_view_next(
        &mut self,
        previous: &mut [Complex32],
        current: &mut [Complex32],
    ) -> TopView {
        self.consumer.pull_top_view_next_with(|older, newer| {
            previous.copy_from_slice(older);
            current.copy_from_slice(newer);
        })
    }

    /// Like [`SpectralFrameQueue::pull_top_view_next`], but passes the frames
    /// to `view` in place instead of copying them.
    pub fn pull_top_view_next_with<F>(&mut self, view: F) -> TopView
    where
        F: FnOnce(&[Complex32], &[Complex32]),
    {
        self.consumer
            .pull_top_view_next_with(|older, newer| view(older, newer))
    }

    pub fn num_available_for_reading(&self) -> usize {
        self.consumer.len()
    }

    pub fn capacity(&self) -> usize {
        self.consumer.capacity()
    }

    /// The number of complex bins per frame.
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn frame(value: f32, bin_count: usize) -> Vec<Complex32> {
        (0..bin_count)
            .map(|i| Complex32::new(value, i as f32))
            .collect()
    }

    #[test]
    fn test_pull_order() {
        let mut queue = SpectralFrameQueue::new(30, 16);
        assert_eq!(queue.bin_count(), 8);
        assert!(queue.push(&frame(1., 8)));
        assert!(queue.push(&frame(2., 8)));

        let mut out = frame(0., 8);
        assert!(queue.pull(&mut out));
        assert_eq!(out, frame(1., 8));
        assert!(queue.pull(&mut out));
        assert_eq!(out, frame(2., 8));
        assert!(!queue.pull(&mut out));
    }

    #[test]
    fn test_top_view_with_single_frame() {
        let mut queue = SpectralFrameQueue::new(30, 16);
        let mut previous = frame(0., 8);
        let mut current = frame(0., 8);
        assert_eq!(
            queue.pull_top_view_next(&mut previous, &mut current),
            TopView::NotReady
        );

        queue.push(&frame(5., 8));
        assert_eq!(
            queue.pull_top_view_next(&mut previous, &mut current),
            TopView::Partial
        );
        assert_eq!(previous, frame(5., 8));
        assert_eq!(current, frame(5., 8));
        assert_eq!(queue.num_available_for_reading(), 1);
    }

    #[test]
    fn test_top_view_slides_by_one() {
        let mut queue = SpectralFrameQueue::new(30, 16);
        for value in 1..=3 {
            queue.push(&frame(value as f32, 8));
        }

        let mut previous = frame(0., 8);
        let mut current = frame(0., 8);
        assert_eq!(
            queue.pull_top_view_next(&mut previous, &mut current),
            TopView::Pair
        );
        assert_eq!(previous[0].re, 1.);
        assert_eq!(current[0].re, 2.);

        let mut viewed = (0., 0.);
        assert_eq!(
            queue.pull_top_view_next_with(|a, b| viewed = (a[0].re, b[0].re)),
            TopView::Pair
        );
        assert_eq!(viewed, (2., 3.));
        assert_eq!(queue.num_available_for_reading(), 1);
    }

    #[test]
    fn test_full_queue_drops_frames() {
        let mut queue = SpectralFrameQueue::new(30, 16);
        for value in 0..30 {
            assert!(queue.push(&frame(value as f32, 8)));
        }
        assert!(!queue.push(&frame(100., 8)));
        assert_eq!(queue.num_available_for_reading(), 30);
        let mut out = frame(0., 8);
        assert!(queue.pull(&mut out));
        assert_eq!(out[0].re, 0.);
    }
}
