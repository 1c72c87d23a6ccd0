use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rtrb;

use crate::signal::IrregularChunks;

pub trait AudioProcessor<S> {
    /// Return false to stop the audio stream, true otherwise.
    fn process(
        &mut self,
        in_buffer: &[f32],
        to_main_thread: &mut rtrb::Producer<S>,
        from_main_thread: &mut rtrb::Consumer<S>,
    ) -> bool;
}

/// Plays the role of an audio host: a separate thread delivers a signal to an
/// [`AudioProcessor`] in buffers of varying size, paced in real time.
pub struct AudioEngine<S> {
    thread: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    pub to_audio_thread: rtrb::Producer<S>,
    pub from_audio_thread: rtrb::Consumer<S>,
}

impl<S> AudioEngine<S>
where
    S: Send + 'static,
{
    /// Starts streaming `input` to `processor`, using callback sizes cycling through
    /// `callback_sizes`. The stream stops when the input is exhausted, or when the
    /// processor returns false.
    pub fn new<T: AudioProcessor<S> + Send + 'static>(
        sample_rate: f32,
        input: Vec<f32>,
        callback_sizes: Vec<usize>,
        mut processor: T,
    ) -> Self {
        let queue_capacity = 1000;
        let (to_audio_thread, mut from_main_thread) = rtrb::RingBuffer::<S>::new(queue_capacity).split();
        let (mut to_main_thread, from_audio_thread) = rtrb::RingBuffer::<S>::new(queue_capacity).split();
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        let thread = thread::spawn(move || {
            for chunk in IrregularChunks::new(&input, &callback_sizes) {
                if !thread_running.load(Ordering::Relaxed) {
                    break;
                }
                if !processor.process(chunk, &mut to_main_thread, &mut from_main_thread) {
                    break;
                }
                let chunk_duration = (chunk.len() as f64) / (sample_rate as f64);
                thread::sleep(Duration::from_secs_f64(chunk_duration));
            }
            thread_running.store(false, Ordering::Relaxed);
        });

        AudioEngine {
            thread: Some(thread),
            running,
            to_audio_thread,
            from_audio_thread,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                println!("The audio thread panicked");
            }
        }
    }
}

impl<S> Drop for AudioEngine<S> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
