//! Common algorithms and utilities.

mod fft;
mod ring_buffer;
mod window_function;

pub use fft::{is_supported_fft_size, real_fft, MAX_FFT_SIZE, MIN_FFT_SIZE};
pub use microfft::Complex32;
pub use ring_buffer::{Consumer, Producer, RingBuffer, TopView};
pub use window_function::{apply_window_table, WindowFunction};
