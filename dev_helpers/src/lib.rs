mod audio;
mod signal;
mod wav;

pub use audio::AudioEngine;
pub use audio::AudioProcessor;
pub use rtrb;
pub use signal::{harmonic_tone, sine, IrregularChunks, HOST_CALLBACK_SIZES};
pub use wav::{read_wav, write_wav};
