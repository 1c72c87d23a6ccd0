//! Simulates an audio host driving a tuner.
//!
//! An audio thread feeds the tuner in callbacks of varying size while the main
//! thread polls the estimate at 12 Hz, like a tuner display would.
//!
//! ```text
//! cargo run --example host_simulation [path/to/mono_or_stereo.wav]
//! ```
//! Without a WAV file, a sequence of synthesized notes is played and saved to
//! the temp directory, so it can be replayed or inspected.
//! Set `RUST_LOG=debug` to see the prepared configuration.

use std::thread;
use std::time::Duration;

use dev_helpers::{harmonic_tone, read_wav, rtrb, write_wav, AudioEngine, AudioProcessor, HOST_CALLBACK_SIZES};
use micro_tuner::note::DEFAULT_IN_TUNE_TOLERANCE_CENTS;
use micro_tuner::{Tuner, TunerConfig};

const REFERENCE_FREQUENCY: f32 = 440.0;
const POLL_RATE_HZ: f32 = 12.0;

enum HostMessage {
    Stats {
        processed_frames: usize,
        dropped_blocks: usize,
    },
}

struct TunerProcessor {
    tuner: Tuner,
    callback_count: usize,
}

impl AudioProcessor<HostMessage> for TunerProcessor {
    fn process(
        &mut self,
        in_buffer: &[f32],
        to_main_thread: &mut rtrb::Producer<HostMessage>,
        _: &mut rtrb::Consumer<HostMessage>,
    ) -> bool {
        self.tuner.process_block(in_buffer);
        self.callback_count += 1;
        if self.callback_count % 100 == 0 {
            let _ = to_main_thread.push(HostMessage::Stats {
                processed_frames: self.tuner.processed_frames(),
                dropped_blocks: self.tuner.dropped_blocks(),
            });
        }
        true
    }
}

/// A few notes, some of them off pitch, one with a 3rd harmonic stronger than its fundamental.
fn synthesized_notes(sample_rate: f32) -> Vec<f32> {
    let note_len = (1.5 * sample_rate) as usize;
    let notes: [&[(f32, f32)]; 5] = [
        &[(110.0, 0.2), (220.0, 0.3), (330.0, 0.6), (550.0, 0.2)],
        &[(328.0, 0.5), (656.0, 0.2)],
        &[(440.0, 0.5)],
        &[],
        &[(248.5, 0.4), (497.0, 0.3), (745.5, 0.2)],
    ];
    notes
        .iter()
        .flat_map(|partials| harmonic_tone(partials, sample_rate, note_len))
        .collect()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let (sample_rate, input) = match std::env::args().nth(1) {
        Some(path) => match read_wav(&path) {
            Ok((sample_rate, samples)) => {
                println!("Playing {} ({} Hz)", path, sample_rate);
                (sample_rate as f32, samples)
            }
            Err(error) => {
                println!("Failed to read {}: {}", path, error);
                return;
            }
        },
        None => {
            let samples = synthesized_notes(48000.0);
            let path = std::env::temp_dir().join("micro_tuner_synthesized_notes.wav");
            let path = path.to_string_lossy();
            match write_wav(&path, 48000, &samples) {
                Ok(()) => println!("Playing synthesized notes, saved to {}", path),
                Err(error) => println!("Playing synthesized notes, failed to save them: {}", error),
            }
            (48000.0, samples)
        }
    };

    let block_size = 512;
    let mut tuner = Tuner::new(TunerConfig::default());
    if let Err(error) = tuner.prepare(sample_rate, block_size) {
        println!("Failed to prepare tuner: {}", error);
        return;
    }
    let reader = tuner.reader();

    let processor = TunerProcessor {
        tuner,
        callback_count: 0,
    };
    let mut engine = AudioEngine::new(
        sample_rate,
        input,
        HOST_CALLBACK_SIZES.to_vec(),
        processor,
    );

    while engine.is_running() {
        thread::sleep(Duration::from_secs_f32(1.0 / POLL_RATE_HZ));

        while let Ok(message) = engine.from_audio_thread.pop() {
            match message {
                HostMessage::Stats {
                    processed_frames,
                    dropped_blocks,
                } => log::info!(
                    "{} frames analyzed, {} blocks dropped",
                    processed_frames,
                    dropped_blocks
                ),
            }
        }

        let frequency = reader.current_frequency();
        let note = reader.note(REFERENCE_FREQUENCY);
        if note.is_empty() {
            println!("{:>9}   ---", "");
            continue;
        }
        let in_tune = if note.is_in_tune(DEFAULT_IN_TUNE_TOLERANCE_CENTS) {
            "  in tune"
        } else {
            ""
        };
        println!(
            "{:>9.2} Hz {:<4} {:+6.1} cents{}",
            frequency,
            note.label(),
            note.cents,
            in_tune
        );
    }
    engine.stop();
}
