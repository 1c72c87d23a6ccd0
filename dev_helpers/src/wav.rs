use hound;

/// Reads a 16 bit integer or 32 bit float WAV file, averaging all channels
/// into a single mono channel. Returns the sample rate and the mono samples.
pub fn read_wav(path: &str) -> Result<(u32, Vec<f32>), hound::Error> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1. / (i16::MAX as f32);
            reader
                .samples::<i16>()
                .map(|sample| sample.map(|sample| (sample as f32) * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channel_count = spec.channels.max(1) as usize;
    let samples = interleaved
        .chunks(channel_count)
        .map(|frame| frame.iter().sum::<f32>() / (channel_count as f32))
        .collect();
    Ok((spec.sample_rate, samples))
}

/// Writes mono samples to a 16 bit WAV file, clamping them to [-1, 1].
pub fn write_wav(path: &str, sample_rate: u32, buffer: &[f32]) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    let amplitude = i16::MAX as f32;
    for sample in buffer.iter() {
        let clamped_sample = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped_sample * amplitude) as i16)?;
    }
    writer.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let path = std::env::temp_dir().join("dev_helpers_write_then_read.wav");
        let path = path.to_str().unwrap();
        let samples = [0.0, 0.5, -0.5, 2.0, -2.0];
        write_wav(path, 22050, &samples).unwrap();

        let (sample_rate, read) = read_wav(path).unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(sample_rate, 22050);
        assert_eq!(read.len(), samples.len());
        // Out of range samples are clamped.
        let expected = [0.0, 0.5, -0.5, 1.0, -1.0];
        for (actual, expected) in read.iter().zip(expected.iter()) {
            assert!((actual - expected).abs() < 1e-4);
        }
    }
}
