use microfft::Complex32;

/// The smallest supported FFT size.
pub const MIN_FFT_SIZE: usize = 64;
/// The largest supported FFT size.
pub const MAX_FFT_SIZE: usize = 16384;

/// Returns true if [`real_fft`] can transform a buffer of length `fft_size`.
pub fn is_supported_fft_size(fft_size: usize) -> bool {
    fft_size.is_power_of_two() && (MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&fft_size)
}

/// Performs an in-place, real-only forward FFT of `buffer`, returning the
/// `buffer.len() / 2` non-negative frequency bins, starting at DC. The real-valued
/// coefficient at the Nyquist frequency is packed into the imaginary part of the DC bin.
///
/// Panics if the length of `buffer` is not a supported FFT size.
pub fn real_fft(buffer: &mut [f32]) -> &mut [Complex32] {
    let fft_size = buffer.len();
    match fft_size {
        64 => &mut microfft::real::rfft_64(buffer.try_into().unwrap())[..],
        128 => &mut microfft::real::rfft_128(buffer.try_into().unwrap())[..],
        256 => &mut microfft::real::rfft_256(buffer.try_into().unwrap())[..],
        512 => &mut microfft::real::rfft_512(buffer.try_into().unwrap())[..],
        1024 => &mut microfft::real::rfft_1024(buffer.try_into().unwrap())[..],
        2048 => &mut microfft::real::rfft_2048(buffer.try_into().unwrap())[..],
        4096 => &mut microfft::real::rfft_4096(buffer.try_into().unwrap())[..],
        8192 => &mut microfft::real::rfft_8192(buffer.try_into().unwrap())[..],
        16384 => &mut microfft::real::rfft_16384(buffer.try_into().unwrap())[..],
        _ => panic!("Unsupported fft size {}", fft_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::f32::consts::PI;

    #[test]
    fn test_supported_sizes() {
        assert!(is_supported_fft_size(64));
        assert!(is_supported_fft_size(8192));
        assert!(is_supported_fft_size(16384));
        assert!(!is_supported_fft_size(32));
        assert!(!is_supported_fft_size(32768));
        assert!(!is_supported_fft_size(1000));
    }

    #[test]
    fn test_dc_and_cosine() {
        let fft_size = 256;
        let mut buffer = vec![1.0_f32; fft_size];
        let bins = real_fft(&mut buffer);
        assert_eq!(bins.len(), fft_size / 2);
        assert!((bins[0].re - fft_size as f32).abs() < 1e-3);
        assert!(bins[1].norm_sqr() < 1e-6);

        // A cosine centered on bin 8 ends up in bin 8 only.
        let mut buffer = vec![0.0_f32; fft_size];
        for (i, value) in buffer.iter_mut().enumerate() {
            *value = (2.0 * PI * 8.0 * (i as f32) / (fft_size as f32)).cos();
        }
        let bins = real_fft(&mut buffer);
        assert!((bins[8].re - 0.5 * fft_size as f32).abs() < 1e-2);
        assert!(bins[8].im.abs() < 1e-2);
        assert!(bins[7].norm_sqr() < 1e-4);
        assert!(bins[9].norm_sqr() < 1e-4);
    }

    #[test]
    #[should_panic]
    fn test_unsupported_size() {
        let mut buffer = vec![0.0_f32; 100];
        real_fft(&mut buffer);
    }
}
