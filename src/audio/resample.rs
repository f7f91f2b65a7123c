//! Sample-format conversion between the capture device and the recorder.
//!
//! Microphones deliver interleaved `f32` frames at whatever rate the device
//! prefers (commonly 44.1 or 48 kHz).  Answers are stored as 16 kHz mono
//! 16-bit PCM, so a recording passes through three steps:
//!
//! 1. [`downmix`] — average interleaved channels into mono.
//! 2. [`resample`] — linear-interpolation rate conversion.
//! 3. [`to_pcm16`] — clamp and quantise to `i16`.

/// Average interleaved multi-channel audio down to mono.
///
/// `channels == 1` copies the input; `channels == 0` yields nothing.  A
/// trailing partial frame is dropped.
///
/// ```rust
/// use interview_coach::audio::downmix;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, 0.4]; // L R L R
/// let mono = downmix(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.0).abs() < 1e-6);
/// assert!((mono[1] - 0.3).abs() < 1e-6);
/// ```
pub fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Resample mono `samples` from `from_rate` to `to_rate` Hz by linear
/// interpolation.
///
/// Equal rates copy the input.  Output length is
/// `ceil(samples.len() * to_rate / from_rate)`.
///
/// ```rust
/// use interview_coach::audio::resample;
///
/// let hi = vec![0.5_f32; 480];
/// assert_eq!(resample(&hi, 48_000, 16_000).len(), 160);
/// ```
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }
    if samples.is_empty() {
        return Vec::new();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;
    let last = samples.len() - 1;

    (0..output_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let idx = (src_pos as usize).min(last);
            let frac = (src_pos - idx as f64) as f32;
            if idx < last {
                samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
            } else {
                samples[last]
            }
        })
        .collect()
}

/// Quantise `[-1.0, 1.0]` float samples to signed 16-bit PCM, clamping
/// anything outside the range.
pub fn to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
        .collect()
}

/// Inverse of [`to_pcm16`]: signed 16-bit PCM to `[-1.0, 1.0]` floats.
pub fn from_pcm16(samples: &[i16]) -> Vec<f32> {
    samples
        .iter()
        .map(|&s| s as f32 / i16::MAX as f32)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- downmix -----------------------------------------------------------

    #[test]
    fn downmix_mono_is_copy() {
        let input = vec![0.1_f32, 0.2, 0.3];
        assert_eq!(downmix(&input, 1), input);
    }

    #[test]
    fn downmix_stereo_averages_frames() {
        let out = downmix(&[1.0_f32, -1.0, 0.5, 0.5], 2);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn downmix_drops_partial_frame() {
        let out = downmix(&[0.2_f32, 0.4, 0.9], 2);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn downmix_zero_channels() {
        assert!(downmix(&[1.0_f32, 2.0], 0).is_empty());
    }

    // ---- resample ----------------------------------------------------------

    #[test]
    fn resample_same_rate_is_copy() {
        let input: Vec<f32> = (0..160).map(|i| i as f32 / 160.0).collect();
        assert_eq!(resample(&input, 16_000, 16_000), input);
    }

    #[test]
    fn resample_empty_input() {
        assert!(resample(&[], 48_000, 16_000).is_empty());
    }

    #[test]
    fn resample_44100_one_second() {
        let out = resample(&vec![0.0_f32; 44_100], 44_100, 16_000);
        assert!(out.len().abs_diff(16_000) <= 1, "got {}", out.len());
    }

    #[test]
    fn resample_keeps_dc_level() {
        let out = resample(&vec![0.5_f32; 480], 48_000, 16_000);
        assert!(out.iter().all(|s| (s - 0.5).abs() < 1e-5));
    }

    #[test]
    fn resample_upsamples() {
        assert_eq!(resample(&vec![0.0_f32; 80], 8_000, 16_000).len(), 160);
    }

    #[test]
    fn resample_interpolates_between_samples() {
        let out = resample(&[0.0_f32, 1.0], 8_000, 16_000);
        assert_eq!(out.len(), 4);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    // ---- pcm16 -------------------------------------------------------------

    #[test]
    fn pcm16_clamps_out_of_range() {
        assert_eq!(to_pcm16(&[2.0, -2.0, 0.0]), [i16::MAX, -i16::MAX, 0]);
    }

    #[test]
    fn pcm16_full_scale_maps_back_to_one() {
        let back = from_pcm16(&to_pcm16(&[1.0, -1.0]));
        assert!((back[0] - 1.0).abs() < 1e-6);
        assert!((back[1] + 1.0).abs() < 1e-6);
    }
}
