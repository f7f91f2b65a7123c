//! 16-bit mono WAV persistence for recorded answers.

use std::path::Path;

use crate::audio::recorder::{AudioBuffer, RecordError};

/// Write `buffer` to `path` as a 16-bit mono PCM WAV, creating parent
/// directories and overwriting any existing file.
pub fn write_wav(path: &Path, buffer: &AudioBuffer) -> Result<(), RecordError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in &buffer.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    log::debug!("wrote {} samples to {}", buffer.samples.len(), path.display());
    Ok(())
}

/// Read a 16-bit PCM WAV.  Multi-channel files keep only the first channel.
pub fn read_wav(path: &Path) -> Result<AudioBuffer, RecordError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let samples = reader
        .samples::<i16>()
        .step_by(channels)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AudioBuffer::new(samples, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_preserves_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("answer.wav");
        let buf = AudioBuffer::new(vec![0, 1_000, -1_000, i16::MAX], 16_000);

        write_wav(&path, &buf).unwrap();
        let back = read_wav(&path).unwrap();
        assert_eq!(back, buf);
    }

    #[test]
    fn written_header_is_mono_16_bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer.wav");
        write_wav(&path, &AudioBuffer::new(vec![0; 160], 16_000)).unwrap();

        let spec = hound::WavReader::open(&path).unwrap().spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_rate, 16_000);
    }

    #[test]
    fn overwrite_replaces_previous_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer.wav");
        write_wav(&path, &AudioBuffer::new(vec![5; 100], 16_000)).unwrap();
        write_wav(&path, &AudioBuffer::new(vec![7; 10], 16_000)).unwrap();
        assert_eq!(read_wav(&path).unwrap().samples, vec![7; 10]);
    }

    #[test]
    fn missing_file_is_error() {
        assert!(read_wav(Path::new("/nonexistent/answer.wav")).is_err());
    }
}
