//! Fixed-length answer recording.
//!
//! [`Recorder`] is the seam the interview session records through.
//! [`MicRecorder`] is the production implementation: it opens the default
//! microphone, collects [`AudioChunk`]s for the requested duration and
//! returns a 16 kHz mono [`AudioBuffer`].
//!
//! Recording blocks the calling thread for the full duration.  Async callers
//! must wrap it in `tokio::task::spawn_blocking`.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::audio::capture::{AudioCapture, AudioChunk, CaptureError};
use crate::audio::resample::{downmix, from_pcm16, resample, to_pcm16};

/// Target sample rate for every recorded answer.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// RecordError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// The device produced no samples before the deadline.
    #[error("microphone produced no audio")]
    NoAudio,

    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// AudioBuffer
// ---------------------------------------------------------------------------

/// Mono 16-bit PCM audio plus its sample rate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioBuffer {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Quantise float mono samples.
    pub fn from_f32(samples: &[f32], sample_rate: u32) -> Self {
        Self::new(to_pcm16(samples), sample_rate)
    }

    /// Samples as `[-1.0, 1.0]` floats, the form Whisper expects.
    pub fn to_f32(&self) -> Vec<f32> {
        from_pcm16(&self.samples)
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Recorder trait
// ---------------------------------------------------------------------------

/// Records a fixed-length clip from some audio source.
pub trait Recorder: Send + Sync {
    /// Block for `duration` and return what was captured, resampled to
    /// [`TARGET_SAMPLE_RATE`] mono.
    fn record(&self, duration: Duration) -> Result<AudioBuffer, RecordError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Recorder>) {}
};

// ---------------------------------------------------------------------------
// MicRecorder
// ---------------------------------------------------------------------------

/// Records from the system default input device.
#[derive(Debug, Clone, Default)]
pub struct MicRecorder;

impl MicRecorder {
    pub fn new() -> Self {
        Self
    }
}

impl Recorder for MicRecorder {
    fn record(&self, duration: Duration) -> Result<AudioBuffer, RecordError> {
        // The cpal stream is created and dropped on this thread.
        let capture = AudioCapture::new()?;
        let (tx, rx) = mpsc::channel::<AudioChunk>();
        let handle = capture.start(tx)?;

        log::info!("recording for {:.1}s", duration.as_secs_f32());
        let deadline = Instant::now() + duration;
        let mut raw: Vec<f32> = Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match rx.recv_timeout(remaining) {
                Ok(chunk) => raw.extend_from_slice(&chunk.samples),
                Err(mpsc::RecvTimeoutError::Timeout) => break,
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    log::warn!("capture stream closed before the recording deadline");
                    break;
                }
            }
        }
        drop(handle);

        // Late chunks already queued by the callback.
        while let Ok(chunk) = rx.try_recv() {
            raw.extend_from_slice(&chunk.samples);
        }

        if raw.is_empty() {
            return Err(RecordError::NoAudio);
        }

        let mono = downmix(&raw, capture.channels());
        let resampled = resample(&mono, capture.sample_rate(), TARGET_SAMPLE_RATE);
        let buffer = AudioBuffer::from_f32(&resampled, TARGET_SAMPLE_RATE);
        log::debug!(
            "recorded {} samples ({:.2}s) from a {} Hz / {} ch device",
            buffer.samples.len(),
            buffer.duration().as_secs_f32(),
            capture.sample_rate(),
            capture.channels()
        );
        Ok(buffer)
    }
}

// ---------------------------------------------------------------------------
// MockRecorder  (test-only)
// ---------------------------------------------------------------------------

/// Returns silence (or fails) without touching any device.
#[cfg(test)]
pub struct MockRecorder {
    silence_secs: Option<f32>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockRecorder {
    /// Every call yields `secs` seconds of silence at 16 kHz.
    pub fn silence(secs: f32) -> Self {
        Self {
            silence_secs: Some(secs),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Every call fails with [`RecordError::NoAudio`].
    pub fn failing() -> Self {
        Self {
            silence_secs: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl Recorder for MockRecorder {
    fn record(&self, _duration: Duration) -> Result<AudioBuffer, RecordError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let secs = self.silence_secs.ok_or(RecordError::NoAudio)?;
        let n = (secs * TARGET_SAMPLE_RATE as f32) as usize;
        Ok(AudioBuffer::new(vec![0; n], TARGET_SAMPLE_RATE))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_from_sample_count() {
        let buf = AudioBuffer::new(vec![0; 24_000], TARGET_SAMPLE_RATE);
        assert_eq!(buf.duration(), Duration::from_millis(1_500));
    }

    #[test]
    fn zero_rate_has_zero_duration() {
        assert_eq!(AudioBuffer::new(vec![1, 2, 3], 0).duration(), Duration::ZERO);
    }

    #[test]
    fn from_f32_quantises() {
        let buf = AudioBuffer::from_f32(&[0.0, 1.0, -1.0], 16_000);
        assert_eq!(buf.samples, [0, i16::MAX, -i16::MAX]);
        let back = buf.to_f32();
        assert!((back[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mock_silence_has_requested_length() {
        let rec = MockRecorder::silence(0.5);
        let buf = rec.record(Duration::from_secs(20)).unwrap();
        assert_eq!(buf.samples.len(), 8_000);
        assert_eq!(buf.sample_rate, TARGET_SAMPLE_RATE);
        assert_eq!(rec.calls(), 1);
    }

    #[test]
    fn mock_failing_reports_no_audio() {
        let rec: Box<dyn Recorder> = Box::new(MockRecorder::failing());
        assert!(matches!(
            rec.record(Duration::from_secs(1)),
            Err(RecordError::NoAudio)
        ));
    }

    #[test]
    fn capture_error_is_transparent() {
        let err: RecordError = CaptureError::NoDevice.into();
        assert_eq!(err.to_string(), CaptureError::NoDevice.to_string());
    }
}
