//! Audio capture and answer recording.
//!
//! ```text
//! cpal callback ──► AudioChunk (f32, device rate, N ch)
//!                        │
//!                        ▼
//!            MicRecorder::record(duration)
//!              downmix → resample → to_pcm16
//!                        │
//!                        ▼
//!          AudioBuffer (i16, 16 kHz, mono) ──► write_wav("answer.wav")
//! ```

pub mod capture;
pub mod recorder;
pub mod resample;
pub mod wav;

pub use capture::{AudioCapture, AudioChunk, CaptureError, StreamHandle};
pub use recorder::{AudioBuffer, MicRecorder, RecordError, Recorder, TARGET_SAMPLE_RATE};
pub use resample::{downmix, from_pcm16, resample, to_pcm16};
pub use wav::{read_wav, write_wav};

#[cfg(test)]
pub use recorder::MockRecorder;
