//! Microphone capture and recording encoding

pub mod buffer;
#[cfg(feature = "audio-io")]
pub mod input;
pub mod wav;

pub use buffer::AudioRingBuffer;
#[cfg(feature = "audio-io")]
pub use input::{list_input_devices, AudioDeviceInfo, AudioRecorder};
pub use wav::encode_wav;

use crate::Result;

/// A finished recording, mono f32 samples in -1.0..=1.0
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Encode as a 16-bit PCM WAV file held in memory
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        encode_wav(&self.samples, self.sample_rate, self.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let clip = AudioClip::new(vec![0.0; 8000], 16000, 1);
        assert!((clip.duration_seconds() - 0.5).abs() < f32::EPSILON);
        assert!(!clip.is_empty());
    }

    #[test]
    fn test_empty_clip() {
        let clip = AudioClip::new(Vec::new(), 48000, 1);
        assert!(clip.is_empty());
        assert_eq!(clip.duration_seconds(), 0.0);
    }
}
