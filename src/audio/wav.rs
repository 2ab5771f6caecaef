use crate::{ChatError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

/// Encode samples as a 16-bit PCM WAV file in memory
///
/// # Arguments
/// * `samples` - Audio samples (f32, range -1.0 to 1.0)
/// * `sample_rate` - Sample rate in Hz
/// * `channels` - Number of channels
pub fn encode_wav(samples: &[f32], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(|e| {
            ChatError::AudioEncoding(format!("Failed to create WAV writer: {}", e))
        })?;

        for &sample in samples {
            let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(sample_i16).map_err(|e| {
                ChatError::AudioEncoding(format!("Failed to write sample: {}", e))
            })?;
        }

        writer.finalize().map_err(|e| {
            ChatError::AudioEncoding(format!("Failed to finalize WAV data: {}", e))
        })?;
    }

    let bytes = cursor.into_inner();
    debug!(
        "Encoded {} samples at {} Hz into {} WAV bytes",
        samples.len(),
        sample_rate,
        bytes.len()
    );
    Ok(bytes)
}
