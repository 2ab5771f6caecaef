//! Microphone recording
//!
//! Opens the default input device in its native sample format, converts
//! every frame to mono `f32` in the stream callback and forwards chunks over a
//! crossbeam channel. The UI thread drains the channel into the ring buffer.

use crate::{ChatError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Audio input device information
#[derive(Debug, Clone)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub is_default: bool,
}

/// Flags shared with the stream callback
#[derive(Default)]
struct CaptureState {
    active: AtomicBool,
    /// Mono samples forwarded since the last start
    forwarded: AtomicUsize,
    /// Chunks lost because the channel was full
    dropped_chunks: AtomicUsize,
}

/// Microphone handle for one question at a time
pub struct AudioRecorder {
    device: Device,
    device_name: String,
    config: StreamConfig,
    sample_format: SampleFormat,
    stream: Option<Stream>,
    capture: Arc<CaptureState>,
}

impl AudioRecorder {
    /// Open the default input device
    ///
    /// # Errors
    /// Returns `ChatError::AudioDevice` if there is no microphone or its
    /// default configuration cannot be read.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| ChatError::AudioDevice("No microphone found".into()))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let supported = device.default_input_config().map_err(|e| {
            ChatError::AudioDevice(format!("Microphone configuration unavailable: {}", e))
        })?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();

        info!(
            "Microphone '{}': {}Hz, {} channel(s), {:?}",
            device_name, config.sample_rate.0, config.channels, sample_format
        );

        Ok(Self {
            device,
            device_name,
            config,
            sample_format,
            stream: None,
            capture: Arc::new(CaptureState::default()),
        })
    }

    /// Start capturing; mono chunks are sent through `audio_tx`
    pub fn start(&mut self, audio_tx: Sender<Vec<f32>>) -> Result<()> {
        if self.is_recording() {
            warn!("Microphone already open, ignoring start request");
            return Ok(());
        }

        self.capture.forwarded.store(0, Ordering::SeqCst);
        self.capture.dropped_chunks.store(0, Ordering::SeqCst);

        let stream = match self.sample_format {
            SampleFormat::I16 => self.build_stream::<i16>(audio_tx)?,
            SampleFormat::U16 => self.build_stream::<u16>(audio_tx)?,
            SampleFormat::I32 => self.build_stream::<i32>(audio_tx)?,
            SampleFormat::F32 => self.build_stream::<f32>(audio_tx)?,
            other => {
                return Err(ChatError::AudioDevice(format!(
                    "Unsupported sample format {:?}",
                    other
                )))
            }
        };

        stream
            .play()
            .map_err(|e| ChatError::AudioDevice(format!("Could not start microphone: {}", e)))?;

        self.capture.active.store(true, Ordering::SeqCst);
        self.stream = Some(stream);
        debug!("Capturing from '{}'", self.device_name);
        Ok(())
    }

    fn build_stream<T>(&self, audio_tx: Sender<Vec<f32>>) -> Result<Stream>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let channels = usize::from(self.config.channels.max(1));
        let capture = Arc::clone(&self.capture);

        self.device
            .build_input_stream(
                &self.config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    if !capture.active.load(Ordering::Relaxed) {
                        return;
                    }

                    let mono = downmix(data, channels);
                    let len = mono.len();
                    if audio_tx.try_send(mono).is_ok() {
                        capture.forwarded.fetch_add(len, Ordering::Relaxed);
                    } else {
                        capture.dropped_chunks.fetch_add(1, Ordering::Relaxed);
                    }
                },
                |err| error!("Microphone stream error: {}", err),
                None,
            )
            .map_err(|e| ChatError::AudioDevice(format!("Could not open microphone stream: {}", e)))
    }

    /// Stop capturing and release the stream
    pub fn stop(&mut self) -> Result<()> {
        self.capture.active.store(false, Ordering::SeqCst);

        if self.stream.take().is_some() {
            let dropped = self.capture.dropped_chunks.load(Ordering::SeqCst);
            if dropped > 0 {
                warn!("{} audio chunk(s) dropped during capture", dropped);
            }
            info!(
                "Microphone closed after {:.1}s of audio",
                self.captured_seconds()
            );
        }

        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.capture.active.load(Ordering::SeqCst)
    }

    /// Sample rate of the captured audio in Hz
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Channel count of the device; captured chunks are always mono
    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Seconds of mono audio forwarded since the last start
    pub fn captured_seconds(&self) -> f32 {
        self.capture.forwarded.load(Ordering::SeqCst) as f32 / self.sample_rate().max(1) as f32
    }
}

impl Drop for AudioRecorder {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Average interleaved frames down to one channel
fn downmix<T>(data: &[T], channels: usize) -> Vec<f32>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    if channels <= 1 {
        return data.iter().map(|&s| s.to_sample::<f32>()).collect();
    }

    data.chunks(channels)
        .map(|frame| frame.iter().map(|&s| s.to_sample::<f32>()).sum::<f32>() / frame.len() as f32)
        .collect()
}

/// List available microphones
pub fn list_input_devices() -> Vec<AudioDeviceInfo> {
    let host = cpal::default_host();
    let default_name = host.default_input_device().and_then(|d| d.name().ok());

    match host.input_devices() {
        Ok(devices) => devices
            .filter_map(|device| device.name().ok())
            .map(|name| AudioDeviceInfo {
                is_default: default_name.as_deref() == Some(name.as_str()),
                name,
            })
            .collect(),
        Err(e) => {
            debug!("Could not enumerate input devices: {}", e);
            Vec::new()
        }
    }
}
