//! Audio Engine
//!
//! Manages the cpal audio stream and interfaces with system audio hardware.
//! The audio callback runs in a separate thread and must be real-time safe;
//! everything time-critical lives in the [`SynthProcessor`] moved into it.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, SampleRate, Stream, StreamConfig};
use tracing::{error, info};

use super::synth::SynthProcessor;

/// Errors that can occur during audio engine operation.
#[derive(Debug, Clone)]
pub enum AudioError {
    /// No audio output device was found.
    NoOutputDevice,
    /// Failed to get device configuration.
    ConfigurationFailed(String),
    /// Failed to create the audio stream.
    StreamCreationFailed(String),
    /// Failed to start/stop playback.
    StreamPlaybackFailed(String),
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::NoOutputDevice => write!(f, "No audio output device found"),
            AudioError::ConfigurationFailed(msg) => {
                write!(f, "Failed to get device configuration: {}", msg)
            }
            AudioError::StreamCreationFailed(msg) => {
                write!(f, "Failed to create audio stream: {}", msg)
            }
            AudioError::StreamPlaybackFailed(msg) => {
                write!(f, "Failed to control audio playback: {}", msg)
            }
        }
    }
}

impl std::error::Error for AudioError {}

/// Information about an audio output device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Human-readable device name.
    pub name: String,
    /// Whether this is the default output device.
    pub is_default: bool,
    /// Index in the device list (for selection).
    pub index: usize,
}

/// The audio output sink.
///
/// Owns the cpal host, device, and stream, and pulls buffers from a
/// [`SynthProcessor`] on the device's schedule. Construct exactly one per
/// process and pass it to whoever drives playback; failure to open a
/// device is reported, not fatal, and simply means the render entry point
/// is never invoked.
pub struct AudioEngine {
    host: Host,
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl AudioEngine {
    /// Creates an engine on the default output device.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| AudioError::ConfigurationFailed(e.to_string()))?;

        let sample_rate = supported_config.sample_rate().0;
        let config = StreamConfig {
            channels: supported_config.channels(),
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels = config.channels,
            "opened audio output device"
        );

        Ok(Self {
            host,
            device,
            config,
            stream: None,
        })
    }

    /// Get information about all available output devices.
    pub fn enumerate_devices(&self) -> Vec<DeviceInfo> {
        let default_name = self
            .host
            .default_output_device()
            .and_then(|d| d.name().ok());

        self.host
            .output_devices()
            .map(|devices| {
                devices
                    .enumerate()
                    .filter_map(|(index, device)| {
                        device.name().ok().map(|name| DeviceInfo {
                            is_default: Some(&name) == default_name.as_ref(),
                            name,
                            index,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the name of the currently selected device.
    pub fn current_device_name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "Unknown".to_string())
    }

    /// Select a different output device by index.
    ///
    /// Stops the current stream if one is running (the processor inside it
    /// is dropped with the stream). Call [`start`](Self::start) with a
    /// fresh processor to begin playback on the new device.
    pub fn select_device(&mut self, index: usize) -> Result<(), AudioError> {
        if self.stream.is_some() {
            self.stop()?;
        }

        let device = self
            .host
            .output_devices()
            .map_err(|e| AudioError::ConfigurationFailed(e.to_string()))?
            .nth(index)
            .ok_or(AudioError::NoOutputDevice)?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| AudioError::ConfigurationFailed(e.to_string()))?;

        let sample_rate = supported_config.sample_rate().0;
        let config = StreamConfig {
            channels: supported_config.channels(),
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        info!(device = %device.name().unwrap_or_else(|_| "Unknown".to_string()), "selected output device");

        self.device = device;
        self.config = config;
        Ok(())
    }

    /// Get the current stream configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Get the sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Get the number of output channels.
    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Start the audio stream, moving `processor` into the callback.
    ///
    /// The processor is owned by the callback from here on; the control
    /// surface keeps reaching it through its command queue. Errors raised
    /// by the running stream are logged, never propagated into the
    /// callback.
    pub fn start(&mut self, processor: SynthProcessor) -> Result<(), AudioError> {
        if self.stream.is_some() {
            return Err(AudioError::StreamPlaybackFailed(
                "stream already running".to_string(),
            ));
        }

        let channels = self.config.channels as usize;
        let mut processor = processor;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    processor.process(data, channels);
                },
                move |err| {
                    error!("audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::StreamCreationFailed(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlaybackFailed(e.to_string()))?;

        info!("audio stream started");
        self.stream = Some(stream);
        Ok(())
    }

    /// Stop the audio stream, dropping the processor inside it.
    pub fn stop(&mut self) -> Result<(), AudioError> {
        if let Some(stream) = self.stream.take() {
            stream
                .pause()
                .map_err(|e| AudioError::StreamPlaybackFailed(e.to_string()))?;
            info!("audio stream stopped");
        }
        Ok(())
    }

    /// Check if the audio stream is currently running.
    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }
}
