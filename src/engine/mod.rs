//! Engine module
//!
//! The real-time side of the crate: the command channel from the control
//! surface, the render core, and the cpal output sink that drives it.

pub mod audio_engine;
pub mod channels;
pub mod commands;
pub mod synth;

pub use audio_engine::{AudioEngine, AudioError, DeviceInfo};
pub use channels::{CommandChannel, ControlHandle, SynthHandle, DEFAULT_COMMAND_CAPACITY};
pub use commands::SynthCommand;
pub use synth::{SampleShape, SynthProcessor, HZ_PER_UNIT};
