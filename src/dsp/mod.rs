//! DSP module
//!
//! The pure side of the crate: the waveform model the visual renderer
//! samples, the voice bank the control surface publishes, and the gain
//! smoother the engine applies.

pub mod smoothed_value;
pub mod voices;
pub mod wave;

pub use smoothed_value::SmoothedValue;
pub use voices::{PlaybackState, VoiceBank};
pub use wave::{trace_path, PureWave, WaveSum, Waveform};
