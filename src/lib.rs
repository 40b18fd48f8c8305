//! Trivoice - a three-voice additive sine synthesizer.
//!
//! The user shapes an audible tone from three independently tunable sine
//! voices and sees the summed waveform drawn by an external renderer. This
//! crate provides the pure waveform model (`dsp`) and the real-time render
//! core with its click-free frequency ramping (`engine`); drawing and the
//! interactive controls are consumers of those interfaces, not part of the
//! crate.

pub mod dsp;
pub mod engine;

pub use dsp::{PlaybackState, PureWave, SmoothedValue, VoiceBank, WaveSum, Waveform};
pub use engine::{
    AudioEngine, AudioError, CommandChannel, ControlHandle, SampleShape, SynthCommand,
    SynthHandle, SynthProcessor,
};
