//! Render core.
//!
//! `SynthProcessor` runs inside the audio callback and turns the published
//! voice bank into samples. The hard requirement is that frequency changes
//! arriving from the control thread never produce an audible discontinuity:
//! each render call reconciles the frequency that was actually sounding
//! with the latest published target by ramping across one period of the
//! old frequency, then adopts the target as the next call's baseline.
//!
//! Everything on the render path is plain arithmetic: no locks, no
//! allocations, no error paths.

use std::f32::consts::TAU;

use crate::dsp::SmoothedValue;

use super::channels::SynthHandle;
use super::commands::SynthCommand;

/// Hertz per control-surface frequency unit: a dial value of 4.4 sounds
/// as 440 Hz.
pub const HZ_PER_UNIT: f32 = 100.0;

/// Which sample function the processor evaluates.
///
/// `Triangle` shares the ramp, period, and phase inputs with `Sine` but is
/// not wired to any control; it exists as a configuration option only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SampleShape {
    #[default]
    Sine,
    Triangle,
}

/// Sine sample at `time` for a frequency ramping from `old_hz` toward
/// `old_hz + ramp` across one `period` of the old frequency.
///
/// `percent` is the fraction of the way through the old period, so the
/// ramp completes after exactly one old-period's worth of elapsed phase,
/// never outliving a single oscillation of the previous frequency. The
/// period used for wrapping stays the old one; only the frequency inside
/// the sine ramps.
fn sine_sample(old_hz: f32, ramp: f32, period: f32, time: f32) -> f32 {
    let current_time = time % period;
    let percent = current_time / period;
    let frequency = old_hz + ramp * percent;
    let angle = TAU * current_time;
    (angle * frequency).sin()
}

/// Triangle counterpart of [`sine_sample`] over the same inputs.
fn triangle_sample(old_hz: f32, ramp: f32, period: f32, time: f32) -> f32 {
    let current_time = time % period;
    let percent = current_time / period;
    let frequency = old_hz + ramp * percent;

    let value = current_time * frequency;
    if value < 0.25 {
        value * 4.0
    } else if value < 0.75 {
        2.0 - value * 4.0
    } else {
        value * 4.0 - 4.0
    }
}

/// Per-slot render state: the frequency baseline that is actually
/// sounding, the latest published target, and the phase accumulator.
#[derive(Clone, Copy, Debug)]
struct VoiceRamp {
    /// Baseline in hertz at the start of the current render call. Zero
    /// means the slot is silent.
    current_hz: f32,
    /// Latest published target in hertz.
    target_hz: f32,
    /// Phase accumulator in seconds, wrapped to `[0, period)` of the
    /// baseline frequency.
    time: f32,
}

/// One buffer's reconciliation of a slot, captured before the frame loop
/// so a mid-buffer publish cannot tear it.
#[derive(Clone, Copy, Debug)]
struct RampSegment {
    old_hz: f32,
    ramp: f32,
    period: f32,
}

impl VoiceRamp {
    fn silent() -> Self {
        Self {
            current_hz: 0.0,
            target_hz: 0.0,
            time: 0.0,
        }
    }

    /// Adopts a newly published frequency target.
    ///
    /// A silent slot has no old period to ramp across, so it adopts the
    /// target immediately and enters at phase zero: the first audible
    /// sample is `sin(0)`, continuous with the silence before it. An
    /// audible slot only records the target; the ramp against the
    /// sounding baseline is computed at the next render call.
    fn retarget(&mut self, hz: f32) {
        if self.current_hz == 0.0 {
            self.current_hz = hz;
            self.time = 0.0;
        }
        self.target_hz = hz;
    }

    /// Captures the ramp segment for one buffer. A silent slot yields the
    /// degenerate segment; its infinite period is never materialized.
    fn segment(&self) -> RampSegment {
        if self.current_hz == 0.0 {
            RampSegment {
                old_hz: 0.0,
                ramp: 0.0,
                period: 0.0,
            }
        } else {
            RampSegment {
                old_hz: self.current_hz,
                ramp: self.target_hz - self.current_hz,
                period: 1.0 / self.current_hz,
            }
        }
    }

    /// Produces this slot's sample for one frame and advances the phase
    /// accumulator, wrapping with the old period.
    fn advance(&mut self, segment: RampSegment, shape: SampleShape, delta_time: f32) -> f32 {
        if segment.old_hz == 0.0 {
            return 0.0;
        }

        let sample = match shape {
            SampleShape::Sine => {
                sine_sample(segment.old_hz, segment.ramp, segment.period, self.time)
            }
            SampleShape::Triangle => {
                triangle_sample(segment.old_hz, segment.ramp, segment.period, self.time)
            }
        };

        self.time = (self.time + delta_time) % segment.period;
        sample
    }

    /// Folds the published target into the sounding baseline. Runs after
    /// every buffer, so a ramp never spans more than one render call.
    fn commit(&mut self) {
        self.current_hz = self.target_hz;
    }
}

/// The real-time sample generator.
///
/// Exactly one instance exists per audio stream; it is moved into the
/// callback closure and owns all render state. The control surface reaches
/// it only through the command queue, drained at the top of each render
/// call, which is the single synchronization boundary in the system.
///
/// The processor starts at unity gain with every voice silent; the driver
/// decides when to publish a bank, a volume, and the playing flag.
pub struct SynthProcessor {
    voices: [VoiceRamp; 3],
    /// Smoothed master gain, applied after voice summation.
    gain: SmoothedValue,
    /// Output level the user last asked for; `playing` gates whether the
    /// gain targets it or zero.
    level: f32,
    playing: bool,
    shape: SampleShape,
    /// Seconds per frame, fixed at stream construction.
    delta_time: f32,
    commands: SynthHandle,
}

impl SynthProcessor {
    /// Creates a processor for a stream running at `sample_rate` Hz,
    /// draining commands from `commands`.
    pub fn new(sample_rate: f32, commands: SynthHandle) -> Self {
        Self {
            voices: [VoiceRamp::silent(); 3],
            gain: SmoothedValue::new(1.0, SmoothedValue::DEFAULT_TIME_CONSTANT_MS, sample_rate),
            level: 1.0,
            playing: true,
            shape: SampleShape::Sine,
            delta_time: 1.0 / sample_rate,
            commands,
        }
    }

    /// Selects the sample function. Not reachable from any control; the
    /// baseline behavior is always [`SampleShape::Sine`].
    pub fn set_shape(&mut self, shape: SampleShape) {
        self.shape = shape;
    }

    /// Render entry point, called from the audio callback.
    ///
    /// Fills every channel of the interleaved `data` with the summed mono
    /// signal (each frame's value written identically to all channels).
    /// Infallible by construction: degenerate inputs render nothing, and
    /// the per-frame math has no panic or error path.
    ///
    /// REAL-TIME SAFE: no locks, no allocations, no blocking.
    pub fn process(&mut self, data: &mut [f32], channels: usize) {
        self.drain_commands();

        if channels == 0 || data.is_empty() {
            return;
        }

        let segments = [
            self.voices[0].segment(),
            self.voices[1].segment(),
            self.voices[2].segment(),
        ];
        let shape = self.shape;
        let delta_time = self.delta_time;

        for frame in data.chunks_mut(channels) {
            let mut sum = 0.0;
            for (voice, segment) in self.voices.iter_mut().zip(segments) {
                sum += voice.advance(segment, shape, delta_time);
            }
            let sample = sum * self.gain.next();
            for out in frame.iter_mut() {
                *out = sample;
            }
        }

        for voice in &mut self.voices {
            voice.commit();
        }
    }

    /// Applies every pending command. Later values supersede earlier
    /// ones, so only the latest publish matters to this buffer.
    fn drain_commands(&mut self) {
        while let Some(cmd) = self.commands.recv() {
            match cmd {
                SynthCommand::SetVoices(bank) => {
                    for (voice, wave) in self.voices.iter_mut().zip(bank.slots()) {
                        voice.retarget(wave.frequency() * HZ_PER_UNIT);
                    }
                }
                SynthCommand::SetVolume(volume) => {
                    if volume.is_finite() {
                        self.level = volume.clamp(0.0, 1.0);
                        if self.playing {
                            self.gain.set_target(self.level);
                        }
                    }
                }
                SynthCommand::SetPlaying(playing) => {
                    self.playing = playing;
                    self.gain.set_target(if playing { self.level } else { 0.0 });
                }
                SynthCommand::ResetPhase => {
                    for voice in &mut self.voices {
                        voice.time = 0.0;
                    }
                }
            }
        }
    }
}
