//! Property-based tests for the waveform model and the render core.
//!
//! Uses proptest for the universally-quantified contracts; concrete
//! renders with hand-computed expectations live in the unit tests next to
//! `engine::synth`.

use proptest::prelude::*;
use std::f32::consts::TAU;
use trivoice::engine::HZ_PER_UNIT;
use trivoice::{
    CommandChannel, ControlHandle, PureWave, SynthProcessor, VoiceBank, WaveSum, Waveform,
};

const SAMPLE_RATE: f32 = 44100.0;

/// A processor already sounding one voice at `frequency`, with the
/// control handle still attached for further publishes.
fn tone_processor(frequency: f32) -> (ControlHandle, SynthProcessor) {
    let (mut control, commands) = CommandChannel::with_defaults().split();
    let processor = SynthProcessor::new(SAMPLE_RATE, commands);
    control.set_voices(VoiceBank::new(
        PureWave::new(frequency, PureWave::DEFAULT_AMPLITUDE),
        PureWave::silent(),
        PureWave::silent(),
    ));
    (control, processor)
}

fn render(processor: &mut SynthProcessor, frames: usize) -> Vec<f32> {
    let mut data = vec![0.0f32; frames];
    processor.process(&mut data, 1);
    data
}

/// The un-ramped reference: phase accumulated and wrapped exactly the way
/// the engine does it, starting from phase zero.
fn pure_sine(frequency_hz: f32, frames: usize) -> Vec<f32> {
    let period = 1.0 / frequency_hz;
    let delta_time = 1.0 / SAMPLE_RATE;
    let mut time = 0.0f32;
    (0..frames)
        .map(|_| {
            let current_time = time % period;
            let sample = (TAU * current_time * frequency_hz).sin();
            time = (time + delta_time) % period;
            sample
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A voice's intensity is its amplitude-scaled sine at every angle,
    /// for every positive frequency.
    #[test]
    fn intensity_matches_scaled_sine(
        frequency in 0.01f32..10.0,
        amplitude in 0.0f32..100.0,
        angle in -20.0f32..20.0,
    ) {
        let wave = PureWave::new(frequency, amplitude);
        let expected = amplitude * (angle * frequency).sin();
        prop_assert!((wave.intensity(angle) - expected).abs() <= 1e-3);
    }

    /// The zero-frequency sentinel silences the voice for any amplitude
    /// and any angle.
    #[test]
    fn zero_frequency_is_silent(
        amplitude in 0.0f32..100.0,
        angle in -20.0f32..20.0,
    ) {
        let wave = PureWave::new(0.0, amplitude);
        prop_assert_eq!(wave.intensity(angle), 0.0);
        prop_assert_eq!(wave.max_amplitude(), 0.0);
    }

    /// Construction clamps negative inputs instead of letting them reach
    /// the evaluation path.
    #[test]
    fn construction_never_yields_negative_fields(
        frequency in -10.0f32..10.0,
        amplitude in -100.0f32..100.0,
    ) {
        let wave = PureWave::new(frequency, amplitude);
        prop_assert!(wave.frequency() >= 0.0);
        prop_assert!(wave.max_amplitude() >= 0.0);
    }

    /// The summed view equals the arithmetic sum of its parts at every
    /// angle, for all three-tuples of voices.
    #[test]
    fn summation_is_pointwise(
        fa in 0.0f32..10.0, ma in 0.0f32..50.0,
        fb in 0.0f32..10.0, mb in 0.0f32..50.0,
        fc in 0.0f32..10.0, mc in 0.0f32..50.0,
        angle in -20.0f32..20.0,
    ) {
        let a = PureWave::new(fa, ma);
        let b = PureWave::new(fb, mb);
        let c = PureWave::new(fc, mc);
        let sum = WaveSum::new(a, b, c);

        let expected = a.intensity(angle) + b.intensity(angle) + c.intensity(angle);
        prop_assert_eq!(sum.intensity(angle), expected);
        prop_assert_eq!(
            sum.max_amplitude(),
            a.max_amplitude() + b.max_amplitude() + c.max_amplitude()
        );
    }

    /// With the target equal to the sounding frequency, a render call is
    /// bit-identical to the pure, un-ramped sine at that frequency: a
    /// zero ramp leaves no trace.
    #[test]
    fn unramped_render_equals_pure_sine(frequency in 0.5f32..10.0) {
        let (_control, mut synth) = tone_processor(frequency);
        let out = render(&mut synth, 512);
        prop_assert_eq!(out, pure_sine(frequency * HZ_PER_UNIT, 512));
    }

    /// Two consecutive render calls with no intervening publish match one
    /// call of double the frame count: no seam at the buffer boundary.
    #[test]
    fn consecutive_renders_have_no_seam(
        frequency in 0.5f32..10.0,
        frames in 64usize..512,
    ) {
        let (_control_a, mut split) = tone_processor(frequency);
        let (_control_b, mut whole) = tone_processor(frequency);

        let mut stitched = render(&mut split, frames);
        stitched.extend(render(&mut split, frames));

        prop_assert_eq!(stitched, render(&mut whole, frames * 2));
    }

    /// Publishing a zero frequency fades across one old period and then
    /// renders literal silence, never a hard cut.
    #[test]
    fn fade_to_silence_is_monotone(period_frames in 50usize..200) {
        // Pick the frequency so one period is a whole number of frames;
        // the silencing publish then lands at a phase wrap and the fade
        // spans the following period cleanly.
        let frequency_hz = SAMPLE_RATE / period_frames as f32;
        let frequency = frequency_hz / HZ_PER_UNIT;

        let (mut control, mut synth) = tone_processor(frequency);
        let _tone = render(&mut synth, period_frames);

        control.set_voices(VoiceBank::silent());
        let fade = render(&mut synth, period_frames);

        // The envelope peaks mid-period and decays monotonically through
        // the second half, ending near zero.
        let tail = period_frames / 2 + 2;
        for pair in fade[tail..].windows(2) {
            prop_assert!(
                pair[1].abs() <= pair[0].abs() + 1e-4,
                "fade envelope rose: {} -> {}",
                pair[0],
                pair[1]
            );
        }
        // The last fade sample sits within a frame or two of the wrap, so
        // its magnitude is a couple of cycle-fractions of full scale.
        let end_bound = 2.5 * TAU / period_frames as f32;
        prop_assert!(fade[period_frames - 1].abs() < end_bound);

        // Once the zero target commits, the slot is silent for good.
        let after = render(&mut synth, period_frames);
        for &sample in &after {
            prop_assert_eq!(sample, 0.0);
        }
    }

    /// Every render stays finite and inside the headroom of three summed
    /// unit voices, whatever bank is published.
    #[test]
    fn render_output_is_bounded(
        fa in 0.0f32..10.0,
        fb in 0.0f32..10.0,
        fc in 0.0f32..10.0,
        frames in 64usize..512,
    ) {
        let (mut control, commands) = CommandChannel::with_defaults().split();
        let mut synth = SynthProcessor::new(SAMPLE_RATE, commands);
        control.set_voices(VoiceBank::new(
            PureWave::new(fa, PureWave::DEFAULT_AMPLITUDE),
            PureWave::new(fb, PureWave::DEFAULT_AMPLITUDE),
            PureWave::new(fc, PureWave::DEFAULT_AMPLITUDE),
        ));

        let out = render(&mut synth, frames);
        for &sample in &out {
            prop_assert!(sample.is_finite());
            prop_assert!(sample.abs() <= 3.0 + 1e-4);
        }
    }
}
