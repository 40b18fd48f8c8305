//! Output gain smoothing.
//!
//! One-pole exponential smoothing for the master gain. Playback stop and
//! start are volume changes by contract, so the gain is the one place a
//! step input could click; smoothing it sample-by-sample removes that.

/// A value that glides toward its target instead of stepping.
///
/// Exponential (one-pole lowpass) smoothing: the value covers about 63% of
/// the remaining distance per time constant. The advancing side runs on
/// the render thread, so everything here is branch-and-multiply only.
#[derive(Clone, Debug)]
pub struct SmoothedValue {
    /// Current smoothed value.
    current: f32,
    /// Target the value is gliding toward.
    target: f32,
    /// Per-sample smoothing coefficient (0 = instant, closer to 1 = slower).
    smoothing_factor: f32,
}

impl SmoothedValue {
    /// Default time constant in milliseconds. Ten milliseconds keeps a
    /// full-scale volume step inaudible without making the control feel
    /// laggy.
    pub const DEFAULT_TIME_CONSTANT_MS: f32 = 10.0;

    /// Creates a smoothed value resting at `initial`.
    pub fn new(initial: f32, time_constant_ms: f32, sample_rate: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            smoothing_factor: Self::calc_smoothing_factor(time_constant_ms, sample_rate),
        }
    }

    /// factor = exp(-1 / (time constant in samples)); a non-positive time
    /// constant or sample rate degrades to instant stepping.
    fn calc_smoothing_factor(time_constant_ms: f32, sample_rate: f32) -> f32 {
        if time_constant_ms <= 0.0 || sample_rate <= 0.0 {
            return 0.0;
        }
        let time_constant_samples = time_constant_ms * 0.001 * sample_rate;
        if time_constant_samples < 1.0 {
            return 0.0;
        }
        (-1.0 / time_constant_samples).exp()
    }

    /// Sets a new target to glide toward.
    #[inline]
    pub fn set_target(&mut self, value: f32) {
        self.target = value;
    }

    /// The target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// The current smoothed value, without advancing.
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Advances by one sample and returns the new value.
    ///
    /// Snaps to the target once within 1e-4 of it, so a settled gain
    /// multiplies as an exact constant instead of a near value that keeps
    /// accumulating rounding.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let diff = self.current - self.target;
        if diff.abs() <= 1e-4 {
            self.current = self.target;
        } else {
            self.current = self.target + self.smoothing_factor * diff;
        }
        self.current
    }

    /// Jumps to `value` with no glide. For initial setup only; anything
    /// audible should go through [`set_target`](Self::set_target).
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    /// Whether the value is still gliding toward its target.
    #[inline]
    pub fn is_smoothing(&self) -> bool {
        (self.current - self.target).abs() > 1e-4
    }
}
