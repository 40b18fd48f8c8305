//! Voice bank and playback state.
//!
//! The bank is the unit of publication: the control surface always replaces
//! all three slots at once, which is what lets the engine treat an update
//! as atomic.

use super::wave::{PureWave, WaveSum};

/// The three voices the user is currently shaping, in fixed slots A, B, C.
///
/// Slot order identifies the control that owns each voice and nothing
/// more. Equality is structural: two banks are equal when all three slots
/// are. `Copy` keeps a publish down to a handful of memory writes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceBank {
    a: PureWave,
    b: PureWave,
    c: PureWave,
}

impl VoiceBank {
    /// Builds a bank from three explicit voices.
    pub fn new(a: PureWave, b: PureWave, c: PureWave) -> Self {
        Self { a, b, c }
    }

    /// Builds a bank with each slot either audible at the defaults or
    /// silenced. This is the only supported way to disable a voice.
    pub fn with_enabled(a: bool, b: bool, c: bool) -> Self {
        let voice = |enabled: bool| {
            if enabled {
                PureWave::default()
            } else {
                PureWave::silent()
            }
        };
        Self::new(voice(a), voice(b), voice(c))
    }

    /// All three slots silenced. The engine starts from this bank.
    pub fn silent() -> Self {
        Self::with_enabled(false, false, false)
    }

    /// Slot A.
    pub fn a(&self) -> PureWave {
        self.a
    }

    /// Slot B.
    pub fn b(&self) -> PureWave {
        self.b
    }

    /// Slot C.
    pub fn c(&self) -> PureWave {
        self.c
    }

    /// The slots in order, for code that treats them uniformly.
    pub fn slots(&self) -> [PureWave; 3] {
        [self.a, self.b, self.c]
    }

    /// The summed view the visual renderer draws. Rebuilt on every call so
    /// it can never go stale.
    pub fn sum(&self) -> WaveSum {
        WaveSum::new(self.a, self.b, self.c)
    }
}

impl Default for VoiceBank {
    /// Three audible voices at the default frequency and amplitude.
    fn default() -> Self {
        Self::with_enabled(true, true, true)
    }
}

/// What the control surface tracks: whether sound should be audible, and
/// which bank is selected. `is_playing` gates the output volume only; the
/// render loop keeps running (and keeps accumulating phase) either way, so
/// resuming playback does not click.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub voices: VoiceBank,
}

impl PlaybackState {
    /// Not playing, with the given bank selected.
    pub fn new(voices: VoiceBank) -> Self {
        Self {
            is_playing: false,
            voices,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(VoiceBank::default())
    }
}
