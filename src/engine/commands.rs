//! Engine Commands
//!
//! Defines the messages that flow from the control thread to the render
//! thread. All types here must be Send + 'static for safe cross-thread
//! communication, and each message carries its full payload by value:
//! a [`SynthCommand::SetVoices`] holds the entire bank, so the renderer
//! adopts all three slots from one message and can never observe a torn
//! update.

use crate::dsp::VoiceBank;

/// Commands sent from the control surface to the render thread.
/// These are drained non-blocking at the top of each render call; when
/// several have queued up, later values supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynthCommand {
    /// Replace the published voice bank, all three slots at once.
    SetVoices(VoiceBank),

    /// Set the output level. Values outside `[0, 1]` are clamped; a
    /// non-finite value is ignored.
    SetVolume(f32),

    /// Gate the output level without stopping the render loop, so phase
    /// keeps accumulating and resuming does not click.
    SetPlaying(bool),

    /// Zero every slot's phase accumulator.
    ResetPhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_debug() {
        let cmd = SynthCommand::SetPlaying(true);
        assert!(format!("{:?}", cmd).contains("SetPlaying"));
    }

    #[test]
    fn test_set_voices_carries_the_whole_bank() {
        let bank = VoiceBank::with_enabled(true, false, true);
        let cmd = SynthCommand::SetVoices(bank);
        if let SynthCommand::SetVoices(carried) = cmd {
            assert_eq!(carried, bank);
        } else {
            panic!("wrong variant");
        }
    }

    #[test]
    fn test_command_copy() {
        let cmd = SynthCommand::SetVolume(0.2);
        let copied = cmd;
        assert_eq!(copied, SynthCommand::SetVolume(0.2));
        assert_eq!(cmd, copied);
    }

    #[test]
    fn test_command_is_send() {
        fn assert_send<T: Send + 'static>() {}
        assert_send::<SynthCommand>();
    }
}
