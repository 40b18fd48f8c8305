//! Control Channel
//!
//! Lock-free communication from the control thread to the render thread,
//! built on an rtrb SPSC (single-producer, single-consumer) ring buffer.
//! Data flows one way only: the engine exposes nothing for the control
//! surface to read back.

use rtrb::{Consumer, Producer, RingBuffer};

use crate::dsp::VoiceBank;

use super::commands::SynthCommand;

/// Default capacity of the command queue (control -> render).
pub const DEFAULT_COMMAND_CAPACITY: usize = 1024;

/// The unsplit command queue. Call [`split`](Self::split) to obtain the
/// two thread-bound handles.
pub struct CommandChannel {
    tx: Producer<SynthCommand>,
    rx: Consumer<SynthCommand>,
}

impl CommandChannel {
    /// Creates a channel holding up to `capacity` queued commands.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = RingBuffer::new(capacity);
        Self { tx, rx }
    }

    /// Creates a channel with the default capacity.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_COMMAND_CAPACITY)
    }

    /// Splits into the control-side and render-side handles. The two
    /// halves can be moved to different threads.
    pub fn split(self) -> (ControlHandle, SynthHandle) {
        (ControlHandle { tx: self.tx }, SynthHandle { rx: self.rx })
    }
}

/// Control-side handle: publishes commands toward the render thread.
///
/// The typed methods are fire-and-forget: if the queue is full the command
/// is dropped, which at worst loses an intermediate value the renderer
/// would have superseded on its next drain anyway. Use [`send`](Self::send)
/// when the caller wants to observe a full queue.
pub struct ControlHandle {
    tx: Producer<SynthCommand>,
}

impl ControlHandle {
    /// Queues a command, returning it back if the queue is full.
    ///
    /// Non-blocking; never waits for space.
    pub fn send(&mut self, cmd: SynthCommand) -> Result<(), SynthCommand> {
        self.tx.push(cmd).map_err(|rtrb::PushError::Full(cmd)| cmd)
    }

    /// Publishes a full replacement voice bank.
    pub fn set_voices(&mut self, voices: VoiceBank) {
        let _ = self.tx.push(SynthCommand::SetVoices(voices));
    }

    /// Sets the output level in `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32) {
        let _ = self.tx.push(SynthCommand::SetVolume(volume));
    }

    /// Gates the output on or off via the volume path.
    pub fn set_playing(&mut self, playing: bool) {
        let _ = self.tx.push(SynthCommand::SetPlaying(playing));
    }

    /// Zeroes every voice's phase accumulator.
    pub fn reset_phase(&mut self) {
        let _ = self.tx.push(SynthCommand::ResetPhase);
    }

    /// How many commands can still be queued.
    pub fn slots_available(&self) -> usize {
        self.tx.slots()
    }

    /// Whether the queue is full.
    pub fn is_full(&self) -> bool {
        self.tx.is_full()
    }
}

/// Render-side handle: drains commands inside the audio callback.
///
/// All methods are real-time safe: non-blocking, no allocations.
pub struct SynthHandle {
    rx: Consumer<SynthCommand>,
}

impl SynthHandle {
    /// Takes the next pending command, if any.
    pub fn recv(&mut self) -> Option<SynthCommand> {
        self.rx.pop().ok()
    }

    /// How many commands are waiting.
    pub fn pending(&self) -> usize {
        self.rx.slots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_receive() {
        let (mut control, mut synth) = CommandChannel::new(8).split();

        assert!(control.send(SynthCommand::SetPlaying(true)).is_ok());
        assert!(matches!(synth.recv(), Some(SynthCommand::SetPlaying(true))));
        assert!(synth.recv().is_none());
    }

    #[test]
    fn test_full_queue_returns_the_command() {
        let (mut control, _synth) = CommandChannel::new(2).split();

        assert!(control.send(SynthCommand::SetPlaying(true)).is_ok());
        assert!(control.send(SynthCommand::SetPlaying(false)).is_ok());
        assert!(control.is_full());

        let result = control.send(SynthCommand::ResetPhase);
        assert!(matches!(result, Err(SynthCommand::ResetPhase)));
    }

    #[test]
    fn test_typed_sends_are_lossy_on_full() {
        let (mut control, mut synth) = CommandChannel::new(1).split();

        control.set_playing(true);
        control.set_playing(false); // dropped, queue is full

        assert!(synth.recv().is_some());
        assert!(synth.recv().is_none());
    }

    #[test]
    fn test_set_voices_arrives_whole() {
        let (mut control, mut synth) = CommandChannel::with_defaults().split();
        let bank = VoiceBank::with_enabled(false, true, false);

        control.set_voices(bank);

        match synth.recv() {
            Some(SynthCommand::SetVoices(received)) => assert_eq!(received, bank),
            other => panic!("expected SetVoices, got {:?}", other),
        }
    }

    #[test]
    fn test_commands_drain_in_order() {
        let (mut control, mut synth) = CommandChannel::with_defaults().split();

        control.set_volume(0.2);
        control.set_playing(true);
        control.reset_phase();

        assert_eq!(synth.pending(), 3);
        assert!(matches!(synth.recv(), Some(SynthCommand::SetVolume(_))));
        assert!(matches!(synth.recv(), Some(SynthCommand::SetPlaying(true))));
        assert!(matches!(synth.recv(), Some(SynthCommand::ResetPhase)));
        assert_eq!(synth.pending(), 0);
    }

    #[test]
    fn test_slots_available() {
        let (mut control, _synth) = CommandChannel::new(10).split();
        assert_eq!(control.slots_available(), 10);
        control.set_playing(true);
        assert_eq!(control.slots_available(), 9);
    }

    #[test]
    fn test_handles_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ControlHandle>();
        assert_send::<SynthHandle>();
    }
}
