//! Trivoice - play a three-voice additive sine tone from the command line.
//!
//! Thin driver around the library: constructs the one engine instance for
//! the process, publishes the requested voice bank, and keeps the control
//! thread alive until the duration elapses or Ctrl+C arrives. Stopping is
//! a volume change; the stream only tears down at exit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use trivoice::{AudioEngine, CommandChannel, PlaybackState, PureWave, SynthProcessor, VoiceBank};

#[derive(Parser)]
#[command(name = "trivoice", about = "Three-voice additive sine synthesizer", long_about = None)]
struct Cli {
    /// Voice A frequency in control units (0-10; 4.4 sounds as 440 Hz)
    #[arg(long, default_value_t = PureWave::DEFAULT_FREQUENCY)]
    freq_a: f32,

    /// Voice B frequency in control units
    #[arg(long, default_value_t = PureWave::DEFAULT_FREQUENCY)]
    freq_b: f32,

    /// Voice C frequency in control units
    #[arg(long, default_value_t = PureWave::DEFAULT_FREQUENCY)]
    freq_c: f32,

    /// Disable voice A
    #[arg(long)]
    mute_a: bool,

    /// Disable voice B
    #[arg(long)]
    mute_b: bool,

    /// Disable voice C
    #[arg(long)]
    mute_c: bool,

    /// Output volume (0-1)
    #[arg(long, default_value_t = 0.2)]
    volume: f32,

    /// Stop after this many seconds (default: play until Ctrl+C)
    #[arg(long)]
    duration: Option<f32>,

    /// Sweep voice A toward this frequency over two seconds, to hear the
    /// ramp reconcile a stream of publishes
    #[arg(long)]
    sweep_a: Option<f32>,

    /// List output devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Output device index (from --list-devices)
    #[arg(long)]
    device: Option<usize>,
}

fn voice(enabled: bool, frequency: f32) -> PureWave {
    if enabled {
        PureWave::new(frequency, PureWave::DEFAULT_AMPLITUDE)
    } else {
        PureWave::silent()
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut engine = AudioEngine::new().context("failed to open an audio output device")?;

    if cli.list_devices {
        for info in engine.enumerate_devices() {
            let marker = if info.is_default { " (default)" } else { "" };
            println!("{:>3}  {}{}", info.index, info.name, marker);
        }
        return Ok(());
    }

    if let Some(index) = cli.device {
        engine
            .select_device(index)
            .context("failed to select the requested output device")?;
    }

    let bank = |freq_a: f32| {
        VoiceBank::new(
            voice(!cli.mute_a, freq_a),
            voice(!cli.mute_b, cli.freq_b),
            voice(!cli.mute_c, cli.freq_c),
        )
    };

    let (mut control, commands) = CommandChannel::with_defaults().split();
    let processor = SynthProcessor::new(engine.sample_rate() as f32, commands);
    engine
        .start(processor)
        .context("failed to start the audio stream")?;

    let mut state = PlaybackState::new(bank(cli.freq_a));
    control.set_volume(cli.volume);
    control.set_voices(state.voices);
    state.is_playing = true;
    control.set_playing(state.is_playing);

    println!(
        "Playing on {} at {} Hz. Press Ctrl+C to stop.",
        engine.current_device_name(),
        engine.sample_rate()
    );

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })
    .context("failed to install the Ctrl+C handler")?;

    if let Some(target) = cli.sweep_a {
        const SWEEP_STEPS: u32 = 40;
        for step in 1..=SWEEP_STEPS {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
            let progress = step as f32 / SWEEP_STEPS as f32;
            state.voices = bank(cli.freq_a + (target - cli.freq_a) * progress);
            control.set_voices(state.voices);
        }
    }

    let started = Instant::now();
    while running.load(Ordering::SeqCst) {
        if let Some(limit) = cli.duration {
            if started.elapsed() >= Duration::from_secs_f32(limit.max(0.0)) {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    state.is_playing = false;
    control.set_playing(state.is_playing);
    // Give the gain glide time to reach silence before the stream drops.
    std::thread::sleep(Duration::from_millis(100));
    engine.stop().context("failed to stop the audio stream")?;

    Ok(())
}
