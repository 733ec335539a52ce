use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};

use emuchip::{Config, Emulator, FrameExchange, ShiftQuirk, KEY_COUNT};

use frontend::clock::Clock;
use frontend::screen::{self, Screen};
use frontend::sound::{Sound, ToneSwitch};

mod frontend;

// Separately:
// CPU: 700 times per second by default
// Display: 60 times per second
// Timer: 60 times per second

#[derive(Parser)]
#[command(name = "emuchip")]
#[command(about = "CHIP-8 virtual machine")]
struct Cli {
    #[arg(help = "ROM image to run")]
    rom: PathBuf,

    #[arg(long, default_value_t = 700, help = "Instructions executed per second")]
    hz: u32,

    #[arg(long, default_value_t = 16, help = "Window scale: 1, 2, 4, 8, 16 or 32")]
    scale: u8,

    #[arg(long, value_enum, default_value_t = Shift::Reference, help = "8XY6/8XYE operand")]
    shift: Shift,

    #[arg(long, help = "Seed for the random number instruction")]
    seed: Option<u64>,

    #[arg(long, help = "Disable audio")]
    mute: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shift {
    Reference,
    Vy,
    InPlace,
}

impl From<Shift> for ShiftQuirk {
    fn from(shift: Shift) -> Self {
        match shift {
            Shift::Reference => ShiftQuirk::Reference,
            Shift::Vy => ShiftQuirk::Vy,
            Shift::InPlace => ShiftQuirk::InPlace,
        }
    }
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            shift: self.shift.into(),
            seed: self.seed,
        }
    }
}

/// State shared between the window thread and the CPU thread.
struct Shared {
    frames: FrameExchange,
    keys: Mutex<[bool; KEY_COUNT]>,
    running: AtomicBool,
    beep: Arc<AtomicBool>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.hz == 0 {
        return Err(anyhow!("--hz must be at least 1"));
    }
    let scale = screen::scale_from(cli.scale)
        .ok_or_else(|| anyhow!("unsupported scale {}", cli.scale))?;

    let program = std::fs::read(&cli.rom)
        .with_context(|| format!("failed to read {}", cli.rom.display()))?;
    let mut emu = Emulator::new(cli.config());
    emu.load_program(&program)
        .with_context(|| format!("failed to load {}", cli.rom.display()))?;
    info!(rom = %cli.rom.display(), bytes = program.len(), hz = cli.hz, "loaded");

    let sound = if cli.mute {
        None
    } else {
        match Sound::new() {
            Ok(sound) => Some(sound),
            Err(err) => {
                warn!("audio unavailable, running muted: {err:#}");
                None
            }
        }
    };

    let shared = Arc::new(Shared {
        frames: FrameExchange::new(),
        keys: Mutex::new([false; KEY_COUNT]),
        running: AtomicBool::new(true),
        beep: sound
            .as_ref()
            .map_or_else(|| Arc::new(AtomicBool::new(false)), Sound::gate),
    });

    let cpu = {
        let shared = Arc::clone(&shared);
        let hz = cli.hz;
        thread::spawn(move || run_cpu(emu, &shared, hz))
    };

    let mut screen = Screen::new(scale)?;
    while screen.is_running() && shared.running.load(Ordering::Relaxed) {
        *shared.keys.lock().unwrap_or_else(PoisonError::into_inner) = screen.keypad();
        screen.sync(shared.frames.take())?;
    }
    shared.running.store(false, Ordering::Relaxed);

    cpu.join()
        .map_err(|_| anyhow!("cpu thread panicked"))?
        .context("program stopped")?;
    Ok(())
}

/// Steps the machine at `hz` instructions per second and ticks its timers at
/// 60 Hz until the window closes or the program faults.
fn run_cpu(mut emu: Emulator, shared: &Shared, hz: u32) -> emuchip::Result<()> {
    let mut clock = Clock::new(Instant::now(), hz);
    let mut tone = ToneSwitch::new(Arc::clone(&shared.beep));

    let result = loop {
        if !shared.running.load(Ordering::Relaxed) {
            break Ok(());
        }

        let due = clock.due(Instant::now());
        if due.step {
            let keys = *shared.keys.lock().unwrap_or_else(PoisonError::into_inner);
            emu.set_input(keys);
            if let Err(err) = emu.step() {
                break Err(err);
            }
            emu.publish_frame(&shared.frames);
            tone.after_step(emu.sound_active());
        }
        for _ in 0..due.ticks {
            let expired = emu.tick_timers();
            if expired {
                debug!("sound timer expired");
            }
            tone.after_tick(expired);
        }

        if let Some(wait) = clock.next_wake().checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    };

    drop(tone);
    shared.running.store(false, Ordering::Relaxed);
    result
}
