use std::path::PathBuf;

use clap::Parser;

use chip8_core::{Config, INSTRUCTIONS_PER_FRAME};

mod keymap;
mod run;

/// Chip-8 interpreter
///
/// The keypad is mapped to the left four columns of the keyboard:
/// 1234 / QWER / ASDF / ZXCV
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the ROM to run
    rom: PathBuf,

    /// Instructions executed per 60Hz frame
    #[arg(long, default_value_t = INSTRUCTIONS_PER_FRAME)]
    ipf: u32,

    /// Seed for CXNN, for repeatable runs
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u32>,

    /// Size multiplier for each pixel of the window
    #[cfg(feature = "desktop")]
    #[arg(long, default_value_t = 10)]
    scale: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config {
        instructions_per_frame: args.ipf,
        seed: args.seed,
        ..Config::default()
    };
    let chip8 = run::load(&args.rom, config)?;

    #[cfg(feature = "desktop")]
    return run::run(chip8, args.frames, args.scale);

    #[cfg(not(feature = "desktop"))]
    return run::run(chip8, args.frames);
}
