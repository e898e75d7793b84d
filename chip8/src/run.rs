use std::fs;
use std::path::Path;

use anyhow::Context;
use log::info;

use chip8_core::{Chip8, Config, FrameOutcome};

#[cfg(not(feature = "desktop"))]
use chip8_display::frame_to_text;

/// Frames run by the terminal front-end when no limit is given (10 seconds at 60Hz)
#[cfg(not(feature = "desktop"))]
const DEFAULT_FRAMES: u32 = 600;

pub fn load(rom: &Path, config: Config) -> anyhow::Result<Chip8> {
    let program = fs::read(rom).with_context(|| format!("unable to read {}", rom.display()))?;

    let mut chip8 = Chip8::with_config(config);
    chip8
        .load_program(&program)
        .with_context(|| format!("unable to load {}", rom.display()))?;
    info!(
        "loaded {} ({} bytes), {} instructions per frame",
        rom.display(),
        program.len(),
        chip8.config().instructions_per_frame
    );
    Ok(chip8)
}

fn report_tone(outcome: &FrameOutcome) {
    if outcome.tone.started {
        info!("tone on");
    }
    if outcome.tone.stopped {
        info!("tone off");
    }
}

/// Runs without a window and prints the last frame drawn.
/// Stops after `frames` frames, or as soon as the program waits for a key since nothing can press one.
#[cfg(not(feature = "desktop"))]
pub fn run(mut chip8: Chip8, frames: Option<u32>) -> anyhow::Result<()> {
    let frames = frames.unwrap_or(DEFAULT_FRAMES);

    for frame in 0..frames {
        let outcome = chip8.advance_frame();
        report_tone(&outcome);
        if outcome.waiting_for_key {
            info!("waiting for a key after {} frames, stopping", frame + 1);
            break;
        }
    }

    if let Some(fault) = chip8.last_fault() {
        info!("last fault: {}", fault);
    }
    println!("{}", frame_to_text(chip8.frame_buffer()));
    Ok(())
}

/// Runs in an SDL window at 60 frames per second.
/// - Space fast-forwards while held
/// - Backspace rewinds while held
/// - Escape quits
#[cfg(feature = "desktop")]
pub fn run(mut chip8: Chip8, frames: Option<u32>, scale: u32) -> anyhow::Result<()> {
    use std::time::{Duration, Instant};

    use anyhow::anyhow;
    use sdl2::event::Event;
    use sdl2::keyboard::Keycode;

    use chip8_core::FRAME_TIME;
    use chip8_display::Display;

    use crate::keymap::keycode_to_key;

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, scale).map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    // Set initial timing
    let frame_time = Duration::new(0, FRAME_TIME);
    let mut last_frame = Instant::now();
    let mut frames_run: u32 = 0;

    // Whether or not the default frame rate should be respected
    let mut fast_forward = false;
    // Whether the game's state should be run forwards or backwards
    let mut rewind = false;

    'event: loop {
        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            display.render(frame).map_err(|e| anyhow!(e))?;
        }

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keycode_to_key(key)) {
                    (_, Some(kc)) => chip8.key_press(kc)?,
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Backspace, _) => rewind = true,
                    (Keycode::Escape, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keycode_to_key(key)) {
                    (_, Some(kc)) => chip8.key_release(kc)?,
                    (Keycode::Space, _) => fast_forward = false,
                    (Keycode::Backspace, _) => rewind = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        if rewind {
            chip8.rewind_frame();
        } else {
            report_tone(&chip8.advance_frame());
            frames_run += 1;
            if frames.map_or(false, |limit| frames_run >= limit) {
                break 'event;
            }
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_frame_time = current_time - last_frame;
        if !fast_forward && frame_time > elapsed_frame_time {
            std::thread::sleep(frame_time - elapsed_frame_time);
        }
        last_frame = Instant::now();
    }

    Ok(())
}
