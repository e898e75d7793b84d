use std::collections::VecDeque;

use log::{debug, error, trace, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::Config;
use crate::constants::{KEY_COUNT, MAX_PROGRAM_SIZE, PROGRAM_START};
use crate::error::Chip8Error;
use crate::instruction::from_op;
use crate::state::{FrameBuffer, State};

/// What a single call to `Chip8::step` did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// An instruction ran, or a pending FX0A received its key
    Executed,
    /// FX0A is waiting for a key; the pc stays on it until one is pressed
    AwaitingKey,
}

/// Transitions of the tone during one timer tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToneEdges {
    pub started: bool,
    pub stopped: bool,
}

/// Summary of one call to `Chip8::advance_frame`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Instructions run, faulting ones included.
    /// An FX0A that parks the pc waiting for a key is not counted.
    pub executed: u32,
    /// Instructions skipped because of a program fault
    pub faults: u32,
    /// The frame ended early on an FX0A with no key pressed
    pub waiting_for_key: bool,
    pub tone: ToneEdges,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - the random source used by CXNN
///  - whether the tone is sounding, to report its start and stop once each
///
/// Supplies interfaces for:
/// - resetting and loading programs
/// - pressing and releasing keys
/// - advancing the CPU a step or a frame at a time, and rewinding frames
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    config: Config,
    rng: Box<dyn RngCore>,
    sounding: bool,
    last_fault: Option<Chip8Error>,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng: Box<dyn RngCore> = match config.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        };
        Chip8 {
            state: State::new(),
            previous_states: VecDeque::with_capacity(config.rewind_depth),
            config,
            rng,
            sounding: false,
            last_fault: None,
        }
    }

    /// Replaces the random source used by CXNN
    pub fn with_rng<R: RngCore + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Returns the machine to its power-on state: memory cleared apart from the sprite sheet,
    /// pc at 0x200, timers stopped and no saved states
    pub fn reset(&mut self) {
        self.state = State::new();
        self.previous_states.clear();
        self.sounding = false;
        self.last_fault = None;
        debug!("reset");
    }

    /// Copies a program into memory at 0x200.
    /// Nothing else is touched, so `reset` first for a clean run.
    ///
    /// # Arguments
    /// * `program` the raw bytes of a ROM
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ImageTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + program.len()].copy_from_slice(program);
        debug!(
            "loaded {} byte program at {:#05X}",
            program.len(),
            PROGRAM_START
        );
        Ok(())
    }

    /// Set the pressed status of a key.
    /// A press completes a pending FX0A straight away.
    ///
    /// # Arguments
    /// * `key` the keypad index 0..F
    /// * `pressed` whether the key is now down
    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<(), Chip8Error> {
        if key as usize >= KEY_COUNT {
            return Err(Chip8Error::InvalidKey { key });
        }
        self.state.pressed_keys[key as usize] = pressed;
        if pressed {
            self.state.resolve_key_wait(key);
        }
        Ok(())
    }

    pub fn key_press(&mut self, key: u8) -> Result<(), Chip8Error> {
        self.set_key(key, true)
    }

    pub fn key_release(&mut self, key: u8) -> Result<(), Chip8Error> {
        self.set_key(key, false)
    }

    /// Advances the CPU by a single instruction
    /// - if awaiting a keypress, samples the keys and only continues once one is held
    /// - otherwise fetches, decodes and executes the next opcode
    ///
    /// An `Err` is a program fault: the instruction was skipped and the machine can keep running.
    pub fn step(&mut self) -> Result<Step, Chip8Error> {
        if self.state.register_needing_key.is_some() {
            return Ok(match self.state.first_pressed_key() {
                Some(key) => {
                    self.state.resolve_key_wait(key);
                    Step::Executed
                }
                None => Step::AwaitingKey,
            });
        }

        let op = self.state.fetch();
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        let instruction = from_op(&op);
        instruction(&op, &mut self.state, self.rng.as_mut())?;

        Ok(match self.state.register_needing_key {
            Some(_) => Step::AwaitingKey,
            None => Step::Executed,
        })
    }

    /// Runs one frame: `instructions_per_frame` steps followed by a timer tick.
    /// - the state before the frame is saved for `rewind_frame`
    /// - program faults are logged and skipped
    /// - a pending FX0A ends the frame's instructions early, the timers still tick
    pub fn advance_frame(&mut self) -> FrameOutcome {
        self.save_state();

        let mut outcome = FrameOutcome::default();
        for _ in 0..self.config.instructions_per_frame {
            match self.step() {
                Ok(Step::Executed) => outcome.executed += 1,
                Ok(Step::AwaitingKey) => {
                    outcome.waiting_for_key = true;
                    break;
                }
                Err(fault) if fault.is_fault() => {
                    warn!("{}", fault);
                    outcome.executed += 1;
                    outcome.faults += 1;
                    self.last_fault = Some(fault);
                }
                Err(error) => {
                    error!("{}", error);
                    break;
                }
            }
        }

        outcome.tone = self.advance_timers();
        outcome
    }

    /// Handles the delay and sound timers
    /// - decrements each timer that is above 0
    /// - reports the tone starting (sound timer became nonzero since the last tick)
    ///   and stopping (sound timer reached 0)
    pub fn advance_timers(&mut self) -> ToneEdges {
        let sounding = self.state.sound_timer > 0;

        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }
        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
        }

        let edges = ToneEdges {
            started: sounding && !self.sounding,
            stopped: (sounding || self.sounding) && self.state.sound_timer == 0,
        };
        self.sounding = self.state.sound_timer > 0;
        edges
    }

    /// Reverses the last frame if possible
    /// - if there are previous_states, pops the last one and restores it
    /// - the keys keep whatever the host is currently holding
    pub fn rewind_frame(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                let pressed_keys = self.state.pressed_keys;
                self.state = state;
                self.state.pressed_keys = pressed_keys;
                self.state.draw_flag = true;
                self.sounding = state.sound_timer > 0;
                true
            }
            None => false,
        }
    }

    /// Puts the current state in previous_states
    /// - if there are already `rewind_depth` saved then the oldest is dropped
    fn save_state(&mut self) {
        if self.config.rewind_depth == 0 {
            return;
        }
        if self.previous_states.len() == self.config.rewind_depth {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.state);
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns whether the frame buffer changed since the last call, and clears the flag
    pub fn consume_draw_flag(&mut self) -> bool {
        std::mem::replace(&mut self.state.draw_flag, false)
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.consume_draw_flag() {
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.state.register_needing_key.is_some()
    }

    /// Whether the tone should currently be sounding
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// The most recent program fault, if any happened since the last reset
    pub fn last_fault(&self) -> Option<Chip8Error> {
        self.last_fault
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_instructions_per_frame(&mut self, instructions: u32) {
        self.config.instructions_per_frame = instructions;
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
