use crate::constants::{INSTRUCTIONS_PER_FRAME, MAX_SAVED_STATES};

/// Runtime knobs for a `Chip8`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Instructions executed per call to `advance_frame`
    pub instructions_per_frame: u32,
    /// How many past frames are kept for rewinding
    pub rewind_depth: usize,
    /// Seed for CXNN; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instructions_per_frame: INSTRUCTIONS_PER_FRAME,
            rewind_depth: MAX_SAVED_STATES,
            seed: None,
        }
    }
}
