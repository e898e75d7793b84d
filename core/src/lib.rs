pub use chip8::{Chip8, FrameOutcome, Step, ToneEdges};
pub use config::Config;
pub use constants::{FRAME_TIME, INSTRUCTIONS_PER_FRAME};
pub use error::Chip8Error;
pub use state::{FrameBuffer, State};

mod chip8;
mod config;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
pub mod state;
