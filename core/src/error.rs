use thiserror::Error;

use crate::constants::STACK_SIZE;

/// Everything that can go wrong while loading or running a program.
///
/// Faults raised by the program itself (`StackOverflow`, `StackUnderflow`, `UnknownOpcode`)
/// never stop the interpreter: the offending instruction is skipped and execution carries on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("program image is {size} bytes but at most {max} bytes fit in memory")]
    ImageTooLarge { size: usize, max: usize },

    #[error("key {key:#04X} is not on the 16 key keypad")]
    InvalidKey { key: u8 },

    #[error("call at {pc:#05X} would overflow the {} entry stack", STACK_SIZE)]
    StackOverflow { pc: u16 },

    #[error("return at {pc:#05X} with an empty stack")]
    StackUnderflow { pc: u16 },

    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },
}

impl Chip8Error {
    /// Whether the error was raised by the running program rather than by the host
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Chip8Error::StackOverflow { .. }
                | Chip8Error::StackUnderflow { .. }
                | Chip8Error::UnknownOpcode { .. }
        )
    }
}
