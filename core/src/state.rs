use crate::constants::{
    ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, MEMORY_SIZE, PROGRAM_START,
    SPRITE_SHEET, SPRITE_SHEET_START, STACK_SIZE,
};
use crate::error::Chip8Error;

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a memory address register, kept within 12 bits
///
/// Counter
/// - (pc) a program counter, kept within 12 bits
///
/// Pointer
/// - (sp) the number of return addresses on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - The tone sounds while the sound timer is nonzero
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the sprite sheet
///     - ROMs are loaded at 0x200
/// - 32x64 byte frame buffer
///     - stores the contents of the next frame to be drawn
///
/// ## Input
/// - the pressed status of keys 0..F
/// - Emulation is suspended while a register is waiting for a key
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub pressed_keys: [bool; KEY_COUNT],
    pub register_needing_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let sheet_start = SPRITE_SHEET_START as usize;
        memory[sheet_start..sheet_start + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            pressed_keys: [false; KEY_COUNT],
            register_needing_key: None,
        }
    }

    /// Reads a byte; the address wraps around at the end of memory
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.memory[(addr & ADDRESS_MASK) as usize]
    }

    /// Writes a byte; the address wraps around at the end of memory
    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.memory[(addr & ADDRESS_MASK) as usize] = value;
    }

    /// Gets the opcode currently pointed at by the pc and moves the pc on to the next one.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&mut self) -> u16 {
        let left = self.read_byte(self.pc);
        let right = self.read_byte(self.pc.wrapping_add(1));
        let op = u16::from_be_bytes([left, right]);
        self.pc = self.pc.wrapping_add(2) & ADDRESS_MASK;
        op
    }

    /// The address of the instruction currently executing (the pc has already moved past it)
    pub fn instruction_address(&self) -> u16 {
        self.pc.wrapping_sub(2) & ADDRESS_MASK
    }

    /// Skips the next instruction if `condition` holds
    pub fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2) & ADDRESS_MASK;
        }
    }

    /// Pushes a return address; a full stack leaves everything untouched
    pub fn push(&mut self, addr: u16) -> Result<(), Chip8Error> {
        let pc = self.instruction_address();
        let slot = self
            .stack
            .get_mut(self.sp as usize)
            .ok_or(Chip8Error::StackOverflow { pc })?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    /// Pops a return address; an empty stack leaves everything untouched
    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow {
                pc: self.instruction_address(),
            });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    /// The lowest numbered key that is currently held down
    pub fn first_pressed_key(&self) -> Option<u8> {
        self.pressed_keys
            .iter()
            .position(|&pressed| pressed)
            .map(|key| key as u8)
    }

    /// Completes a pending FX0A: stores `key` in the waiting register and moves past the FX0A
    pub fn resolve_key_wait(&mut self, key: u8) {
        if let Some(register) = self.register_needing_key.take() {
            self.v[register as usize] = key;
            self.pc = self.pc.wrapping_add(2) & ADDRESS_MASK;
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_loads_sprite_sheet() {
        let state = State::new();
        assert_eq!(state.memory[0..80], SPRITE_SHEET);
        assert!(state.memory[80..].iter().all(|&b| b == 0));
        assert_eq!(state.pc, 0x200);
    }

    #[test]
    fn test_memory_wraps() {
        let mut state = State::new();
        state.write_byte(0x1000, 0xAB);
        assert_eq!(state.memory[0x000], 0xAB);
        assert_eq!(state.read_byte(0xF000), 0xAB);
    }

    #[test]
    fn test_fetch_advances_pc() {
        let mut state = State::new();
        state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(state.fetch(), 0xAABB);
        assert_eq!(state.pc, 0x202);
        assert_eq!(state.instruction_address(), 0x200);
    }

    #[test]
    fn test_fetch_wraps_at_end_of_memory() {
        let mut state = State::new();
        state.pc = 0xFFF;
        state.memory[0xFFF] = 0x12;
        state.memory[0x000] = 0x34;
        assert_eq!(state.fetch(), 0x1234);
        assert_eq!(state.pc, 0x001);
    }

    #[test]
    fn test_push_pop() {
        let mut state = State::new();
        state.push(0x0ABC).unwrap();
        assert_eq!(state.sp, 1);
        assert_eq!(state.pop(), Ok(0x0ABC));
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_push_full_stack() {
        let mut state = State::new();
        state.pc = 0x302;
        for addr in 0..STACK_SIZE as u16 {
            state.push(addr).unwrap();
        }
        let before = state;
        assert_eq!(state.push(0x123), Err(Chip8Error::StackOverflow { pc: 0x300 }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_pop_empty_stack() {
        let mut state = State::new();
        state.pc = 0x202;
        assert_eq!(state.pop(), Err(Chip8Error::StackUnderflow { pc: 0x200 }));
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_first_pressed_key() {
        let mut state = State::new();
        assert_eq!(state.first_pressed_key(), None);
        state.pressed_keys[0xC] = true;
        state.pressed_keys[0x3] = true;
        assert_eq!(state.first_pressed_key(), Some(0x3));
    }

    #[test]
    fn test_resolve_key_wait() {
        let mut state = State::new();
        state.register_needing_key = Some(0x4);
        state.resolve_key_wait(0xB);
        assert_eq!(state.v[0x4], 0xB);
        assert_eq!(state.pc, 0x202);
        assert_eq!(state.register_needing_key, None);
    }

    #[test]
    fn test_resolve_without_wait_does_nothing() {
        let mut state = State::new();
        state.resolve_key_wait(0xB);
        assert_eq!(state, State::new());
    }
}
