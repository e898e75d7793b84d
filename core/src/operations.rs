use rand::{Rng, RngCore};

use crate::constants::{
    ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_WIDTH, SPRITE_HEIGHT, SPRITE_SHEET_START,
};
use crate::error::Chip8Error;
use crate::opcode::Opcode;
use crate::state::State;

// The pc has already been moved past the executing instruction by the time an operation runs,
// so jumps overwrite it and skips add another 2.
//
// Arithmetic computes its result and VF from the operands as they were before the instruction.
// Vx is written first and VF last, so with X = F the flag is what remains in VF.

/// clear
pub fn clr(_op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
    Ok(())
}

/// PC = STACK.pop()
pub fn rts(_op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.pc = state.pop()?;
    Ok(())
}

/// PC = addr
pub fn jump(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.pc = op.nnn();
    Ok(())
}

/// STACK.push(PC); PC = addr
pub fn call(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let ret = state.pc;
    state.push(ret)?;
    state.pc = op.nnn();
    Ok(())
}

/// if Vx == nn then pc += 2
pub fn ske(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.skip_if(state.v[op.x() as usize] == op.nn());
    Ok(())
}

/// if Vx != nn then pc += 2
pub fn skne(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.skip_if(state.v[op.x() as usize] != op.nn());
    Ok(())
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.skip_if(state.v[op.x() as usize] == state.v[op.y() as usize]);
    Ok(())
}

/// Vx = nn
pub fn load(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x() as usize] = op.nn();
    Ok(())
}

/// Vx += nn
/// Add nn to Vx; allow for overflow but implicitly drop it, VF is untouched
pub fn add(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let x = op.x() as usize;
    state.v[x] = state.v[x].wrapping_add(op.nn());
    Ok(())
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x() as usize] = state.v[op.y() as usize];
    Ok(())
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x() as usize] |= state.v[op.y() as usize];
    Ok(())
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x() as usize] &= state.v[op.y() as usize];
    Ok(())
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x() as usize] ^= state.v[op.y() as usize];
    Ok(())
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let x = op.x() as usize;
    let (res, over) = state.v[x].overflowing_add(state.v[op.y() as usize]);
    state.v[x] = res;
    state.v[0xF] = u8::from(over);
    Ok(())
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let x = op.x() as usize;
    let (res, under) = state.v[x].overflowing_sub(state.v[op.y() as usize]);
    state.v[x] = res;
    state.v[0xF] = u8::from(!under);
    Ok(())
}

/// Vx >>= 1; VF = shifted out bit
pub fn shr(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let x = op.x() as usize;
    let vx = state.v[x];
    state.v[x] = vx >> 1;
    state.v[0xF] = vx & 0x1;
    Ok(())
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let x = op.x() as usize;
    let (res, under) = state.v[op.y() as usize].overflowing_sub(state.v[x]);
    state.v[x] = res;
    state.v[0xF] = u8::from(!under);
    Ok(())
}

/// Vx <<= 1; VF = shifted out bit
pub fn shl(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let x = op.x() as usize;
    let vx = state.v[x];
    state.v[x] = vx << 1;
    state.v[0xF] = vx >> 7;
    Ok(())
}

/// if Vx != Vy then pc +=2
pub fn skrne(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.skip_if(state.v[op.x() as usize] != state.v[op.y() as usize]);
    Ok(())
}

/// I = addr
pub fn loadi(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.i = op.nnn();
    Ok(())
}

/// PC = V0 + addr
pub fn jumpi(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.pc = (op.nnn() + u16::from(state.v[0x0])) & ADDRESS_MASK;
    Ok(())
}

/// Vx = rand_byte & nn
pub fn rand(op: &dyn Opcode, state: &mut State, rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let rand_byte: u8 = rng.gen();
    state.v[op.x() as usize] = rand_byte & op.nn();
    Ok(())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels are erased
pub fn draw(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let origin_x = state.v[op.x() as usize] as usize;
    let origin_y = state.v[op.y() as usize] as usize;

    // Reset the carry flag (used for collision detection)
    state.v[0xF] = 0x0;

    for row in 0..op.n() as u16 {
        let sprite_row = state.read_byte(state.i.wrapping_add(row));
        let y = (origin_y + row as usize) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let x = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel_value = (sprite_row >> (7 - bit)) & 1;
            state.v[0xF] |= pixel_value & state.frame_buffer[y][x];
            state.frame_buffer[y][x] ^= pixel_value;
        }
    }

    state.draw_flag = true;
    Ok(())
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let key = state.v[op.x() as usize] & 0xF;
    state.skip_if(state.pressed_keys[key as usize]);
    Ok(())
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let key = state.v[op.x() as usize] & 0xF;
    state.skip_if(!state.pressed_keys[key as usize]);
    Ok(())
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.v[op.x() as usize] = state.delay_timer;
    Ok(())
}

/// await keypress for Vx
/// Takes a held key straight away, otherwise parks the pc on this instruction until one arrives
pub fn keyd(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    match state.first_pressed_key() {
        Some(key) => state.v[op.x() as usize] = key,
        None => {
            state.register_needing_key = Some(op.x());
            state.pc = state.instruction_address();
        }
    }
    Ok(())
}

/// DT = Vx
pub fn loadd(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.delay_timer = state.v[op.x() as usize];
    Ok(())
}

/// ST = Vx
pub fn loads(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.sound_timer = state.v[op.x() as usize];
    Ok(())
}

/// I += Vx
pub fn addi(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    state.i = state.i.wrapping_add(u16::from(state.v[op.x() as usize])) & ADDRESS_MASK;
    Ok(())
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for the low nibble of Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let digit = u16::from(state.v[op.x() as usize] & 0xF);
    state.i = SPRITE_SHEET_START + digit * SPRITE_HEIGHT;
    Ok(())
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let vx = state.v[op.x() as usize];
    let i = state.i;
    state.write_byte(i, vx / 100);
    state.write_byte(i.wrapping_add(1), vx / 10 % 10);
    state.write_byte(i.wrapping_add(2), vx % 10);
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
pub fn stor(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let i = state.i;
    for register in 0..=op.x() as u16 {
        let value = state.v[register as usize];
        state.write_byte(i.wrapping_add(register), value);
    }
    state.i = i.wrapping_add(u16::from(op.x()) + 1) & ADDRESS_MASK;
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
pub fn read(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    let i = state.i;
    for register in 0..=op.x() as u16 {
        state.v[register as usize] = state.read_byte(i.wrapping_add(register));
    }
    state.i = i.wrapping_add(u16::from(op.x()) + 1) & ADDRESS_MASK;
    Ok(())
}

/// Anything outside the instruction set, including 0NNN machine code calls
pub fn unknown(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<(), Chip8Error> {
    Err(Chip8Error::UnknownOpcode {
        opcode: op.word(),
        pc: state.instruction_address(),
    })
}
