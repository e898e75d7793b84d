/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Every address the interpreter touches is reduced to 12 bits
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Where ROMs are loaded into memory and where execution starts
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Depth of the call stack
pub const STACK_SIZE: usize = 16;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Instructions executed for every timer tick.
/// The CPU runs at roughly 360-600Hz against 60Hz timers.
pub const INSTRUCTIONS_PER_FRAME: u32 = 6;

/// Nanoseconds per frame at 60Hz
pub const FRAME_TIME: u32 = 16_666_667;

/// How many frames can be rewound (10 seconds at 60Hz)
pub const MAX_SAVED_STATES: usize = 600;

/// Where the sprite sheet starts in memory
pub const SPRITE_SHEET_START: u16 = 0x000;

/// Each hexadecimal glyph is 5 rows tall
pub const SPRITE_HEIGHT: u16 = 5;

/// # Sprite sheet
/// Glyphs for the hexadecimal digits 0..F, 4 pixels wide and 5 rows tall.
/// Each byte is one row; only the high nibble is drawn.
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
