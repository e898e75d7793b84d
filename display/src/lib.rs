pub use display::{frame_to_rgb24, frame_to_text};
#[cfg(feature = "sdl")]
pub use display::Display;

mod display;
