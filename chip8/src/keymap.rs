/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// This original layout is mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn keymap(key: char) -> Option<u8> {
    match key.to_ascii_lowercase() {
        'x' => Some(0x0),
        '1' => Some(0x1),
        '2' => Some(0x2),
        '3' => Some(0x3),
        'q' => Some(0x4),
        'w' => Some(0x5),
        'e' => Some(0x6),
        'a' => Some(0x7),
        's' => Some(0x8),
        'd' => Some(0x9),
        'z' => Some(0xA),
        'c' => Some(0xB),
        '4' => Some(0xC),
        'r' => Some(0xD),
        'f' => Some(0xE),
        'v' => Some(0xF),
        _ => None,
    }
}

/// Maps an SDL key to the keypad by its single character name ("Q", "1", ...)
#[cfg(feature = "desktop")]
pub fn keycode_to_key(key: sdl2::keyboard::Keycode) -> Option<u8> {
    let name = key.name();
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => keymap(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_every_key_once() {
        let mut seen = [false; 16];
        for c in "1234qwerasdfzxcv".chars() {
            let key = keymap(c).unwrap();
            assert!(!seen[key as usize], "{} mapped twice", key);
            seen[key as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_layout() {
        assert_eq!(keymap('1'), Some(0x1));
        assert_eq!(keymap('4'), Some(0xC));
        assert_eq!(keymap('x'), Some(0x0));
        assert_eq!(keymap('V'), Some(0xF));
        assert_eq!(keymap('p'), None);
        assert_eq!(keymap(' '), None);
    }
}
