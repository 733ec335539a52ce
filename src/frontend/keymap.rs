use minifb::Key;

use emuchip::KEY_COUNT;

// Host keys laid out like the original hex pad:
//
//  1 2 3 4      1 2 3 C
//  Q W E R  ->  4 5 6 D
//  A S D F      7 8 9 E
//  Z X C V      A 0 B F
pub fn key_to_num(key: Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}

pub fn keypad(down: &[Key]) -> [bool; KEY_COUNT] {
    let mut keys = [false; KEY_COUNT];
    for num in down.iter().copied().filter_map(key_to_num) {
        keys[num as usize] = true;
    }
    keys
}
