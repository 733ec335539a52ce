//! Host side: window, keypad and audio for the `emuchip` binary.

pub mod clock;
pub mod keymap;
pub mod screen;
pub mod sound;
