use std::time::Duration;

use anyhow::{Context, Result};
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use emuchip::{Frame, DISPLAY_HEIGHT as HEIGHT, DISPLAY_WIDTH as WIDTH, KEY_COUNT};

use super::keymap;

const OFF: u32 = 0x000000;
const ON: u32 = 0x007FFF;

/// The window the machine's frames are shown in.
pub struct Screen {
    pixel_buffer: Vec<u32>,
    window: Window,
}

impl Screen {
    pub fn new(scale: Scale) -> Result<Self> {
        let mut window = Window::new(
            "emuchip - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )
        .context("failed to open window")?;
        window.set_position(500, 300);
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(Duration::from_micros(16600)));
        Ok(Self {
            pixel_buffer: vec![OFF; WIDTH * HEIGHT],
            window,
        })
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
    }

    pub fn keypad(&self) -> [bool; KEY_COUNT] {
        keymap::keypad(&self.window.get_keys())
    }

    /// Show `frame` if there is a new one, otherwise just pump window events.
    pub fn sync(&mut self, frame: Option<Frame>) -> Result<()> {
        if let Some(frame) = frame {
            to_pixels(&frame, &mut self.pixel_buffer);
        }
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
            .context("failed to draw frame")
    }
}

fn to_pixels(frame: &Frame, pixels: &mut [u32]) {
    for (dst, &on) in pixels.iter_mut().zip(frame.iter().flatten()) {
        *dst = if on { ON } else { OFF };
    }
}

/// Window scale factor from a CLI value.
pub fn scale_from(factor: u8) -> Option<Scale> {
    match factor {
        1 => Some(Scale::X1),
        2 => Some(Scale::X2),
        4 => Some(Scale::X4),
        8 => Some(Scale::X8),
        16 => Some(Scale::X16),
        32 => Some(Scale::X32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_laid_out_row_major() {
        let mut frame = [[false; WIDTH]; HEIGHT];
        frame[1][2] = true;
        let mut pixels = vec![0xDEAD; WIDTH * HEIGHT];
        to_pixels(&frame, &mut pixels);
        assert_eq!(pixels[WIDTH + 2], ON);
        assert_eq!(pixels.iter().filter(|&&p| p == ON).count(), 1);
        assert_eq!(pixels[0], OFF);
    }

    #[test]
    fn only_power_of_two_scales() {
        assert!(matches!(scale_from(16), Some(Scale::X16)));
        assert!(scale_from(3).is_none());
    }
}
