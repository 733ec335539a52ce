use std::sync::{Mutex, PoisonError};

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// One monochrome frame, indexed `[y][x]`.
pub type Frame = [[bool; WIDTH]; HEIGHT];

#[derive(Clone)]
pub struct FrameBuffer {
    bit_buffer: Frame,
    dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [[false; WIDTH]; HEIGHT],
            dirty: false,
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [[false; WIDTH]; HEIGHT];
        self.dirty = true;
    }

    /// XOR `sprite` onto the buffer with its top-left corner at (x, y).
    /// Each row is 8 pixels wide, most significant bit leftmost; pixels wrap
    /// around both edges. Returns true if any set pixel was switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = (y as usize + i) % HEIGHT;
            for j in 0..8 {
                if (row >> (7 - j)) & 1 == 0 {
                    continue;
                }
                let nx = (x as usize + j) % WIDTH;
                let pixel = &mut self.bit_buffer[ny][nx];
                if *pixel {
                    vf = true;
                }
                *pixel = !*pixel;
            }
        }
        self.dirty = true;
        vf
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[y % HEIGHT][x % WIDTH]
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read the frame, marking it consumed.
    pub fn read(&mut self) -> &Frame {
        self.dirty = false;
        &self.bit_buffer
    }

    /// A copy of the frame if it changed since it was last consumed.
    pub fn take(&mut self) -> Option<Frame> {
        if self.dirty {
            Some(*self.read())
        } else {
            None
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands whole frames from the thread stepping the machine to the thread
/// rendering it. Publishing and taking each happen under one lock, so a
/// reader never sees a partially drawn frame.
#[derive(Default)]
pub struct FrameExchange {
    latest: Mutex<Option<Frame>>,
}

impl FrameExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot-and-clear: moves the frame out of `fb` if it is dirty.
    /// An unread older frame is replaced.
    pub fn publish(&self, fb: &mut FrameBuffer) -> bool {
        match fb.take() {
            Some(frame) => {
                *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame);
                true
            }
            None => false,
        }
    }

    /// The most recent unread frame, at most once.
    pub fn take(&self) -> Option<Frame> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
