/// Rate at which hosts are expected to call `Emulator::tick_timers`.
pub const TIMER_DEC_PER_SECOND: u64 = 60;

#[derive(Debug, Clone, Copy, Default)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    /// Counts down once, stopping at zero. Returns true when this tick
    /// brought the count to zero.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        self.count == 0
    }
}

/// The delay and sound timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timers {
    pub delay: Timer,
    pub sound: Timer,
}

impl Timers {
    /// Returns the beep-off edge: true only on the tick where the sound
    /// timer reaches zero.
    pub fn tick(&mut self) -> bool {
        self.delay.tick();
        self.sound.tick()
    }

    pub fn sound_active(&self) -> bool {
        self.sound.count > 0
    }
}
