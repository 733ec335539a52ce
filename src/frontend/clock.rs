use std::time::{Duration, Instant};

use emuchip::TIMER_DEC_PER_SECOND;

/// What the CPU thread owes the machine at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Due {
    pub step: bool,
    pub ticks: u32,
}

/// Two independent deadlines: one instruction every `cycle`, one timer tick
/// every 1/60 s. Missed timer deadlines are all paid back, so the timers
/// keep 60 Hz however slow the instruction rate is.
pub struct Clock {
    cycle: Duration,
    timer_period: Duration,
    next_cycle: Instant,
    next_tick: Instant,
}

impl Clock {
    pub fn new(start: Instant, hz: u32) -> Self {
        let timer_period = Duration::from_secs(1) / TIMER_DEC_PER_SECOND as u32;
        Self {
            cycle: Duration::from_secs(1) / hz,
            timer_period,
            next_cycle: start,
            next_tick: start + timer_period,
        }
    }

    pub fn due(&mut self, now: Instant) -> Due {
        let step = now >= self.next_cycle;
        if step {
            self.next_cycle += self.cycle;
        }
        let mut ticks = 0;
        while now >= self.next_tick {
            ticks += 1;
            self.next_tick += self.timer_period;
        }
        Due { step, ticks }
    }

    /// When something next falls due.
    pub fn next_wake(&self) -> Instant {
        self.next_cycle.min(self.next_tick)
    }
}
