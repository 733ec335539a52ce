/// How 8XY6 and 8XYE pick their operand. Historical interpreters disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShiftQuirk {
    /// 8XY6 shifts VY into VX, 8XYE shifts VX in place.
    #[default]
    Reference,
    /// Both shifts read VY and store into VX, as on the COSMAC VIP.
    Vy,
    /// Both shifts operate on VX and ignore VY.
    InPlace,
}

/// Per-machine behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub shift: ShiftQuirk,
    /// Seed for CXNN. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Config {
    pub fn with_shift(mut self, shift: ShiftQuirk) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
