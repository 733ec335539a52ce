use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::{debug, trace, warn};

use crate::config::{Config, ShiftQuirk};
use crate::decode::Instruction;
use crate::display::{Frame, FrameBuffer, FrameExchange};
use crate::error::{Error, Result};
use crate::keyboard::{Keyboard, KEY_COUNT};
use crate::memory::{Memory, TypeAddr, FONT_START, GLYPH_SIZE};
use crate::registers::{IndexRegister, ProgramCounter, Register, Registers};
use crate::stack::Stack;
use crate::timer::Timers;

/// A complete CHIP-8 machine.
///
/// The host loads a program once, then drives the machine:
/// - `set_input` with the current keypad before each cycle
/// - `step` to run one fetch-decode-execute cycle
/// - `tick_timers` at 60 Hz, independent of the cycle rate
/// - `read_frame` when `frame_dirty` says the display changed
///
/// A failed step halts the machine; the error is kept and returned again by
/// every later step.
pub struct Emulator {
    fb: FrameBuffer,
    regs: Registers,
    mem: Memory,
    pc: ProgramCounter,
    index: IndexRegister,
    stack: Stack,
    timers: Timers,
    keyboard: Keyboard,
    rng: Box<dyn RngCore + Send>,
    config: Config,
    awaiting_key: Option<Register>,
    fault: Option<Error>,
}

impl Emulator {
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Use `rng` as the source for CXNN instead of the configured seed.
    pub fn with_rng(config: Config, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            pc: ProgramCounter::default(),
            index: IndexRegister::default(),
            stack: Stack::new(),
            timers: Timers::default(),
            keyboard: Keyboard::new(),
            rng: Box::new(rng),
            config,
            awaiting_key: None,
            fault: None,
        }
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.mem.load_rom(program)
    }

    /// Run one cycle. While an FX0A is pending this only checks the keypad.
    pub fn step(&mut self) -> Result<()> {
        if let Some(err) = &self.fault {
            return Err(err.clone());
        }
        let result = match self.awaiting_key {
            Some(vx) => self.resume_key_wait(vx),
            None => self.fetch_decode().and_then(|ins| self.execute_ins(ins)),
        };
        if let Err(err) = &result {
            warn!(pc = format_args!("{:#05x}", self.pc.0), %err, "machine halted");
            self.fault = Some(err.clone());
        }
        result
    }

    pub fn fetch_decode(&self) -> Result<Instruction> {
        let word = self.mem.instruction_at(self.pc.0)?;
        let ins = Instruction::decode(word)?;
        trace!(pc = format_args!("{:#05x}", self.pc.0), word = format_args!("{word:04x}"), ?ins);
        Ok(ins)
    }

    pub fn execute_ins(&mut self, ins: Instruction) -> Result<()> {
        match ins {
            Instruction::ClearScreen => {
                self.fb.clear_buffer();
                self.pc.increment();
            }
            Instruction::PopSubroutine => {
                let call_site = self.stack.pop()?;
                self.pc.set_addr(call_site);
                self.pc.increment();
            }
            Instruction::Jump(addr) => {
                self.pc.set_addr(addr);
            }
            Instruction::PushSubroutine(addr) => {
                self.stack.push(self.pc.0)?; // store current instruction to return back
                self.pc.set_addr(addr);
            }
            Instruction::SkipEqualConstant(vx, nn) => {
                self.skip_if(self.regs.get(vx) == nn);
            }
            Instruction::SkipNotEqualConstant(vx, nn) => {
                self.skip_if(self.regs.get(vx) != nn);
            }
            Instruction::SkipEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) == self.regs.get(vy));
            }
            Instruction::SkipNotEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) != self.regs.get(vy));
            }
            Instruction::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
                self.pc.increment();
            }
            Instruction::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
                self.pc.increment();
            }
            Instruction::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
                self.pc.increment();
            }
            Instruction::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
                self.pc.increment();
            }
            Instruction::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
                self.pc.increment();
            }
            Instruction::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
                self.pc.increment();
            }
            Instruction::Add(vx, vy) => {
                let (sum, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.set_with_flag(vx, sum, carry);
            }
            Instruction::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                // VF is 1 when there is no borrow
                self.set_with_flag(vx, x.wrapping_sub(y), y <= x);
            }
            Instruction::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.set_with_flag(vx, y.wrapping_sub(x), x <= y);
            }
            Instruction::RightShift(vx, vy) => {
                let source = match self.config.shift {
                    ShiftQuirk::Reference | ShiftQuirk::Vy => vy,
                    ShiftQuirk::InPlace => vx,
                };
                let value = self.regs.get(source);
                self.set_with_flag(vx, value >> 1, value & 1 == 1);
            }
            Instruction::LeftShift(vx, vy) => {
                let source = match self.config.shift {
                    ShiftQuirk::Vy => vy,
                    ShiftQuirk::Reference | ShiftQuirk::InPlace => vx,
                };
                let value = self.regs.get(source);
                self.set_with_flag(vx, value << 1, value >> 7 == 1);
            }
            Instruction::SetIndexRegister(addr) => {
                self.index.set_addr(addr);
                self.pc.increment();
            }
            Instruction::JumpWithOffset(addr) => {
                self.pc
                    .set_addr(addr.wrapping_add(self.regs.get(Register::V0) as TypeAddr));
            }
            Instruction::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
                self.pc.increment();
            }
            Instruction::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                // rows I..I+N, one byte (8 pixels) each
                let sprite = self.mem.slice(self.index.0 as usize, height as usize)?;
                let collided = self.fb.paint(x, y, sprite);
                self.regs.set_flag(collided);
                self.pc.increment();
            }
            Instruction::SkipIfPressed(vx) => {
                let key = self.regs.get(vx);
                if self.keyboard.is_pressed(key)? {
                    self.keyboard.consume(key)?;
                    self.pc.skip();
                } else {
                    self.pc.increment();
                }
            }
            Instruction::SkipIfNotPressed(vx) => {
                let key = self.regs.get(vx);
                if self.keyboard.is_pressed(key)? {
                    self.keyboard.consume(key)?;
                    self.pc.increment();
                } else {
                    self.pc.skip();
                }
            }
            Instruction::CopyDelayToRegister(vx) => {
                self.regs.set_register(vx, self.timers.delay.count);
                self.pc.increment();
            }
            Instruction::GetKey(vx) => {
                self.awaiting_key = Some(vx);
                self.resume_key_wait(vx)?;
            }
            Instruction::CopyRegisterToDelay(vx) => {
                self.timers.delay.set(self.regs.get(vx));
                self.pc.increment();
            }
            Instruction::CopyRegisterToSound(vx) => {
                self.timers.sound.set(self.regs.get(vx));
                self.pc.increment();
            }
            Instruction::AddToIndex(vx) => {
                self.index.add(self.regs.get(vx));
                self.pc.increment();
            }
            Instruction::PointChar(vx) => {
                let glyph = self.regs.get(vx) as TypeAddr * GLYPH_SIZE as TypeAddr;
                self.index.set_addr(FONT_START + glyph);
                self.pc.increment();
            }
            Instruction::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = self.mem.slice_mut(self.index.0 as usize, 3)?;
                digits.copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
                self.pc.increment();
            }
            Instruction::StoreRegisterToMemory(vx) => {
                let count = vx.index() + 1;
                let dest = self.mem.slice_mut(self.index.0 as usize, count)?;
                dest.copy_from_slice(&self.regs.as_array()[..count]);
                self.pc.increment();
            }
            Instruction::LoadRegisterFromMemory(vx) => {
                let src = self.mem.slice(self.index.0 as usize, vx.index() + 1)?;
                for (reg, &reg_val) in vx.through().zip(src) {
                    self.regs.set_register(reg, reg_val);
                }
                self.pc.increment();
            }
        }
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc.skip();
        } else {
            self.pc.increment();
        }
    }

    // result first, flag last: with X = F the flag is what remains
    fn set_with_flag(&mut self, vx: Register, value: u8, flag: bool) {
        self.regs.set_register(vx, value);
        self.regs.set_flag(flag);
        self.pc.increment();
    }

    fn resume_key_wait(&mut self, vx: Register) -> Result<()> {
        if let Some(key) = self.keyboard.first_pressed() {
            self.keyboard.consume(key)?;
            self.regs.set_register(vx, key);
            self.awaiting_key = None;
            self.pc.increment();
            debug!(key, register = %vx, "key wait satisfied");
        }
        Ok(())
    }

    /// Count both timers down once. Returns true on the tick where the sound
    /// timer reaches zero, which is when a host should stop its tone.
    pub fn tick_timers(&mut self) -> bool {
        self.timers.tick()
    }

    pub fn sound_active(&self) -> bool {
        self.timers.sound_active()
    }

    pub fn set_input(&mut self, keys: [bool; KEY_COUNT]) {
        self.keyboard.update(keys);
    }

    pub fn frame_dirty(&self) -> bool {
        self.fb.is_dirty()
    }

    /// The current frame. Clears the dirty flag.
    pub fn read_frame(&mut self) -> &Frame {
        self.fb.read()
    }

    /// Hand the frame to `exchange` if it changed. Returns whether it did.
    pub fn publish_frame(&mut self, exchange: &FrameExchange) -> bool {
        exchange.publish(&mut self.fb)
    }

    pub fn is_awaiting_key(&self) -> bool {
        self.awaiting_key.is_some()
    }

    pub fn is_halted(&self) -> bool {
        self.fault.is_some()
    }

    pub fn fault(&self) -> Option<&Error> {
        self.fault.as_ref()
    }

    pub fn register(&self, reg: Register) -> u8 {
        self.regs.get(reg)
    }

    pub fn registers(&self) -> &[u8; 16] {
        self.regs.as_array()
    }

    pub fn pc(&self) -> TypeAddr {
        self.pc.0
    }

    pub fn index(&self) -> TypeAddr {
        self.index.0
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay.count
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound.count
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    pub fn config(&self) -> Config {
        self.config
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
