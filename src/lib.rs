// 16 8-bit data registers named V0 to VF, VF doubling as the flag
// I -> address register (12 bits, held in 16)
//
// Delay timer & Sound timer: count down at 60 times / s until 0,
// driven by the host through `Emulator::tick_timers`
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

//! A CHIP-8 virtual machine.
//!
//! ```
//! use emuchip::{Config, Emulator, Register};
//!
//! let mut emu = Emulator::new(Config::default());
//! emu.load_program(&[0x60, 0x0A, 0x70, 0x05]).unwrap();
//! emu.step().unwrap();
//! emu.step().unwrap();
//! assert_eq!(emu.register(Register::V0), 15);
//! assert_eq!(emu.pc(), 0x204);
//! ```

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod stack;
pub mod timer;

pub use config::{Config, ShiftQuirk};
pub use decode::Instruction;
pub use display::{Frame, FrameExchange, HEIGHT as DISPLAY_HEIGHT, WIDTH as DISPLAY_WIDTH};
pub use emulator::Emulator;
pub use error::{Bounds, Error, Result};
pub use keyboard::KEY_COUNT;
pub use memory::{FONT_START, GLYPH_SIZE, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START};
pub use registers::Register;
pub use timer::TIMER_DEC_PER_SECOND;
