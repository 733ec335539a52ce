//! Whole programs driven through the public host interface.

use emuchip::{Bounds, Config, Emulator, Error, Register, KEY_COUNT, MAX_PROGRAM_SIZE, PROGRAM_START};
use rand::rngs::mock::StepRng;

fn boot(program: &[u8]) -> Emulator {
    let mut emu = Emulator::with_rng(Config::default(), StepRng::new(0, 1));
    emu.load_program(program).unwrap();
    emu
}

fn steps(emu: &mut Emulator, n: usize) {
    for _ in 0..n {
        emu.step().unwrap();
    }
}

fn v(n: u8) -> Register {
    Register::from_nibble(n)
}

#[test]
fn set_then_add() {
    let mut emu = boot(&[0x60, 0x0A, 0x70, 0x05]);
    steps(&mut emu, 2);
    assert_eq!(emu.register(Register::V0), 15);
    assert_eq!(emu.pc(), 0x204);
}

#[test]
fn subroutine_returns_after_call_site() {
    let mut emu = boot(&[
        0x22, 0x06, // 200: call 206
        0x61, 0x01, // 202: V1 = 1
        0x12, 0x04, // 204: loop
        0x62, 0x02, // 206: V2 = 2
        0x00, 0xEE, // 208: return
    ]);
    steps(&mut emu, 3);
    assert_eq!(emu.pc(), PROGRAM_START + 2);
    assert_eq!(emu.stack_depth(), 0);
    steps(&mut emu, 2);
    assert_eq!(emu.registers()[1..3], [1, 2]);
    assert_eq!(emu.pc(), 0x204);
}

#[test]
fn counts_down_with_loop() {
    // V0 = 5; loop { V0 += 0xFF; if V0 != 0 jump loop }
    let mut emu = boot(&[
        0x60, 0x05, // 200
        0x70, 0xFF, // 202
        0x30, 0x00, // 204: skip if V0 == 0
        0x12, 0x02, // 206
        0x12, 0x08, // 208: halt loop
    ]);
    steps(&mut emu, 1 + 5 * 3 - 1);
    assert_eq!(emu.register(Register::V0), 0);
    assert_eq!(emu.pc(), 0x208);
}

#[test]
fn draws_font_digit_and_reports_frame_once() {
    let mut emu = boot(&[
        0x60, 0x08, // V0 = 8
        0xF0, 0x29, // I = glyph 8
        0x61, 0x00, // V1 = 0
        0xD1, 0x15, // draw at (V1, V1)
    ]);
    steps(&mut emu, 3);
    assert!(!emu.frame_dirty());
    assert_eq!(emu.index(), 0x050 + 8 * 5);
    steps(&mut emu, 1);
    assert!(emu.frame_dirty());
    let frame = emu.read_frame();
    // glyph 8 is F0 90 F0 90 F0
    assert_eq!(frame[0][0..5], [true, true, true, true, false]);
    assert_eq!(frame[1][0..5], [true, false, false, true, false]);
    assert_eq!(frame[4][0..4], [true; 4]);
    assert!(!emu.frame_dirty());
}

#[test]
fn key_wait_resumes_on_later_step() {
    let mut emu = boot(&[
        0xF5, 0x0A, // V5 = key
        0x61, 0x01, // V1 = 1
    ]);
    steps(&mut emu, 3);
    assert!(emu.is_awaiting_key());
    assert_eq!(emu.pc(), PROGRAM_START);
    assert_eq!(emu.register(v(1)), 0);

    let mut keys = [false; KEY_COUNT];
    keys[0xB] = true;
    emu.set_input(keys);
    steps(&mut emu, 1);
    assert!(!emu.is_awaiting_key());
    assert_eq!(emu.register(v(5)), 0xB);
    assert_eq!(emu.pc(), 0x202);
    steps(&mut emu, 1);
    assert_eq!(emu.register(v(1)), 1);
}

#[test]
fn timers_only_move_on_tick() {
    let mut emu = boot(&[
        0x60, 0x02, // V0 = 2
        0xF0, 0x18, // sound = V0
        0xF0, 0x15, // delay = V0
        0xF1, 0x07, // V1 = delay
    ]);
    steps(&mut emu, 3);
    assert!(emu.sound_active());
    assert!(!emu.tick_timers());
    assert!(emu.tick_timers());
    assert!(!emu.sound_active());
    assert!(!emu.tick_timers());
    steps(&mut emu, 1);
    assert_eq!(emu.register(v(1)), 0);
}

#[test]
fn unknown_opcode_halts_machine() {
    let mut emu = boot(&[0x60, 0x01, 0xFF, 0xFF, 0x60, 0x02]);
    steps(&mut emu, 1);
    assert_eq!(emu.step(), Err(Error::UnknownOpcode(0xFFFF)));
    assert!(emu.is_halted());
    assert_eq!(emu.fault(), Some(&Error::UnknownOpcode(0xFFFF)));
    assert_eq!(emu.step(), Err(Error::UnknownOpcode(0xFFFF)));
    assert_eq!(emu.pc(), 0x202);
    assert_eq!(emu.register(Register::V0), 1);
}

#[test]
fn running_off_the_end_of_memory_faults() {
    // jump to the last word, which is followed by nothing
    let mut emu = boot(&[0x1F, 0xFF]);
    steps(&mut emu, 1);
    assert_eq!(emu.step(), Err(Error::OutOfBounds(Bounds::Memory(0x1000))));
}

#[test]
fn returning_from_top_level_faults() {
    let mut emu = boot(&[0x00, 0xEE]);
    assert_eq!(emu.step(), Err(Error::OutOfBounds(Bounds::StackUnderflow)));
}

#[test]
fn recursion_overflows_the_stack() {
    let mut emu = boot(&[0x22, 0x00]);
    steps(&mut emu, 16);
    assert_eq!(emu.stack_depth(), 16);
    assert_eq!(emu.step(), Err(Error::OutOfBounds(Bounds::StackOverflow)));
}

#[test]
fn oversized_program_is_rejected() {
    let mut emu = Emulator::default();
    let image = vec![0u8; MAX_PROGRAM_SIZE + 1];
    assert_eq!(
        emu.load_program(&image),
        Err(Error::LoadTooLarge {
            size: MAX_PROGRAM_SIZE + 1,
            max: MAX_PROGRAM_SIZE,
        })
    );
    assert!(emu.load_program(&image[1..]).is_ok());
}

#[test]
fn machines_are_independent() {
    let mut a = boot(&[0x60, 0x01]);
    let b = boot(&[0x60, 0x02]);
    steps(&mut a, 1);
    assert_eq!(a.register(Register::V0), 1);
    assert_eq!(b.register(Register::V0), 0);
    assert_eq!(b.pc(), PROGRAM_START);
}
