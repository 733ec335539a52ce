//! Instruction properties over the whole operand range.

use emuchip::{Config, Emulator, Register};
use proptest::prelude::*;
use rand::rngs::mock::StepRng;

fn boot(program: &[u8]) -> Emulator {
    let mut emu = Emulator::with_rng(Config::default(), StepRng::new(0, 0));
    emu.load_program(program).unwrap();
    emu
}

proptest! {
    #[test]
    fn load_immediate(x in 0u8..16, nn in any::<u8>()) {
        let mut emu = boot(&[0x60 | x, nn]);
        emu.step().unwrap();
        prop_assert_eq!(emu.register(Register::from_nibble(x)), nn);
        prop_assert_eq!(emu.pc(), 0x202);
    }

    #[test]
    fn add_immediate_wraps(x in 0u8..16, v in any::<u8>(), nn in any::<u8>()) {
        let mut emu = boot(&[0x60 | x, v, 0x70 | x, nn]);
        emu.step().unwrap();
        emu.step().unwrap();
        prop_assert_eq!(emu.register(Register::from_nibble(x)), v.wrapping_add(nn));
    }

    #[test]
    fn skip_on_constant(x in 0u8..16, v in any::<u8>(), nn in any::<u8>()) {
        let mut eq = boot(&[0x60 | x, v, 0x30 | x, nn]);
        eq.step().unwrap();
        eq.step().unwrap();
        prop_assert_eq!(eq.pc(), if v == nn { 0x206 } else { 0x204 });

        let mut ne = boot(&[0x60 | x, v, 0x40 | x, nn]);
        ne.step().unwrap();
        ne.step().unwrap();
        prop_assert_eq!(ne.pc(), if v != nn { 0x206 } else { 0x204 });
    }

    #[test]
    fn add_registers_sets_carry(a in any::<u8>(), b in any::<u8>()) {
        let mut emu = boot(&[0x61, a, 0x62, b, 0x81, 0x24]);
        for _ in 0..3 {
            emu.step().unwrap();
        }
        let (sum, carry) = a.overflowing_add(b);
        prop_assert_eq!(emu.register(Register::from_nibble(1)), sum);
        prop_assert_eq!(emu.register(Register::VF), carry as u8);
    }

    #[test]
    fn subtract_registers_sets_not_borrow(a in any::<u8>(), b in any::<u8>()) {
        let mut emu = boot(&[0x61, a, 0x62, b, 0x81, 0x25]);
        for _ in 0..3 {
            emu.step().unwrap();
        }
        prop_assert_eq!(emu.register(Register::from_nibble(1)), a.wrapping_sub(b));
        prop_assert_eq!(emu.register(Register::VF), (b <= a) as u8);
    }

    #[test]
    fn bcd_digits(value in any::<u8>()) {
        let mut emu = boot(&[0x63, value, 0xA3, 0x00, 0xF3, 0x33]);
        for _ in 0..3 {
            emu.step().unwrap();
        }
        let digits = emu.memory().slice(0x300, 3).unwrap();
        prop_assert_eq!(digits[0] as u32 * 100 + digits[1] as u32 * 10 + digits[2] as u32, value as u32);
        prop_assert!(digits.iter().all(|&d| d < 10));
    }
}
