//! Property coverage for the instruction-set contracts.

use ls8_core::{
    run, step_one, Cpu, Opcode, OutputSink, StepOutcome, DEFAULT_STACK_POINTER, FL_E, FL_G, FL_L,
};
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

#[derive(Default)]
struct CollectSink {
    values: Vec<u8>,
}

impl OutputSink for CollectSink {
    fn print_value(&mut self, value: u8) {
        self.values.push(value);
    }
}

/// Steps until halt or fault with a hard iteration bound, so arbitrary
/// programs with jump cycles still terminate.
fn run_bounded(cpu: &mut Cpu, sink: &mut CollectSink, max_steps: u32) -> StepOutcome {
    let mut last = StepOutcome::Halted;
    for _ in 0..max_steps {
        last = step_one(cpu, sink);
        if !matches!(last, StepOutcome::Retired { .. }) {
            break;
        }
    }
    last
}

proptest! {
    #[test]
    fn ldi_then_prn_emits_exactly_the_loaded_value(reg in 0_u8..8, value in any::<u8>()) {
        let mut cpu = Cpu::default();
        cpu.load(&[
            Opcode::Ldi.as_u8(), reg, value,
            Opcode::Prn.as_u8(), reg,
            Opcode::Hlt.as_u8(),
        ]).expect("program fits");
        let mut sink = CollectSink::default();

        let outcome = run(&mut cpu, &mut sink);

        prop_assert_eq!(outcome.final_step, StepOutcome::Halted);
        prop_assert_eq!(sink.values, vec![value]);
    }

    #[test]
    fn balanced_pushes_and_pops_restore_the_stack_pointer(
        values in proptest::collection::vec(any::<u8>(), 1..16),
    ) {
        let mut program = Vec::new();
        for value in &values {
            program.extend_from_slice(&[Opcode::Ldi.as_u8(), 0, *value]);
            program.extend_from_slice(&[Opcode::Push.as_u8(), 0]);
        }
        for _ in &values {
            program.extend_from_slice(&[Opcode::Pop.as_u8(), 1]);
            program.extend_from_slice(&[Opcode::Prn.as_u8(), 1]);
        }
        program.push(Opcode::Hlt.as_u8());

        let mut cpu = Cpu::default();
        cpu.load(&program).expect("program fits");
        let mut sink = CollectSink::default();

        let outcome = run(&mut cpu, &mut sink);

        let mut expected = values;
        expected.reverse();
        prop_assert_eq!(outcome.final_step, StepOutcome::Halted);
        prop_assert_eq!(sink.values, expected);
        prop_assert_eq!(cpu.arch.sp(), DEFAULT_STACK_POINTER);
    }

    #[test]
    fn cmp_sets_exactly_one_flag_for_any_operands(a in any::<u8>(), b in any::<u8>()) {
        let mut cpu = Cpu::default();
        cpu.load(&[
            Opcode::Ldi.as_u8(), 0, a,
            Opcode::Ldi.as_u8(), 1, b,
            Opcode::Cmp.as_u8(), 0, 1,
            Opcode::Hlt.as_u8(),
        ]).expect("program fits");
        let mut sink = CollectSink::default();

        let outcome = run(&mut cpu, &mut sink);
        prop_assert_eq!(outcome.final_step, StepOutcome::Halted);

        let fl = cpu.arch.fl();
        prop_assert_eq!(u32::from(fl).count_ones(), 1);
        let expected = if a == b {
            FL_E
        } else if a > b {
            FL_G
        } else {
            FL_L
        };
        prop_assert_eq!(fl, expected);
    }

    #[test]
    fn add_and_mul_wrap_to_eight_bits(a in any::<u8>(), b in any::<u8>()) {
        let mut cpu = Cpu::default();
        cpu.load(&[
            Opcode::Ldi.as_u8(), 0, a,
            Opcode::Ldi.as_u8(), 1, b,
            Opcode::Add.as_u8(), 0, 1,
            Opcode::Ldi.as_u8(), 2, a,
            Opcode::Mul.as_u8(), 2, 1,
            Opcode::Hlt.as_u8(),
        ]).expect("program fits");
        let mut sink = CollectSink::default();

        let outcome = run(&mut cpu, &mut sink);

        prop_assert_eq!(outcome.final_step, StepOutcome::Halted);
        prop_assert_eq!(cpu.arch.gpr(0), Some(a.wrapping_add(b)));
        prop_assert_eq!(cpu.arch.gpr(2), Some(a.wrapping_mul(b)));
    }

    #[test]
    fn execution_is_deterministic_for_arbitrary_images(
        program in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut first = Cpu::default();
        first.load(&program).expect("program fits");
        let mut first_sink = CollectSink::default();
        let first_last = run_bounded(&mut first, &mut first_sink, 1_000);

        let mut second = Cpu::default();
        second.load(&program).expect("program fits");
        let mut second_sink = CollectSink::default();
        let second_last = run_bounded(&mut second, &mut second_sink, 1_000);

        prop_assert_eq!(first_last, second_last);
        prop_assert_eq!(first_sink.values, second_sink.values);
        prop_assert_eq!(first, second);
    }
}
