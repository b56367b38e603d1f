//! ALU sub-operations shared by the arithmetic instruction handlers.

use crate::fault::Fault;
use crate::opcode::Opcode;
use crate::state::{ArchitecturalState, FL_E, FL_G, FL_L};

/// Executes one ALU sub-operation against the register file.
///
/// `ADD` and `MUL` write the 8-bit-wrapped result back to `reg_a`; `CMP`
/// writes only `FL`, setting exactly one of the `E`/`G`/`L` bits. Routing
/// is by operation, not by raw opcode byte.
///
/// # Errors
///
/// Returns [`Fault::RegisterOutOfBounds`] when either operand index falls
/// outside the register file, and [`Fault::UnsupportedAluOperation`] when
/// `op` is not an ALU instruction — a dispatch wiring defect, unreachable
/// from a correctly built execution loop.
pub fn alu(state: &mut ArchitecturalState, op: Opcode, reg_a: u8, reg_b: u8) -> Result<(), Fault> {
    let pc = state.pc();
    let a = state.gpr(reg_a).ok_or(Fault::RegisterOutOfBounds {
        pc,
        index: reg_a,
    })?;
    let b = state.gpr(reg_b).ok_or(Fault::RegisterOutOfBounds {
        pc,
        index: reg_b,
    })?;

    let result = match op {
        Opcode::Add => a.wrapping_add(b),
        Opcode::Mul => a.wrapping_mul(b),
        Opcode::Cmp => {
            // Check order: Equal, then Greater, then Less.
            let fl = if a == b {
                FL_E
            } else if a > b {
                FL_G
            } else {
                FL_L
            };
            state.set_fl(fl);
            return Ok(());
        }
        other => {
            return Err(Fault::UnsupportedAluOperation { pc, opcode: other });
        }
    };

    *state.gpr_mut(reg_a).ok_or(Fault::RegisterOutOfBounds {
        pc,
        index: reg_a,
    })? = result;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::alu;
    use crate::fault::Fault;
    use crate::opcode::Opcode;
    use crate::state::{ArchitecturalState, FL_E, FL_G, FL_L};

    fn state_with(a: u8, b: u8) -> ArchitecturalState {
        let mut state = ArchitecturalState::default();
        *state.gpr_mut(0).expect("r0 exists") = a;
        *state.gpr_mut(1).expect("r1 exists") = b;
        state
    }

    #[test]
    fn add_writes_the_sum_into_the_first_register() {
        let mut state = state_with(5, 7);
        alu(&mut state, Opcode::Add, 0, 1).expect("valid operands");
        assert_eq!(state.gpr(0), Some(12));
        assert_eq!(state.gpr(1), Some(7));
    }

    #[test]
    fn add_wraps_to_eight_bits() {
        let mut state = state_with(200, 100);
        alu(&mut state, Opcode::Add, 0, 1).expect("valid operands");
        assert_eq!(state.gpr(0), Some(44));
    }

    #[test]
    fn mul_wraps_to_eight_bits() {
        let mut state = state_with(16, 32);
        alu(&mut state, Opcode::Mul, 0, 1).expect("valid operands");
        assert_eq!(state.gpr(0), Some(0));
    }

    #[rstest]
    #[case(5, 5, FL_E)]
    #[case(9, 5, FL_G)]
    #[case(3, 5, FL_L)]
    #[case(0, 0, FL_E)]
    #[case(u8::MAX, 0, FL_G)]
    fn cmp_sets_exactly_one_flag(#[case] a: u8, #[case] b: u8, #[case] expected: u8) {
        let mut state = state_with(a, b);
        alu(&mut state, Opcode::Cmp, 0, 1).expect("valid operands");
        assert_eq!(state.fl(), expected);
    }

    #[test]
    fn cmp_clears_the_previously_latched_flag() {
        let mut state = state_with(1, 1);
        alu(&mut state, Opcode::Cmp, 0, 1).expect("valid operands");
        assert_eq!(state.fl(), FL_E);

        *state.gpr_mut(0).expect("r0 exists") = 9;
        alu(&mut state, Opcode::Cmp, 0, 1).expect("valid operands");
        assert_eq!(state.fl(), FL_G, "only the new outcome may remain");
    }

    #[test]
    fn cmp_leaves_both_operand_registers_untouched() {
        let mut state = state_with(3, 5);
        alu(&mut state, Opcode::Cmp, 0, 1).expect("valid operands");
        assert_eq!(state.gpr(0), Some(3));
        assert_eq!(state.gpr(1), Some(5));
    }

    #[test]
    fn out_of_range_operand_indices_fault() {
        let mut state = ArchitecturalState::default();
        assert_eq!(
            alu(&mut state, Opcode::Add, 8, 0),
            Err(Fault::RegisterOutOfBounds { pc: 0, index: 8 })
        );
        assert_eq!(
            alu(&mut state, Opcode::Add, 0, 8),
            Err(Fault::RegisterOutOfBounds { pc: 0, index: 8 })
        );
    }

    #[test]
    fn non_alu_opcode_is_a_wiring_contract_error() {
        let mut state = ArchitecturalState::default();
        assert_eq!(
            alu(&mut state, Opcode::Push, 0, 1),
            Err(Fault::UnsupportedAluOperation {
                pc: 0,
                opcode: Opcode::Push,
            })
        );
    }
}
