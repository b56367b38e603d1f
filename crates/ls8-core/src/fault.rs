use thiserror::Error;

use crate::opcode::Opcode;

/// Stable runtime fault taxonomy.
///
/// Every fault is fatal: it is latched into the run state, aborts the run,
/// and leaves the machine state as-is for inspection. Each variant carries
/// the program counter of the faulting instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// Fetched byte has no dispatch table entry and is not halt.
    #[error("illegal instruction {opcode:#010b} at pc {pc:#04x}")]
    IllegalInstruction {
        /// Program counter of the faulting fetch.
        pc: u8,
        /// The unrecognized opcode byte.
        opcode: u8,
    },
    /// A computed memory address fell outside the configured capacity.
    #[error("memory address {addr:#04x} out of bounds at pc {pc:#04x}")]
    MemoryOutOfBounds {
        /// Program counter of the faulting instruction.
        pc: u8,
        /// The rejected address.
        addr: u8,
    },
    /// A register operand fell outside the register file.
    #[error("register index {index} out of bounds at pc {pc:#04x}")]
    RegisterOutOfBounds {
        /// Program counter of the faulting instruction.
        pc: u8,
        /// The rejected register index.
        index: u8,
    },
    /// A non-ALU opcode was routed to the ALU.
    ///
    /// This is a dispatch wiring defect, not a condition a well-formed
    /// program can reach.
    #[error("{opcode} is not an alu operation (pc {pc:#04x})")]
    UnsupportedAluOperation {
        /// Program counter of the mis-wired instruction.
        pc: u8,
        /// The opcode that was routed to the ALU.
        opcode: Opcode,
    },
}

impl Fault {
    /// Program counter captured when the fault was raised.
    #[must_use]
    pub const fn pc(self) -> u8 {
        match self {
            Self::IllegalInstruction { pc, .. }
            | Self::MemoryOutOfBounds { pc, .. }
            | Self::RegisterOutOfBounds { pc, .. }
            | Self::UnsupportedAluOperation { pc, .. } => pc,
        }
    }
}

/// Load-time error: the program cannot be placed into memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum LoadError {
    /// Program byte count exceeds the memory capacity.
    #[error("program of {len} bytes exceeds memory capacity of {capacity} bytes")]
    ProgramTooLarge {
        /// Length of the rejected program in bytes.
        len: usize,
        /// Capacity of the target memory in bytes.
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::{Fault, LoadError};
    use crate::opcode::Opcode;

    #[test]
    fn fault_messages_carry_pc_and_operand_context() {
        let fault = Fault::IllegalInstruction {
            pc: 0x0A,
            opcode: 0b0000_1000,
        };
        let message = fault.to_string();
        assert!(message.contains("0b00001000"));
        assert!(message.contains("0x0a"));

        let fault = Fault::RegisterOutOfBounds { pc: 0x03, index: 9 };
        assert!(fault.to_string().contains("register index 9"));
    }

    #[test]
    fn fault_pc_accessor_reports_every_variant() {
        assert_eq!(Fault::IllegalInstruction { pc: 1, opcode: 0 }.pc(), 1);
        assert_eq!(Fault::MemoryOutOfBounds { pc: 2, addr: 0 }.pc(), 2);
        assert_eq!(Fault::RegisterOutOfBounds { pc: 3, index: 0 }.pc(), 3);
        assert_eq!(
            Fault::UnsupportedAluOperation {
                pc: 4,
                opcode: Opcode::Push,
            }
            .pc(),
            4
        );
    }

    #[test]
    fn load_error_reports_both_sizes() {
        let error = LoadError::ProgramTooLarge {
            len: 300,
            capacity: 256,
        };
        let message = error.to_string();
        assert!(message.contains("300"));
        assert!(message.contains("256"));
    }
}
