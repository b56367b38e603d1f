//! Opcode constants and the dispatch classification table for the LS8 ISA.

use std::fmt;

/// Instruction opcodes with their assigned byte encodings.
///
/// The encoding layout is `AABCDDDD`: bits 7-6 carry the operand count,
/// bit 5 marks instructions routed through the ALU, bit 4 marks
/// instructions that set the program counter directly, and bits 3-0
/// identify the instruction within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Opcode {
    /// Stop execution.
    Hlt = 0b0000_0001,
    /// Load an immediate byte into a register.
    Ldi = 0b1000_0010,
    /// Emit a register's value to the output sink.
    Prn = 0b0100_0111,
    /// Multiply two registers, result into the first.
    Mul = 0b1010_0010,
    /// Add two registers, result into the first.
    Add = 0b1010_0000,
    /// Compare two registers and set the `FL` condition bits.
    Cmp = 0b1010_0111,
    /// Push a register's value onto the stack.
    Push = 0b0100_0101,
    /// Pop the top of the stack into a register.
    Pop = 0b0100_0110,
    /// Push the return address and jump to a register-sourced target.
    Call = 0b0101_0000,
    /// Pop the return address into the program counter.
    Ret = 0b0001_0001,
    /// Jump to a register-sourced target.
    Jmp = 0b0101_0100,
    /// Jump to a register-sourced target when the `E` flag is set.
    Jeq = 0b0101_0101,
    /// Jump to a register-sourced target when the `E` flag is clear.
    Jne = 0b0101_0110,
}

/// Single source-of-truth dispatch table mapping opcode bytes to
/// instructions.
///
/// Any byte not present here is illegal by definition.
pub const DISPATCH_TABLE: &[(u8, Opcode)] = &[
    (0b0000_0001, Opcode::Hlt),
    (0b1000_0010, Opcode::Ldi),
    (0b0100_0111, Opcode::Prn),
    (0b1010_0010, Opcode::Mul),
    (0b1010_0000, Opcode::Add),
    (0b1010_0111, Opcode::Cmp),
    (0b0100_0101, Opcode::Push),
    (0b0100_0110, Opcode::Pop),
    (0b0101_0000, Opcode::Call),
    (0b0001_0001, Opcode::Ret),
    (0b0101_0100, Opcode::Jmp),
    (0b0101_0101, Opcode::Jeq),
    (0b0101_0110, Opcode::Jne),
];

impl Opcode {
    /// Classifies a fetched byte against the dispatch table.
    ///
    /// `None` means the byte is not a recognized instruction.
    #[must_use]
    pub fn from_u8(byte: u8) -> Option<Self> {
        DISPATCH_TABLE
            .iter()
            .find_map(|(value, opcode)| (*value == byte).then_some(*opcode))
    }

    /// Returns the raw opcode byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Number of operand bytes following the opcode (bits 7-6).
    #[must_use]
    pub const fn operand_count(self) -> u8 {
        (self as u8) >> 6
    }

    /// Total instruction width in bytes, opcode included.
    #[must_use]
    pub const fn instruction_len(self) -> u8 {
        1 + self.operand_count()
    }

    /// Returns `true` when the instruction is routed through the ALU
    /// (bit 5).
    #[must_use]
    pub const fn is_alu(self) -> bool {
        (self as u8) & 0b0010_0000 != 0
    }

    /// Returns `true` when the handler sets the program counter directly
    /// instead of advancing past the instruction (bit 4).
    #[must_use]
    pub const fn sets_pc(self) -> bool {
        (self as u8) & 0b0001_0000 != 0
    }

    /// Canonical assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Hlt => "HLT",
            Self::Ldi => "LDI",
            Self::Prn => "PRN",
            Self::Mul => "MUL",
            Self::Add => "ADD",
            Self::Cmp => "CMP",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Call => "CALL",
            Self::Ret => "RET",
            Self::Jmp => "JMP",
            Self::Jeq => "JEQ",
            Self::Jne => "JNE",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
