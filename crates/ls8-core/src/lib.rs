//! Core emulator crate for the LS8 virtual machine.

/// Fixed-capacity memory model and load contract.
pub mod memory;
pub use memory::{Memory, DEFAULT_MEMORY_BYTES};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{Cpu, CpuConfig, OutputSink, RunOutcome, StepOutcome, TraceEvent, TraceSink};

/// Architectural CPU state model primitives.
pub mod state;
pub use state::{
    ArchitecturalState, RunState, DEFAULT_STACK_POINTER, FL_ACTIVE_MASK, FL_E, FL_G, FL_L,
    GENERAL_REGISTER_COUNT,
};

/// Opcode constants and the dispatch classification table.
pub mod opcode;
pub use opcode::{Opcode, DISPATCH_TABLE};

/// Fault taxonomy for load-time and runtime errors.
pub mod fault;
pub use fault::{Fault, LoadError};

/// ALU sub-operations shared by the arithmetic instruction handlers.
pub mod alu;
pub use alu::alu;

/// Fetch-dispatch-execute loop and instruction handlers.
pub mod execute;
pub use execute::{run, run_traced, step_one, step_one_traced};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
