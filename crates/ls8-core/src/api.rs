//! Public host-facing API contracts for embedding the emulator core.

use crate::fault::{Fault, LoadError};
use crate::memory::{Memory, DEFAULT_MEMORY_BYTES};
use crate::opcode::Opcode;
use crate::state::{ArchitecturalState, RunState, DEFAULT_STACK_POINTER, GENERAL_REGISTER_COUNT};

/// Top-level immutable configuration for a CPU instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CpuConfig {
    /// Capacity of the addressable space in bytes.
    pub memory_size: usize,
    /// Number of general-purpose registers.
    pub register_count: usize,
    /// Starting stack-pointer address.
    pub initial_sp: u8,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_BYTES,
            register_count: GENERAL_REGISTER_COUNT,
            initial_sp: DEFAULT_STACK_POINTER,
        }
    }
}

/// Complete machine state for one LS8 core.
///
/// All state is owned exclusively by this value for the duration of a run;
/// execution is single-threaded and fully deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Cpu {
    /// Architectural register file, program counter, stack pointer, and
    /// flags.
    pub arch: ArchitecturalState,
    /// Unified code, data, and stack store.
    pub memory: Memory,
    /// Current execution state.
    pub run_state: RunState,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::with_config(&CpuConfig::default())
    }
}

impl Cpu {
    /// Creates a CPU from explicit construction parameters.
    #[must_use]
    pub fn with_config(config: &CpuConfig) -> Self {
        Self {
            arch: ArchitecturalState::new(config.register_count, config.initial_sp),
            memory: Memory::new(config.memory_size),
            run_state: RunState::Running,
        }
    }

    /// Places a program image into memory starting at address 0.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::ProgramTooLarge`] when the program exceeds the
    /// memory capacity; memory is left unmodified and the run never
    /// starts.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.memory.load(program)
    }
}

/// Sink for values emitted by the `PRN` instruction.
///
/// The core's obligation is only "value of register N at time of `PRN`, in
/// order"; formatting is the host's concern.
pub trait OutputSink {
    /// Receives one printed register value, in program order.
    fn print_value(&mut self, value: u8);
}

/// Deterministic trace events emitted at step boundaries when a trace sink
/// is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Pre-dispatch event for an instruction fetch.
    InstructionStart {
        /// Program counter used for this fetch.
        pc: u8,
        /// Raw opcode byte fetched from memory.
        opcode: u8,
    },
    /// Post-execute event for a retired instruction.
    InstructionRetired {
        /// Program counter of the retired instruction.
        pc: u8,
        /// Program counter selected by the handler.
        next_pc: u8,
    },
    /// The halt opcode was fetched and the run completed.
    Halted {
        /// Program counter of the halt instruction.
        pc: u8,
    },
    /// A fault was raised and latched.
    FaultRaised {
        /// Program counter active when the fault was observed.
        pc: u8,
        /// The latched fault.
        cause: Fault,
    },
}

/// Sink trait for deterministic trace hooks.
///
/// Tracing is an optional observability boundary: core semantics never
/// depend on whether a sink is attached.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Output status from one step of the execution loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// An instruction handler ran to completion.
    Retired {
        /// The dispatched opcode.
        opcode: Opcode,
    },
    /// The halt opcode was fetched; the run is complete.
    Halted,
    /// A fault was raised, or was already latched from an earlier step.
    Fault {
        /// The latched fault.
        cause: Fault,
    },
}

/// Aggregated outcome from running steps until halt or fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Number of retired handler invocations during this run call.
    pub steps: u32,
    /// Last step-level status observed before returning.
    pub final_step: StepOutcome,
}
