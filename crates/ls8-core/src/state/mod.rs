//! Architectural CPU state model primitives.

/// Register file, flags, and the special address registers.
pub mod registers;
/// Execution-state machine for the run loop.
pub mod run_state;

pub use registers::{
    ArchitecturalState, DEFAULT_STACK_POINTER, FL_ACTIVE_MASK, FL_E, FL_G, FL_L,
    GENERAL_REGISTER_COUNT,
};
pub use run_state::RunState;
