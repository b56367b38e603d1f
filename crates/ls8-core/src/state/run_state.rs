use crate::fault::Fault;

/// Deterministic execution-state machine for host-observable control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// The halt opcode was fetched; the run completed successfully.
    Halted,
    /// A fault is latched and no further progress is possible.
    Faulted(Fault),
}

impl RunState {
    /// Returns the currently latched fault, if this state is faulted.
    #[must_use]
    pub const fn latched_fault(self) -> Option<Fault> {
        match self {
            Self::Faulted(cause) => Some(cause),
            Self::Running | Self::Halted => None,
        }
    }
}
