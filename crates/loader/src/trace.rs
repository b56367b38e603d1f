//! Rendering of core trace events for the CLI's `--trace` flag.

use std::io::Write;

use ls8_core::{Opcode, TraceEvent, TraceSink};

/// Renders trace events as `TRACE:` lines on any writer.
///
/// Write failures are swallowed: tracing must never alter execution.
#[derive(Debug)]
pub struct TraceWriter<W> {
    out: W,
}

impl<W: Write> TraceWriter<W> {
    /// Creates a trace sink backed by `out`.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the sink and returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TraceSink for TraceWriter<W> {
    fn on_event(&mut self, event: TraceEvent) {
        let _ = match event {
            TraceEvent::InstructionStart { pc, opcode } => match Opcode::from_u8(opcode) {
                Some(op) => writeln!(self.out, "TRACE: {pc:02X} | {opcode:08b} {op}"),
                None => writeln!(self.out, "TRACE: {pc:02X} | {opcode:08b} ??"),
            },
            TraceEvent::InstructionRetired { .. } => Ok(()),
            TraceEvent::Halted { pc } => writeln!(self.out, "TRACE: {pc:02X} | halted"),
            TraceEvent::FaultRaised { pc, cause } => {
                writeln!(self.out, "TRACE: {pc:02X} | fault: {cause}")
            }
        };
    }
}
