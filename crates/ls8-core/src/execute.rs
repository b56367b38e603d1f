//! Fetch-dispatch-execute loop and the per-instruction handlers.
//!
//! Handlers are free functions over the CPU state, selected through an
//! exhaustive match on the classified opcode. A handler is the sole
//! authority for the next program-counter value, and a faulting handler
//! commits no partial side effects: operand and bounds validation happen
//! before any register, memory, stack-pointer, or program-counter write.

use crate::alu::alu;
use crate::api::{Cpu, OutputSink, RunOutcome, StepOutcome, TraceEvent, TraceSink};
use crate::fault::Fault;
use crate::opcode::Opcode;
use crate::state::{RunState, FL_E};

/// Trace sink that discards every event.
struct SilentTrace;

impl TraceSink for SilentTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}

/// Executes a single instruction step without trace dispatch.
pub fn step_one(cpu: &mut Cpu, output: &mut dyn OutputSink) -> StepOutcome {
    step_one_traced(cpu, output, &mut SilentTrace)
}

/// Executes a single instruction step, reporting boundaries to `trace`.
///
/// A halted CPU stays halted and a latched fault is returned verbatim;
/// neither re-executes anything.
pub fn step_one_traced(
    cpu: &mut Cpu,
    output: &mut dyn OutputSink,
    trace: &mut dyn TraceSink,
) -> StepOutcome {
    match cpu.run_state {
        RunState::Faulted(cause) => return StepOutcome::Fault { cause },
        RunState::Halted => return StepOutcome::Halted,
        RunState::Running => {}
    }

    let pc = cpu.arch.pc();
    let Some(byte) = cpu.memory.read(pc) else {
        return latch_fault(cpu, trace, Fault::MemoryOutOfBounds { pc, addr: pc });
    };
    trace.on_event(TraceEvent::InstructionStart { pc, opcode: byte });

    let Some(opcode) = Opcode::from_u8(byte) else {
        return latch_fault(cpu, trace, Fault::IllegalInstruction { pc, opcode: byte });
    };

    if opcode == Opcode::Hlt {
        cpu.run_state = RunState::Halted;
        trace.on_event(TraceEvent::Halted { pc });
        return StepOutcome::Halted;
    }

    match execute_opcode(cpu, output, opcode) {
        Ok(()) => {
            trace.on_event(TraceEvent::InstructionRetired {
                pc,
                next_pc: cpu.arch.pc(),
            });
            StepOutcome::Retired { opcode }
        }
        Err(cause) => latch_fault(cpu, trace, cause),
    }
}

/// Runs until halt or fault, without trace dispatch.
pub fn run(cpu: &mut Cpu, output: &mut dyn OutputSink) -> RunOutcome {
    run_traced(cpu, output, &mut SilentTrace)
}

/// Runs until halt or fault, reporting step boundaries to `trace`.
pub fn run_traced(
    cpu: &mut Cpu,
    output: &mut dyn OutputSink,
    trace: &mut dyn TraceSink,
) -> RunOutcome {
    let mut steps = 0_u32;
    loop {
        let outcome = step_one_traced(cpu, output, trace);
        match outcome {
            StepOutcome::Retired { .. } => steps += 1,
            StepOutcome::Halted | StepOutcome::Fault { .. } => {
                return RunOutcome {
                    steps,
                    final_step: outcome,
                };
            }
        }
    }
}

fn latch_fault(cpu: &mut Cpu, trace: &mut dyn TraceSink, cause: Fault) -> StepOutcome {
    cpu.run_state = RunState::Faulted(cause);
    trace.on_event(TraceEvent::FaultRaised {
        pc: cause.pc(),
        cause,
    });
    StepOutcome::Fault { cause }
}

fn execute_opcode(cpu: &mut Cpu, output: &mut dyn OutputSink, opcode: Opcode) -> Result<(), Fault> {
    match opcode {
        // Halt never reaches dispatch; the step loop retires it directly.
        Opcode::Hlt => Ok(()),
        Opcode::Ldi => execute_ldi(cpu),
        Opcode::Prn => execute_prn(cpu, output),
        Opcode::Add | Opcode::Mul | Opcode::Cmp => execute_binary_alu(cpu, opcode),
        Opcode::Push => execute_push(cpu),
        Opcode::Pop => execute_pop(cpu),
        Opcode::Call => execute_call(cpu),
        Opcode::Ret => execute_ret(cpu),
        Opcode::Jmp => execute_jmp(cpu),
        Opcode::Jeq => execute_jeq(cpu),
        Opcode::Jne => execute_jne(cpu),
    }
}

/// Reads the operand byte at `pc + offset`, wrapping within the address
/// space.
fn operand(cpu: &Cpu, offset: u8) -> Result<u8, Fault> {
    let pc = cpu.arch.pc();
    let addr = pc.wrapping_add(offset);
    cpu.memory
        .read(addr)
        .ok_or(Fault::MemoryOutOfBounds { pc, addr })
}

fn register_value(cpu: &Cpu, index: u8) -> Result<u8, Fault> {
    cpu.arch.gpr(index).ok_or(Fault::RegisterOutOfBounds {
        pc: cpu.arch.pc(),
        index,
    })
}

fn advance_pc(cpu: &mut Cpu, opcode: Opcode) {
    let pc = cpu.arch.pc();
    cpu.arch.set_pc(pc.wrapping_add(opcode.instruction_len()));
}

fn execute_ldi(cpu: &mut Cpu) -> Result<(), Fault> {
    let pc = cpu.arch.pc();
    let index = operand(cpu, 1)?;
    let value = operand(cpu, 2)?;
    *cpu.arch
        .gpr_mut(index)
        .ok_or(Fault::RegisterOutOfBounds { pc, index })? = value;
    advance_pc(cpu, Opcode::Ldi);
    Ok(())
}

fn execute_prn(cpu: &mut Cpu, output: &mut dyn OutputSink) -> Result<(), Fault> {
    let index = operand(cpu, 1)?;
    let value = register_value(cpu, index)?;
    output.print_value(value);
    advance_pc(cpu, Opcode::Prn);
    Ok(())
}

fn execute_binary_alu(cpu: &mut Cpu, opcode: Opcode) -> Result<(), Fault> {
    let reg_a = operand(cpu, 1)?;
    let reg_b = operand(cpu, 2)?;
    alu(&mut cpu.arch, opcode, reg_a, reg_b)?;
    advance_pc(cpu, opcode);
    Ok(())
}

fn execute_push(cpu: &mut Cpu) -> Result<(), Fault> {
    let pc = cpu.arch.pc();
    let index = operand(cpu, 1)?;
    let value = register_value(cpu, index)?;
    let new_sp = cpu.arch.sp().wrapping_sub(1);
    cpu.memory
        .write(new_sp, value)
        .ok_or(Fault::MemoryOutOfBounds { pc, addr: new_sp })?;
    cpu.arch.set_sp(new_sp);
    advance_pc(cpu, Opcode::Push);
    Ok(())
}

fn execute_pop(cpu: &mut Cpu) -> Result<(), Fault> {
    let pc = cpu.arch.pc();
    let index = operand(cpu, 1)?;
    let sp = cpu.arch.sp();
    let value = cpu
        .memory
        .read(sp)
        .ok_or(Fault::MemoryOutOfBounds { pc, addr: sp })?;
    *cpu.arch
        .gpr_mut(index)
        .ok_or(Fault::RegisterOutOfBounds { pc, index })? = value;
    cpu.arch.set_sp(sp.wrapping_add(1));
    advance_pc(cpu, Opcode::Pop);
    Ok(())
}

fn execute_call(cpu: &mut Cpu) -> Result<(), Fault> {
    let pc = cpu.arch.pc();
    let index = operand(cpu, 1)?;
    let target = register_value(cpu, index)?;
    let return_addr = pc.wrapping_add(Opcode::Call.instruction_len());
    let new_sp = cpu.arch.sp().wrapping_sub(1);
    cpu.memory
        .write(new_sp, return_addr)
        .ok_or(Fault::MemoryOutOfBounds { pc, addr: new_sp })?;
    cpu.arch.set_sp(new_sp);
    cpu.arch.set_pc(target);
    Ok(())
}

fn execute_ret(cpu: &mut Cpu) -> Result<(), Fault> {
    let pc = cpu.arch.pc();
    let sp = cpu.arch.sp();
    let return_addr = cpu
        .memory
        .read(sp)
        .ok_or(Fault::MemoryOutOfBounds { pc, addr: sp })?;
    cpu.arch.set_sp(sp.wrapping_add(1));
    cpu.arch.set_pc(return_addr);
    Ok(())
}

fn execute_jmp(cpu: &mut Cpu) -> Result<(), Fault> {
    let index = operand(cpu, 1)?;
    let target = register_value(cpu, index)?;
    cpu.arch.set_pc(target);
    Ok(())
}

fn execute_jeq(cpu: &mut Cpu) -> Result<(), Fault> {
    let index = operand(cpu, 1)?;
    let target = register_value(cpu, index)?;
    if cpu.arch.fl_is_set(FL_E) {
        cpu.arch.set_pc(target);
    } else {
        advance_pc(cpu, Opcode::Jeq);
    }
    Ok(())
}

fn execute_jne(cpu: &mut Cpu) -> Result<(), Fault> {
    let index = operand(cpu, 1)?;
    let target = register_value(cpu, index)?;
    if cpu.arch.fl_is_set(FL_E) {
        advance_pc(cpu, Opcode::Jne);
    } else {
        cpu.arch.set_pc(target);
    }
    Ok(())
}
