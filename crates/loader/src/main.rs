//! CLI entry point for the `ls8` emulator binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::PathBuf;

use loader::parser::parse_program;
use loader::trace::TraceWriter;
use ls8_core::{run, run_traced, Cpu, OutputSink, RunOutcome, StepOutcome};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: ls8 [options] <program.ls8>

Arguments:
  <program.ls8>  Program source: one 8-bit binary value per line,
                 '#' starts a comment to end of line

Options:
  -t, --trace   Print an instruction trace to stderr
  -h, --help    Show this help message

Examples:
  ls8 mult.ls8
  ls8 --trace mult.ls8
";

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    program: PathBuf,
    trace: bool,
}

#[derive(Debug)]
enum ParseResult {
    Command(RunArgs),
    Help,
}

fn parse_args(args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut program: Option<PathBuf> = None;
    let mut trace = false;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--trace" || arg == "-t" {
            trace = true;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(ParseResult::Command(RunArgs { program, trace }))
}

/// Prints one decimal value per line, the format `PRN` users expect.
struct StdoutSink;

impl OutputSink for StdoutSink {
    fn print_value(&mut self, value: u8) {
        println!("{value}");
    }
}

fn run_program_file(args: &RunArgs) -> Result<(), i32> {
    let source = match fs::read_to_string(&args.program) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: failed to read {}: {error}", args.program.display());
            return Err(1);
        }
    };

    let program = match parse_program(&source) {
        Ok(program) => program,
        Err(error) => {
            eprintln!("{}: error: {error}", args.program.display());
            return Err(1);
        }
    };

    let mut cpu = Cpu::default();
    if let Err(error) = cpu.load(&program) {
        eprintln!("error: {error}");
        return Err(1);
    }

    let mut sink = StdoutSink;
    let outcome = if args.trace {
        let mut trace = TraceWriter::new(io::stderr());
        run_traced(&mut cpu, &mut sink, &mut trace)
    } else {
        run(&mut cpu, &mut sink)
    };

    report_outcome(&outcome)
}

fn report_outcome(outcome: &RunOutcome) -> Result<(), i32> {
    match outcome.final_step {
        StepOutcome::Fault { cause } => {
            eprintln!("error: {cause}");
            Err(1)
        }
        // The run loop only returns on halt or fault.
        StepOutcome::Halted | StepOutcome::Retired { .. } => Ok(()),
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(args)) => match run_program_file(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}
