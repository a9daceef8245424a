extern crate clap;

use std::{
    io::{self, Write},
    process::ExitCode,
    time::Instant,
};

use brainfold::{
    ByteCodeInterpreter, EofBehavior, RunState, Runtime, RuntimeConfig, DEFAULT_TAPE_LEN,
};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXIT_USAGE: u8 = 1;
const EXIT_SYNTAX: u8 = 2;
const EXIT_FAULT: u8 = 3;
const EXIT_PAUSED: u8 = 4;

/// Brainf**k translator and interpreter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to run
    #[arg(required_unless_present = "eval")]
    file: Option<String>,

    /// Run the given code directly instead of a file
    #[arg(short, long)]
    eval: Option<String>,

    /// Dump the translated instructions instead of running them
    #[arg(short, long)]
    disassemble: bool,

    /// Number of cells on the tape
    #[arg(short, long, default_value_t = DEFAULT_TAPE_LEN)]
    tape_len: usize,

    /// What `,` stores once input runs out
    #[arg(long, value_enum, default_value_t = Eof::Max)]
    eof: Eof,

    /// Give up after this many instructions
    #[arg(short, long)]
    max_steps: Option<u32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Eof {
    /// Store 0
    Zero,
    /// Leave the cell alone
    Unchanged,
    /// Store 255
    Max,
}

impl From<Eof> for EofBehavior {
    fn from(eof: Eof) -> Self {
        match eof {
            Eof::Zero => EofBehavior::Zero,
            Eof::Unchanged => EofBehavior::Unchanged,
            Eof::Max => EofBehavior::Max,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let source = match (&args.eval, &args.file) {
        (Some(code), _) => code.clone().into_bytes(),
        (None, Some(file)) => match std::fs::read(file) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{}: Failed to read {}: {}", "Error".red(), file, e);
                return ExitCode::from(EXIT_USAGE);
            }
        },
        // clap rejects this combination before we get here
        (None, None) => return ExitCode::from(EXIT_USAGE),
    };

    let config = RuntimeConfig {
        tape_len: args.tape_len,
        eof: args.eof.into(),
    };
    let runtime = Runtime::new(config, io::stdin(), io::stdout());
    let mut interpreter = ByteCodeInterpreter::new(runtime);

    let now = Instant::now();
    if let Err(e) = interpreter.load_source(&source) {
        eprintln!("{}: {}", "Error".red(), e);
        return ExitCode::from(EXIT_SYNTAX);
    }
    debug!(elapsed = ?now.elapsed(), instructions = interpreter.code().len(), "loaded");

    if args.disassemble {
        eprintln!(
            "{} {} bytes.\n",
            "Generated code:".green(),
            interpreter.code_size_bytes()
        );
        let mut stdout = io::stdout();
        if let Err(e) = writeln!(stdout, "{}", interpreter.disassemble()) {
            eprintln!("{}: {}", "Error".red(), e);
            return ExitCode::from(EXIT_USAGE);
        }
        return ExitCode::SUCCESS;
    }

    let now = Instant::now();
    let result = match args.max_steps {
        Some(max_steps) => interpreter.run_bounded(max_steps),
        None => interpreter.run_to_completion(),
    };
    debug!(elapsed = ?now.elapsed(), "finished running");

    match result {
        Ok(RunState::Finished) => ExitCode::SUCCESS,
        Ok(state) => {
            eprintln!(
                "{}: stopped at instruction {} ({:?}) after the step limit",
                "Warning".yellow(),
                interpreter.pc(),
                state
            );
            ExitCode::from(EXIT_PAUSED)
        }
        Err(fault) => {
            eprintln!("{}: {}", "Error".red(), fault);
            ExitCode::from(EXIT_FAULT)
        }
    }
}
