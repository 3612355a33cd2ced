//! Command-line boot sequence: argument parsing, code/payload loading,
//! register persistence, and exit-code mapping.

use crate::config::InterpreterConfig;
use crate::error::TglError;
use crate::interpreter::Interpreter;
use crate::payload::PayloadState;
use crate::persistence;
use crate::value::TglString;
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tgl", about = "A stack-oriented byte-string text generation interpreter")]
pub struct Args {
    /// Program source; reads from stdin when omitted.
    pub program: Option<PathBuf>,

    /// Overrides the default library file (`$HOME/.tgl`).
    #[arg(short = 'l', long = "library")]
    pub library: Option<PathBuf>,

    /// Overrides the default register-persistence file
    /// (`$HOME/.tgl_registers`).
    #[arg(short = 'r', long = "registers")]
    pub registers: Option<PathBuf>,

    /// Sets the initial context name.
    #[arg(short = 'c', long = "context", default_value = "")]
    pub context: String,

    /// Disables loading and saving register persistence for this run.
    #[arg(long)]
    pub no_persistence: bool,
}

/// Whether `code` is trivial enough that the history ring should not record
/// it: a bare `h` invocation (with or without a following digit), which
/// only reads history and carries no side effect worth remembering.
fn is_trivial_history_read(code: &TglString) -> bool {
    let trimmed: Vec<u8> = code.as_bytes().iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
    matches!(trimmed.as_slice(), [b'h'] | [b'h', b'0'..=b'9'])
}

pub fn run(args: Args) -> i32 {
    match run_inner(args) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("tgl: error: {e}");
            e.exit_code()
        }
    }
}

fn run_inner(args: Args) -> crate::error::Result<()> {
    let mut config = InterpreterConfig::from_env();
    if let Some(library) = args.library {
        config.library_path = library;
    }
    if let Some(registers) = args.registers {
        config.register_path = registers;
    }
    if !args.context.is_empty() {
        config.initial_context = args.context;
    }

    let source = match &args.program {
        Some(path) => std::fs::read(path).map_err(TglError::Io)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).map_err(TglError::Io)?;
            buf
        }
    };
    let code = TglString::from_bytes(source);

    let mut interp = Interpreter::new(config);
    if !args.no_persistence {
        persistence::load(&interp.config.register_path, &mut interp.registers)?;
    }

    interp.payload.set_global_code(code.clone());
    let (prefix, rest) = PayloadState::extract_prefix(&code);
    if let Some(prefix) = prefix {
        interp.payload.set_payload(prefix);
    }

    let result = interp.exec_code(&rest);

    if interp.history_enabled && !is_trivial_history_read(&code) {
        interp.registers.push_history(code);
    }
    if !args.no_persistence {
        persistence::save(&interp.config.register_path, &interp.registers)?;
    }

    result
}
