//! Runtime interpreter error taxonomy.

use std::io;
use thiserror::Error;

/// Interpreter runtime error variants.
///
/// Every handler that fails returns one of these; the dispatcher turns it
/// into a diagnostic on stderr and unwinds the enclosing `exec_code`.
#[derive(Debug, Error)]
pub enum TglError {
    /// Stack did not contain enough operands for the command.
    #[error("Stack underflow")]
    Underflow,
    /// P-stack was empty on `P`.
    #[error("P-stack underflow")]
    PStackUnderflow,
    /// A literal, escape, or code block was malformed.
    #[error("{0}")]
    Parse(String),
    /// A well-formed operation failed for semantic reasons (division by
    /// zero, redefinition, invalid increment, ...).
    #[error("{0}")]
    Semantic(String),
    /// Context/glob/payload-cursor related failure.
    #[error("{0}")]
    Context(String),
    /// I/O failure reading/writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A subprocess failed to spawn, was killed by a signal, or exited
    /// non-zero when the caller required success.
    #[error("{0}")]
    Subprocess(String),
    /// The register-persistence file's magic or probe record didn't match.
    #[error("{0}")]
    Persistence(String),
    /// A required environment variable (e.g. `SHELL`) was not set.
    #[error("{0}")]
    Environment(String),
    /// The interpreter encountered a condition it treats as fatal
    /// resource exhaustion.
    #[error("Out of memory")]
    OutOfMemory,
    /// No such command is bound to the dispatched byte.
    #[error("No such command")]
    NoSuchCommand,
    /// A long command name was not found in the long-command list.
    #[error("Long command not found")]
    LongCommandNotFound,
}

impl TglError {
    /// Maps an error to the process exit code documented for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            TglError::Io(_) | TglError::Persistence(_) => 254,
            TglError::Subprocess(_) | TglError::Environment(_) => 253,
            TglError::OutOfMemory => 255,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, TglError>;
