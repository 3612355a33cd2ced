//! Constants shared across the interpreter.

/// Size of the secondary-argument ring (`u<spec>`).
pub const NUM_SECONDARY_ARGS: usize = 4;

/// Registers `0x00..=0x1F` are reserved as the history ring.
pub const HISTORY_REGISTERS: usize = 0x20;

/// Number of bytes of code context shown in a diagnostic, centred (with a
/// left bias) on the instruction pointer.
pub const DIAGNOSTIC_CONTEXT_LEN: usize = 32;

/// Magic bytes at the start of a register-persistence file: `"TglV"` followed
/// by the size of a persisted register record, then three zero bytes.
pub const PERSISTENCE_MAGIC: &[u8; 4] = b"TglV";
