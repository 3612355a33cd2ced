//! The command table: byte → native handler or user-defined body, plus the
//! long-command list keyed by name.

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::value::TglString;

/// A native handler: given the interpreter, consume bytes at the current
/// IP as needed and mutate state, returning success or failure.
pub type NativeFn = fn(&mut Interpreter) -> Result<()>;

/// Either a built-in function pointer or a user-defined code body,
/// mirroring the source's tagged union.
#[derive(Clone)]
pub enum Command {
    Native(NativeFn),
    User(TglString),
}

/// Short (single-byte) command table.
pub struct CommandTable {
    slots: Box<[Option<Command>; 256]>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTable {
    pub fn new() -> Self {
        Self { slots: Box::new(std::array::from_fn(|_| None)) }
    }

    pub fn get(&self, byte: u8) -> Option<&Command> {
        self.slots[byte as usize].as_ref()
    }

    pub fn is_bound(&self, byte: u8) -> bool {
        self.slots[byte as usize].is_some()
    }

    pub fn bind_native(&mut self, byte: u8, f: NativeFn) {
        self.slots[byte as usize] = Some(Command::Native(f));
    }

    pub fn bind_user(&mut self, byte: u8, body: TglString) {
        self.slots[byte as usize] = Some(Command::User(body));
    }
}

/// Sequence of `(name, command)` pairs, scanned linearly front-to-back;
/// first match wins. A linked/linear scan is preferred over a map, matching
/// the source's own assumption that long commands are rare.
#[derive(Default)]
pub struct LongCommandList {
    entries: Vec<(TglString, Command)>,
}

impl LongCommandList {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn find(&self, name: &TglString) -> Option<&Command> {
        self.entries.iter().find(|(n, _)| n.as_bytes() == name.as_bytes()).map(|(_, c)| c)
    }

    pub fn contains(&self, name: &TglString) -> bool {
        self.entries.iter().any(|(n, _)| n.as_bytes() == name.as_bytes())
    }

    /// Prepends the entry, so later definitions shadow earlier ones with
    /// the same name were they ever allowed to coexist (they aren't:
    /// callers must check `contains` first).
    pub fn prepend(&mut self, name: TglString, command: Command) {
        self.entries.insert(0, (name, command));
    }
}
