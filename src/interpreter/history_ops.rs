//! `h`/`H`: the history ring of past top-level invocations.

use crate::consts::HISTORY_REGISTERS;
use crate::error::{Result, TglError};
use crate::interpreter::Interpreter;

/// `h`: optional secondary-arg-0 offset (default 0), added to the running
/// `history_offset`; pushes a duplicate of that history register and
/// advances `history_offset` by one.
pub fn history(interp: &mut Interpreter) -> Result<()> {
    let offset = match interp.secondary_args.get(0) {
        Some(s) => s.parse_int().ok_or_else(|| TglError::Parse("Bad integer".into()))?,
        None => 0,
    };
    interp.secondary_args.reset();

    let slot = offset + interp.history_offset;
    if slot < 0 || slot >= HISTORY_REGISTERS as i64 {
        return Err(TglError::Semantic("History offset out of range".into()));
    }

    let value = interp.registers.peek(slot as u8).clone();
    interp.stack.push(value);
    interp.history_offset += 1;
    Ok(())
}

/// `H`: suppresses the history-ring update that would otherwise happen
/// after this top-level invocation completes.
pub fn suppress_history(interp: &mut Interpreter) -> Result<()> {
    interp.history_enabled = false;
    Ok(())
}
