//! `u<spec>`: appends to the secondary-argument ring consumed by the next
//! command.

use crate::error::{Result, TglError};
use crate::interpreter::Interpreter;
use crate::value::TglString;

pub fn secondary_argument(interp: &mut Interpreter) -> Result<()> {
    interp.advance_ip(1);
    if !interp.ip_valid() {
        return Err(TglError::Parse("Secondary argument specifier expected".into()));
    }
    if interp.secondary_args.is_full() {
        return Err(TglError::Semantic("Too many secondary arguments".into()));
    }

    let c = interp.code().as_bytes()[interp.ip()];
    let value = match c {
        b'%' => Some(interp.stack.pop_checked()?),
        b' ' => None,
        b'.' => Some(TglString::from_int(interp.stack.depth() as i64)),
        b'+' | b'-' | b'0'..=b'9' => {
            super::literals::number(interp)?;
            Some(interp.stack.pop_checked()?)
        }
        other => Some(TglString::from(other)),
    };

    interp.secondary_args.push(value);
    Ok(())
}
