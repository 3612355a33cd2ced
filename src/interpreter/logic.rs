//! Boolean logic operators: `&`, `|`, `^`, `~`. These act on the boolean
//! interpretation of a string (see `TglString::to_bool`), not bitwise.

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::value::TglString;

fn binary_bool(interp: &mut Interpreter, f: impl FnOnce(bool, bool) -> bool) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    let b = values[0].to_bool();
    let a = values[1].to_bool();
    interp.stack.push(TglString::from_int(f(a, b) as i64));
    Ok(())
}

pub fn and(interp: &mut Interpreter) -> Result<()> {
    binary_bool(interp, |a, b| a & b)
}

pub fn or(interp: &mut Interpreter) -> Result<()> {
    binary_bool(interp, |a, b| a | b)
}

pub fn xor(interp: &mut Interpreter) -> Result<()> {
    binary_bool(interp, |a, b| a ^ b)
}

pub fn not(interp: &mut Interpreter) -> Result<()> {
    let v = interp.stack.pop_checked()?;
    interp.stack.push(TglString::from_int(!v.to_bool() as i64));
    Ok(())
}
