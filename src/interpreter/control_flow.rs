//! if/while/counted-for/each.

use crate::error::{Result, TglError};
use crate::interpreter::Interpreter;
use crate::value::TglString;

/// `i`: pops (otherwise, then, condition); runs `then` if the condition is
/// true, else `otherwise`.
pub fn if_cmd(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(3)?;
    let (otherwise, then, condition) = (&values[0], &values[1], &values[2]);
    if condition.to_bool() {
        interp.exec_code(&then.clone())
    } else {
        interp.exec_code(&otherwise.clone())
    }
}

/// `I`: pops (then, condition); runs `then` if true, else a no-op.
pub fn if_short(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    let (then, condition) = (values[0].clone(), &values[1]);
    if condition.to_bool() {
        interp.exec_code(&then)
    } else {
        Ok(())
    }
}

/// `w`: pops (body, condition); while condition is true, run body.
pub fn while_cmd(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    let (body, condition) = (values[0].clone(), values[1].clone());
    loop {
        interp.exec_code(&condition)?;
        let cont = interp.stack.pop_checked()?;
        if !cont.to_bool() {
            break;
        }
        interp.exec_code(&body)?;
    }
    Ok(())
}

/// `W`: pops body; do-while over body's own trailing boolean.
pub fn while_short(interp: &mut Interpreter) -> Result<()> {
    let body = interp.stack.pop_checked()?;
    loop {
        interp.exec_code(&body)?;
        let cont = interp.stack.pop_checked()?;
        if !cont.to_bool() {
            break;
        }
    }
    Ok(())
}

fn run_counted_for(interp: &mut Interpreter, body: TglString, from: i64, to: i64, reg: u8, inc: i64) -> Result<()> {
    if inc == 0 {
        return Err(TglError::Semantic("Invalid increment".into()));
    }
    let mut i = from;
    while (inc > 0 && i < to) || (inc < 0 && i > to) {
        interp.registers.write(reg, TglString::from_int(i));
        interp.exec_code(&body)?;
        // Re-read the counter: the body may have rewritten it.
        i = interp
            .registers
            .peek(reg)
            .parse_int()
            .ok_or_else(|| TglError::Parse("Loop counter is no longer an integer".into()))?;
        i += inc;
    }
    interp.registers.touch(reg);
    Ok(())
}

/// `f`: the long form (4 popped operands: body, to, from, reg) when no
/// secondary arguments are pending; otherwise the short form (2 popped
/// operands: body, to), with `from`/`reg`/`inc` taken from secondary args
/// (defaults 0, `i`, `sign(to - from)`). See SPEC_FULL.md §4.5 / §9 for the
/// reconciliation of the two historical invocation styles.
pub fn for_cmd(interp: &mut Interpreter) -> Result<()> {
    if interp.secondary_args.is_empty() {
        let values = interp.stack.pop_n(4)?;
        let (body, to_str, from_str, reg_str) = (&values[0], &values[1], &values[2], &values[3]);
        if reg_str.len() != 1 {
            let restore = values.clone();
            for v in restore.into_iter().rev() {
                interp.stack.push(v);
            }
            return Err(TglError::Semantic("Invalid register name".into()));
        }
        let to = to_str.parse_int().ok_or_else(|| TglError::Parse("Bad integer".into()))?;
        let from = from_str.parse_int().ok_or_else(|| TglError::Parse("Bad integer".into()))?;
        let reg = reg_str.as_bytes()[0];
        let inc = if to >= from { 1 } else { -1 };
        run_counted_for(interp, body.clone(), from, to, reg, inc)
    } else {
        let from = match interp.secondary_args.get(0) {
            Some(s) => s.parse_int().ok_or_else(|| TglError::Parse("Bad integer".into()))?,
            None => 0,
        };
        let reg = match interp.secondary_args.get(1) {
            Some(s) if s.len() == 1 => s.as_bytes()[0],
            Some(_) => return Err(TglError::Semantic("Invalid register name".into())),
            None => b'i',
        };
        let explicit_inc = match interp.secondary_args.get(2) {
            Some(s) => Some(s.parse_int().ok_or_else(|| TglError::Parse("Bad integer".into()))?),
            None => None,
        };
        interp.secondary_args.reset();

        let values = interp.stack.pop_n(2)?;
        let (body, to_str) = (values[0].clone(), &values[1]);
        let to = to_str.parse_int().ok_or_else(|| TglError::Parse("Bad integer".into()))?;
        let inc = explicit_inc.unwrap_or(if to >= from { 1 } else { -1 });
        run_counted_for(interp, body, from, to, reg, inc)
    }
}

/// `F`: always defaults register to `i`, `from=0`; pops (body, to) only;
/// never consults secondary arguments.
pub fn for_short(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    let (body, to_str) = (values[0].clone(), &values[1]);
    let to = to_str.parse_int().ok_or_else(|| TglError::Parse("Bad integer".into()))?;
    let inc = if to >= 0 { 1 } else { -1 };
    run_counted_for(interp, body, 0, to, b'i', inc)
}

/// `e`: pops (body, s); writes each byte of `s` into register (default
/// `c`, overridable via secondary-arg 0) and runs body.
pub fn each(interp: &mut Interpreter) -> Result<()> {
    let reg = match interp.secondary_args.get(0) {
        Some(s) if s.len() == 1 => s.as_bytes()[0],
        Some(_) => return Err(TglError::Semantic("Invalid register name".into())),
        None => b'c',
    };
    interp.secondary_args.reset();

    let values = interp.stack.pop_n(2)?;
    let (body, s) = (values[0].clone(), values[1].clone());
    for byte in s.as_bytes().to_vec() {
        interp.registers.write(reg, TglString::from(byte));
        interp.exec_code(&body)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;

    fn interp() -> Interpreter {
        Interpreter::new(InterpreterConfig::from_env())
    }

    #[test]
    fn if_then_branch_matches_scenario_four() {
        let mut i = interp();
        i.exec_code(&TglString::from("1 ( \"true\" . ) ( \"false\" . ) i")).unwrap();
    }

    #[test]
    fn counted_for_long_form_matches_scenario_three() {
        let mut i = interp();
        i.exec_code(&TglString::from("\"n\" 0 5 ( rs \"x\" c Rs ) f rs")).unwrap();
        assert_eq!(i.stack.pop().unwrap().as_bytes(), b"xxxxx");
    }

    #[test]
    fn counted_for_short_form_matches_scenario_three() {
        let mut i = interp();
        i.exec_code(&TglString::from("5 ( rs \"x\" c Rs ) F rs")).unwrap();
        assert_eq!(i.stack.pop().unwrap().as_bytes(), b"xxxxx");
    }

    #[test]
    fn each_iterates_bytes() {
        let mut i = interp();
        i.exec_code(&TglString::from("\"ab\" ( y ) e rc")).unwrap();
        assert_eq!(i.stack.pop().unwrap().as_bytes(), b"b");
    }
}
