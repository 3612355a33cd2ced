//! Arithmetic operators and `?` (random number).

use crate::error::{Result, TglError};
use crate::interpreter::Interpreter;
use crate::value::TglString;
use rand::Rng;

fn binary_int(interp: &mut Interpreter, f: impl FnOnce(i64, i64) -> Result<i64>) -> Result<()> {
    let values = interp.stack.pop_ints(2)?;
    let (b, a) = (values[0], values[1]);
    let result = f(a, b).map_err(|e| {
        interp.stack.push(TglString::from_int(a));
        interp.stack.push(TglString::from_int(b));
        e
    })?;
    interp.stack.push(TglString::from_int(result));
    Ok(())
}

/// Integer overflow wraps, matching the source's unchecked arithmetic
/// (SPEC_FULL.md §9).
pub fn add(interp: &mut Interpreter) -> Result<()> {
    binary_int(interp, |a, b| Ok(a.wrapping_add(b)))
}

pub fn sub(interp: &mut Interpreter) -> Result<()> {
    binary_int(interp, |a, b| Ok(a.wrapping_sub(b)))
}

pub fn mul(interp: &mut Interpreter) -> Result<()> {
    binary_int(interp, |a, b| Ok(a.wrapping_mul(b)))
}

pub fn div(interp: &mut Interpreter) -> Result<()> {
    binary_int(interp, |a, b| {
        if b == 0 {
            Err(TglError::Semantic("Division by zero".into()))
        } else {
            Ok(a.wrapping_div(b))
        }
    })
}

pub fn modulo(interp: &mut Interpreter) -> Result<()> {
    binary_int(interp, |a, b| {
        if b == 0 {
            Err(TglError::Semantic("Division by zero".into()))
        } else {
            Ok(a.wrapping_rem(b))
        }
    })
}

pub fn less(interp: &mut Interpreter) -> Result<()> {
    binary_int(interp, |a, b| Ok((a < b) as i64))
}

pub fn greater(interp: &mut Interpreter) -> Result<()> {
    binary_int(interp, |a, b| Ok((a > b) as i64))
}

/// `?`: pops a bound `n`, pushes a uniform random integer in `[0, n)`.
pub fn rand(interp: &mut Interpreter) -> Result<()> {
    let bound = interp.stack.pop_ints(1)?[0];
    if bound <= 0 {
        interp.stack.push(TglString::from_int(bound));
        return Err(TglError::Semantic("Invalid random bound".into()));
    }
    let value = rand::thread_rng().gen_range(0..bound);
    interp.stack.push(TglString::from_int(value));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;

    #[test]
    fn addition_matches_scenario_one() {
        let mut i = Interpreter::new(InterpreterConfig::from_env());
        i.exec_code(&TglString::from("3 4 +")).unwrap();
        assert_eq!(i.stack.pop().unwrap().as_bytes(), b"7");
    }

    #[test]
    fn division_by_zero_fails() {
        let mut i = Interpreter::new(InterpreterConfig::from_env());
        let err = i.exec_code(&TglString::from("10 0 /")).unwrap_err();
        assert!(matches!(err, TglError::Semantic(ref m) if m.contains("Division by zero")));
    }

    #[test]
    fn overflow_wraps() {
        let mut i = Interpreter::new(InterpreterConfig::from_env());
        i.stack.push(TglString::from_int(i64::MAX));
        i.stack.push(TglString::from_int(1));
        add(&mut i).unwrap();
        assert_eq!(i.stack.pop().unwrap().parse_int().unwrap(), i64::MIN);
    }
}
