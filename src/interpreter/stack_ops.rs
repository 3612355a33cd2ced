//! `:` (dup), `;` (drop), `x` (swap), all parameterised by secondary
//! arguments.

use crate::error::{Result, TglError};
use crate::interpreter::Interpreter;

fn count_arg(interp: &mut Interpreter, default: i64) -> Result<i64> {
    match interp.secondary_args.get(0) {
        Some(s) => {
            let n = s.parse_int().ok_or_else(|| TglError::Parse("Bad integer".into()))?;
            Ok(n)
        }
        None => Ok(default),
    }
}

/// `:`: leaves the original and produces `n` duplicates (default 1).
pub fn dupe(interp: &mut Interpreter) -> Result<()> {
    let n = count_arg(interp, 1)?;
    if n < 0 {
        return Err(TglError::Semantic("Invalid count".into()));
    }
    let top = interp.stack.pop_checked()?;
    interp.stack.push(top.clone());
    for _ in 0..n {
        interp.stack.push(top.clone());
    }
    interp.secondary_args.reset();
    Ok(())
}

/// `;`: atomically checks depth ≥ n, then drops n values (default 1).
pub fn drop_n(interp: &mut Interpreter) -> Result<()> {
    let n = count_arg(interp, 1)?;
    if n < 0 {
        return Err(TglError::Semantic("Invalid count".into()));
    }
    interp.stack.pop_n(n as usize)?;
    interp.secondary_args.reset();
    Ok(())
}

/// `x`: with offset `k` (default 1): `k > 0` moves the top element down `k`
/// positions; `k < 0` moves the element at depth `|k|` to the top; `k == 0`
/// is a no-op. Insufficient depth fails atomically. Unlike the source, the
/// secondary-arg ring is reset unconditionally on success, including the
/// `k == 0` path (SPEC_FULL.md §9).
pub fn swap(interp: &mut Interpreter) -> Result<()> {
    let k = count_arg(interp, 1)?;

    if k == 0 {
        interp.secondary_args.reset();
        return Ok(());
    }

    let depth = k.unsigned_abs() as usize;
    let mut values = interp.stack.pop_n(depth + 1)?; // values[0] = top .. values[depth] = deepest
    if k > 0 {
        let top = values.remove(0);
        values.insert(depth, top);
    } else {
        let bottom = values.remove(depth);
        values.insert(0, bottom);
    }
    for v in values.into_iter().rev() {
        interp.stack.push(v);
    }
    interp.secondary_args.reset();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;
    use crate::interpreter::Interpreter;
    use crate::value::TglString;

    fn interp() -> Interpreter {
        Interpreter::new(InterpreterConfig::from_env())
    }

    #[test]
    fn swap_twice_is_identity() {
        let mut i = interp();
        i.exec_code(&TglString::from("\"A\" \"B\" x x")).unwrap();
        let b = i.stack.pop().unwrap();
        let a = i.stack.pop().unwrap();
        assert_eq!((a.as_bytes(), b.as_bytes()), (b"A".as_ref(), b"B".as_ref()));
    }

    #[test]
    fn dup_then_drop_is_identity() {
        let mut i = interp();
        i.exec_code(&TglString::from("\"v\" : ;")).unwrap();
        assert_eq!(i.stack.pop().unwrap().as_bytes(), b"v");
        assert_eq!(i.stack.depth(), 0);
    }
}
