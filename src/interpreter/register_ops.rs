//! Register read/write, p-stack push/pop, and LRU auto-write.
//!
//! `r` and `R` read the register name directly from the code byte
//! following the dispatch byte (not from the stack).

use crate::error::{Result, TglError};
use crate::interpreter::Interpreter;
use crate::value::TglString;
use std::io::Write;

fn consume_register_name(interp: &mut Interpreter) -> Result<u8> {
    interp.advance_ip(1);
    if !interp.ip_valid() {
        return Err(TglError::Parse("Register name expected".into()));
    }
    Ok(interp.code().as_bytes()[interp.ip()])
}

/// `r<reg>`: clones the register's value onto the stack, touches it.
pub fn read(interp: &mut Interpreter) -> Result<()> {
    let reg = consume_register_name(interp)?;
    let value = interp.registers.read(reg);
    interp.stack.push(value);
    Ok(())
}

/// `R<reg>`: pops a value and installs it in the register, touches it.
pub fn write(interp: &mut Interpreter) -> Result<()> {
    let reg = consume_register_name(interp)?;
    let value = interp.stack.pop_checked()?;
    interp.registers.write(reg, value);
    Ok(())
}

/// `p`: pushes a full snapshot of all 256 registers onto the p-stack.
pub fn stash(interp: &mut Interpreter) -> Result<()> {
    let snapshot = interp.registers.snapshot();
    interp.pstack.push(snapshot);
    Ok(())
}

/// `P`: pops a snapshot and replaces the live register file with it.
pub fn retrieve(interp: &mut Interpreter) -> Result<()> {
    let snapshot = interp.pstack.pop()?;
    interp.registers.restore(snapshot);
    Ok(())
}

/// `z`: pops a register-name byte string `s` and pushes the code string
/// `"p" ++ s ++ "P"` (stash, read, retrieve) for the caller to execute,
/// matching the source's convenience helper.
pub fn stash_retrieve(interp: &mut Interpreter) -> Result<()> {
    let s = interp.stack.pop_checked()?;
    let code = TglString::from("p").append(&s).append(&TglString::from("P"));
    interp.stack.push(code);
    Ok(())
}

/// `a`: pops a value, writes it into the least-recently-used register
/// among `[A-Za-z0-9]`, then prints a report line. A failure to print the
/// report is swallowed, matching the source.
pub fn auto_write(interp: &mut Interpreter) -> Result<()> {
    let value = interp.stack.pop_checked()?;
    let reg = interp.registers.least_recently_used_alnum();
    interp.registers.write(reg, value.clone());

    let mut report = Vec::new();
    report.push(b'`');
    report.extend_from_slice(value.as_bytes());
    report.extend_from_slice(b": ");
    report.push(reg);
    report.push(b'\n');
    let _ = std::io::stdout().write_all(&report);
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
    fn read_write_round_trip() {
        let mut i = interp();
        i.exec_code(&TglString::from("\"hi\" Rq rq")).unwrap();
        assert_eq!(i.stack.pop().unwrap().as_bytes(), b"hi");
    }

    #[test]
    fn pstack_restores_all_registers() {
        let mut i = interp();
        i.exec_code(&TglString::from("\"v\" Ra p \"other\" Ra P")).unwrap();
        assert_eq!(i.registers.peek(b'a').as_bytes(), b"v");
    }
}
