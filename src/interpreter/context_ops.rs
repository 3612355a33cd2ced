//! `@` family: context gating.

use crate::error::{Result, TglError};
use crate::interpreter::Interpreter;
use crate::value::TglString;

fn read_glob(interp: &mut Interpreter) -> Result<String> {
    interp.advance_ip(1);
    let code = interp.code().clone();
    let bytes = code.as_bytes();
    let mut start = interp.ip();
    while start < bytes.len() && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    let mut end = start;
    while end < bytes.len() && !bytes[end].is_ascii_whitespace() {
        end += 1;
    }
    if start == end {
        return Err(TglError::Context("Glob expected".into()));
    }
    interp.set_ip(end - 1);
    Ok(String::from_utf8_lossy(&bytes[start..end]).into_owned())
}

/// `@<op>`: dispatches on the byte right after `@`.
pub fn context(interp: &mut Interpreter) -> Result<()> {
    interp.advance_ip(1);
    if !interp.ip_valid() {
        return Err(TglError::Context("Context operator expected".into()));
    }
    let op = interp.code().as_bytes()[interp.ip()];

    match op {
        b'?' => {
            interp.stack.push(TglString::from_int(interp.context.is_active() as i64));
            Ok(())
        }
        b's' => {
            interp.stack.push(TglString::from(interp.context.name()));
            Ok(())
        }
        b'e' => {
            interp.stack.push(TglString::from(interp.context.extension()));
            Ok(())
        }
        b'=' => {
            let glob = read_glob(interp)?;
            interp.context.set_match(&glob)
        }
        b'!' => {
            let glob = read_glob(interp)?;
            interp.context.set_not_match(&glob)
        }
        b'&' => {
            let glob = read_glob(interp)?;
            interp.context.and_match(&glob)
        }
        b'|' => {
            let glob = read_glob(interp)?;
            interp.context.or_match(&glob)
        }
        b'^' => {
            let glob = read_glob(interp)?;
            interp.context.xor_match(&glob)
        }
        b'v' => {
            let glob = read_glob(interp)?;
            interp.context.xor_not_match(&glob)
        }
        _ => Err(TglError::Context("Unknown context operator".into())),
    }
}
