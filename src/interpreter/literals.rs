//! Integer literals, code blocks, escape sequences, and interpolated
//! strings.

use crate::error::{Result, TglError};
use crate::interpreter::Interpreter;
use crate::value::TglString;

fn is_digit_for_radix(b: u8, radix: u32) -> bool {
    (b as char).is_digit(radix)
}

/// `#`, `0`-`9`: an integer literal. `#` is a bare marker that is skipped;
/// otherwise the dispatch byte is the first digit. IP is left on the last
/// consumed digit.
pub fn number(interp: &mut Interpreter) -> Result<()> {
    let start_byte = interp.curr_byte().expect("dispatched on a valid byte");

    if start_byte == b'#' {
        interp.advance_ip(1);
        if !interp.ip_valid() {
            return Err(TglError::Parse("Integer literal expected".into()));
        }
    }
    let begin = interp.ip();

    let code = interp.code().clone();
    let bytes = code.as_bytes();
    let mut i = interp.ip();

    if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let radix = if bytes.len() > i + 1 && bytes[i] == b'0' && matches!(bytes[i + 1], b'x' | b'X') {
        i += 2;
        16
    } else if bytes.len() > i + 1 && bytes[i] == b'0' && matches!(bytes[i + 1], b'b' | b'B') {
        i += 2;
        2
    } else if bytes.len() > i + 1 && bytes[i] == b'0' && matches!(bytes[i + 1], b'o' | b'O') {
        i += 2;
        8
    } else {
        10
    };

    let digits_start = i;
    while i < bytes.len() && is_digit_for_radix(bytes[i], radix) {
        i += 1;
    }
    if i == digits_start {
        return Err(TglError::Parse("Malformed integer literal".into()));
    }

    let literal_end = i;
    let literal = TglString::from_bytes(bytes[begin..literal_end].to_vec());
    interp.stack.push(literal);
    interp.set_ip(literal_end - 1);
    Ok(())
}

/// `( … )`: a parenthesis-balanced code block. Pushes the contents
/// (excluding the outer parens).
pub fn code_block(interp: &mut Interpreter) -> Result<()> {
    let code = interp.code().clone();
    let bytes = code.as_bytes();
    let start = interp.ip() + 1;
    let mut depth = 1usize;
    let mut i = start;
    while i < bytes.len() && depth > 0 {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            break;
        }
        i += 1;
    }
    if depth != 0 {
        return Err(TglError::Parse("Unbalanced parenthesis".into()));
    }
    interp.stack.push(TglString::from_bytes(bytes[start..i].to_vec()));
    interp.set_ip(i);
    Ok(())
}

/// The result of an escape sequence: either a literal byte was pushed, or
/// the escape was one of the bracket characters that are not interpreted
/// when standing alone (a "no-push" outcome used by `"…"`).
pub enum EscapeOutcome {
    Pushed,
    NoPush(u8),
}

/// `\<c>`: standard C-style escapes, `\x<HH>`, and self-escapes. Brackets
/// are a no-push outcome so `"…"` can treat them literally.
pub fn escape_inner(interp: &mut Interpreter) -> Result<EscapeOutcome> {
    interp.advance_ip(1);
    if !interp.ip_valid() {
        return Err(TglError::Parse("Escape character expected".into()));
    }
    let code = interp.code().clone();
    let bytes = code.as_bytes();
    let c = bytes[interp.ip()];

    let mapped: Option<u8> = match c {
        b'a' => Some(0x07),
        b'b' => Some(0x08),
        b'e' => Some(0x1B),
        b'f' => Some(0x0C),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        b'v' => Some(0x0B),
        b'"' | b'\'' | b'$' | b'%' | b'\\' | b'`' => Some(c),
        _ => None,
    };

    if let Some(byte) = mapped {
        interp.stack.push(TglString::from(byte));
        return Ok(EscapeOutcome::Pushed);
    }

    if c == b'x' {
        let hi = bytes.get(interp.ip() + 1).copied();
        let lo = bytes.get(interp.ip() + 2).copied();
        let (hi, lo) = match (hi, lo) {
            (Some(hi), Some(lo)) if (hi as char).is_ascii_hexdigit() && (lo as char).is_ascii_hexdigit() => (hi, lo),
            _ => return Err(TglError::Parse("Invalid \\x escape".into())),
        };
        let hex = format!("{}{}", hi as char, lo as char);
        let byte = u8::from_str_radix(&hex, 16).map_err(|_| TglError::Parse("Invalid \\x escape".into()))?;
        interp.advance_ip(2);
        interp.stack.push(TglString::from(byte));
        return Ok(EscapeOutcome::Pushed);
    }

    if matches!(c, b'(' | b')' | b'[' | b']' | b'{' | b'}' | b'<' | b'>') {
        return Ok(EscapeOutcome::NoPush(c));
    }

    Err(TglError::Parse("Unrecognised escape character".into()))
}

pub fn escape(interp: &mut Interpreter) -> Result<()> {
    match escape_inner(interp)? {
        EscapeOutcome::Pushed | EscapeOutcome::NoPush(_) => Ok(()),
    }
}

/// `"…"`: an interpolated string. Accumulates bytes until an unescaped
/// `"`, expanding `$R` (register), `%` (stack pop), `` ` `` (initial
/// whitespace), and `\` escapes.
pub fn string(interp: &mut Interpreter) -> Result<()> {
    let mut out = Vec::new();
    interp.advance_ip(1);

    loop {
        if !interp.ip_valid() {
            return Err(TglError::Parse("Unterminated string literal".into()));
        }
        let code = interp.code().clone();
        let bytes = code.as_bytes();
        let c = bytes[interp.ip()];

        match c {
            b'"' => break,
            b'$' => {
                interp.advance_ip(1);
                if !interp.ip_valid() {
                    return Err(TglError::Parse("Register name expected after $".into()));
                }
                let reg = interp.code().as_bytes()[interp.ip()];
                out.extend_from_slice(interp.registers.read(reg).as_bytes());
            }
            b'%' => {
                let v = interp.stack.pop_checked()?;
                out.extend_from_slice(v.as_bytes());
            }
            b'`' => {
                let ws = interp.initial_whitespace.clone().ok_or_else(|| TglError::Parse("No initial whitespace captured".into()))?;
                out.extend_from_slice(ws.as_bytes());
            }
            b'\\' => match escape_inner(interp)? {
                EscapeOutcome::NoPush(byte) => out.push(byte),
                EscapeOutcome::Pushed => {
                    let popped = interp.stack.pop_checked()?;
                    out.extend_from_slice(popped.as_bytes());
                }
            },
            other => out.push(other),
        }
        interp.advance_ip(1);
    }

    interp.stack.push(TglString::from_bytes(out));
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
    fn number_literal_pushes_digits() {
        let mut i = interp();
        i.exec_code(&TglString::from("42")).unwrap();
        assert_eq!(i.stack.pop().unwrap().as_bytes(), b"42");
    }

    #[test]
    fn unbalanced_parens_fail() {
        let mut i = interp();
        let err = i.exec_code(&TglString::from("( (")).unwrap_err();
        assert!(matches!(err, TglError::Parse(ref m) if m.contains("Unbalanced parenthesis")));
    }

    #[test]
    fn string_interpolates_register_and_stack() {
        let mut i = interp();
        i.registers.write(b'x', TglString::from("5"));
        i.stack.push(TglString::from("!"));
        i.exec_code(&TglString::from("\"v=$x%\"")).unwrap();
        assert_eq!(i.stack.pop().unwrap().as_bytes(), b"v=5!");
    }
}
