//! `,<sub>`: the payload subsystem's command surface.

use crate::error::{Result, TglError};
use crate::interpreter::Interpreter;
use crate::payload::Delim;
use crate::value::TglString;
use std::io::Write;

fn count_arg(interp: &mut Interpreter, default: i64) -> Result<i64> {
    match interp.secondary_args.get(0) {
        Some(s) => s.parse_int().ok_or_else(|| TglError::Parse("Bad integer".into())),
        None => Ok(default),
    }
    .map(|n| if n < 0 { default } else { n })
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    std::io::stdout().write_all(bytes).map_err(TglError::Io)
}

fn set_property(interp: &mut Interpreter, id: [u8; 2], value: TglString) -> Result<()> {
    match &id {
        b"ps" => interp.payload.data_start_delim = value,
        b"vd" => interp.payload.value_delim = delim_from_value(&value)?,
        b"ov" => interp.payload.output_v_delim = value,
        b"ok" => interp.payload.output_kv_delim = value,
        b"os" => interp.payload.output_kvs_delim = value,
        b"b(" => interp.payload.balance.paren = value.to_bool(),
        b"b[" => interp.payload.balance.bracket = value.to_bool(),
        b"b{" => interp.payload.balance.brace = value.to_bool(),
        b"b<" => interp.payload.balance.angle = value.to_bool(),
        b"t(" => interp.payload.trim.paren = value.to_bool(),
        b"t[" => interp.payload.trim.bracket = value.to_bool(),
        b"t{" => interp.payload.trim.brace = value.to_bool(),
        b"t<" => interp.payload.trim.angle = value.to_bool(),
        b"ts" => interp.payload.trim.space = value.to_bool(),
        _ => return Err(TglError::Context("Unknown payload property".into())),
    }
    Ok(())
}

fn delim_from_value(value: &TglString) -> Result<Delim> {
    match value.as_bytes() {
        b"ws" => Ok(Delim::Whitespace),
        b"lf" => Ok(Delim::Line),
        _ => Ok(Delim::Bytes(value.clone())),
    }
}

fn get_property(interp: &Interpreter, id: [u8; 2]) -> Result<TglString> {
    Ok(match &id {
        b"ps" => interp.payload.data_start_delim.clone(),
        b"vd" => match &interp.payload.value_delim {
            Delim::Whitespace => TglString::from("ws"),
            Delim::Line => TglString::from("lf"),
            Delim::Bytes(b) => b.clone(),
        },
        b"ov" => interp.payload.output_v_delim.clone(),
        b"ok" => interp.payload.output_kv_delim.clone(),
        b"os" => interp.payload.output_kvs_delim.clone(),
        b"b(" => TglString::from_int(interp.payload.balance.paren as i64),
        b"b[" => TglString::from_int(interp.payload.balance.bracket as i64),
        b"b{" => TglString::from_int(interp.payload.balance.brace as i64),
        b"b<" => TglString::from_int(interp.payload.balance.angle as i64),
        b"t(" => TglString::from_int(interp.payload.trim.paren as i64),
        b"t[" => TglString::from_int(interp.payload.trim.bracket as i64),
        b"t{" => TglString::from_int(interp.payload.trim.brace as i64),
        b"t<" => TglString::from_int(interp.payload.trim.angle as i64),
        b"ts" => TglString::from_int(interp.payload.trim.space as i64),
        _ => return Err(TglError::Context("Unknown payload property".into())),
    })
}

fn read_property_id(interp: &mut Interpreter) -> Result<[u8; 2]> {
    interp.advance_ip(1);
    let code = interp.code().clone();
    let bytes = code.as_bytes();
    let a = *bytes.get(interp.ip()).ok_or_else(|| TglError::Context("Property id expected".into()))?;
    interp.advance_ip(1);
    let b = *bytes.get(interp.ip()).ok_or_else(|| TglError::Context("Property id expected".into()))?;
    Ok([a, b])
}

/// `,<sub>`: dispatches on the byte after `,`.
pub fn payload(interp: &mut Interpreter) -> Result<()> {
    interp.advance_ip(1);
    if !interp.ip_valid() {
        return Err(TglError::Context("Payload subcommand expected".into()));
    }
    let sub = interp.code().as_bytes()[interp.ip()];

    match sub {
        b'!' => interp.payload.load_from_code(),
        b'$' => {
            let len = interp.code_len();
            interp.set_ip(len);
            Ok(())
        }
        b'c' => {
            interp.stack.push(interp.payload.current_item());
            Ok(())
        }
        b',' => {
            let n = count_arg(interp, 1)?;
            interp.payload.advance(n as usize);
            interp.secondary_args.reset();
            Ok(())
        }
        b';' => {
            interp.payload.advance_kv();
            Ok(())
        }
        b'.' => {
            let n = count_arg(interp, 1)?;
            let item = interp.payload.current_item();
            write_stdout(item.as_bytes())?;
            interp.payload.advance(n as usize);
            interp.secondary_args.reset();
            Ok(())
        }
        b':' => {
            let key = interp.payload.current_item();
            interp.payload.advance(1);
            let value = interp.payload.current_item();
            interp.payload.advance(1);
            write_stdout(key.as_bytes())?;
            write_stdout(interp.payload.output_kv_delim.as_bytes())?;
            write_stdout(value.as_bytes())?;
            Ok(())
        }
        b'r' => {
            interp.stack.push(interp.payload.raw().clone());
            Ok(())
        }
        b'R' => {
            let data = interp.stack.pop_checked()?;
            interp.payload.set_payload(data);
            Ok(())
        }
        b'x' => {
            let values = interp.stack.pop_n(2)?;
            let (body, data) = (values[0].clone(), values[1].clone());
            let saved = std::mem::replace(&mut interp.payload, crate::payload::PayloadState::new());
            interp.payload.set_payload(data);
            let result = interp.exec_code(&body);
            interp.payload = saved;
            result
        }
        b'/' => {
            let id = read_property_id(interp)?;
            interp.advance_ip(1);
            let value = interp.stack.pop_checked()?;
            set_property(interp, id, value)
        }
        b'?' => {
            let id = read_property_id(interp)?;
            let value = get_property(interp, id)?;
            interp.stack.push(value);
            Ok(())
        }
        b'h' => {
            interp.stack.push(TglString::from_int(interp.payload.len() as i64));
            Ok(())
        }
        b'i' => {
            let idx = interp.stack.pop_ints(1)?[0];
            let item = interp.payload.item_at_index(idx).ok_or_else(|| TglError::Context("Index out of range".into()))?;
            interp.stack.push(item);
            Ok(())
        }
        b'I' => {
            interp.stack.push(TglString::from_int(interp.payload.item_count() as i64));
            Ok(())
        }
        b'k' => {
            let key = interp.stack.pop_checked()?;
            let value = interp.payload.value_for_key(&key).ok_or_else(|| TglError::Context("Key not found".into()))?;
            interp.stack.push(value);
            Ok(())
        }
        b's' => {
            interp.payload.value_delim = Delim::Whitespace;
            interp.payload.balance = crate::payload::BalanceFlags { paren: true, bracket: true, brace: true, angle: false };
            interp.payload.trim = crate::payload::TrimFlags { paren: true, bracket: true, brace: true, angle: false, space: true };
            Ok(())
        }
        b'l' => {
            interp.payload.value_delim = Delim::Line;
            interp.payload.balance = Default::default();
            interp.payload.trim = crate::payload::TrimFlags { space: true, ..Default::default() };
            Ok(())
        }
        b'0' => {
            interp.payload.value_delim = Delim::Bytes(TglString::from(0u8));
            interp.payload.balance = Default::default();
            interp.payload.trim = Default::default();
            Ok(())
        }
        b'e' => {
            let reg = match interp.secondary_args.get(0) {
                Some(s) if s.len() == 1 => s.as_bytes()[0],
                Some(_) => return Err(TglError::Semantic("Invalid register name".into())),
                None => b'p',
            };
            interp.secondary_args.reset();
            let body = interp.stack.pop_checked()?;
            while interp.payload.offset() < interp.payload.len() {
                let item = interp.payload.current_item();
                interp.registers.write(reg, item);
                interp.exec_code(&body)?;
                interp.payload.advance(1);
            }
            Ok(())
        }
        b'E' => {
            let (kreg, vreg) = match (interp.secondary_args.get(0).cloned(), interp.secondary_args.get(1).cloned()) {
                (Some(k), Some(v)) if k.len() == 1 && v.len() == 1 => (k.as_bytes()[0], v.as_bytes()[0]),
                (None, None) => (b'k', b'v'),
                _ => return Err(TglError::Semantic("Invalid register name".into())),
            };
            interp.secondary_args.reset();
            let body = interp.stack.pop_checked()?;
            while interp.payload.offset() < interp.payload.len() {
                let key = interp.payload.current_item();
                interp.payload.advance(1);
                let value = interp.payload.current_item();
                interp.registers.write(kreg, key);
                interp.registers.write(vreg, value);
                interp.exec_code(&body)?;
                interp.payload.advance(1);
            }
            Ok(())
        }
        b'f' => {
            let path = interp.stack.pop_checked()?;
            let path_str = String::from_utf8_lossy(path.as_bytes()).into_owned();
            let bytes = std::fs::read(&path_str).map_err(TglError::Io)?;
            interp.payload.set_payload(TglString::from_bytes(bytes));
            Ok(())
        }
        b'F' => {
            let pattern = interp.stack.pop_checked()?;
            let pattern_str = String::from_utf8_lossy(pattern.as_bytes()).into_owned();
            let mut out = Vec::new();
            for entry in glob::glob(&pattern_str).map_err(|e| TglError::Context(format!("Invalid glob: {e}")))? {
                let path = entry.map_err(|e| TglError::Io(e.into_error()))?;
                out.extend_from_slice(path.display().to_string().as_bytes());
                out.push(0);
            }
            interp.payload.value_delim = Delim::Bytes(TglString::from(0u8));
            interp.payload.set_payload(TglString::from_bytes(out));
            Ok(())
        }
        _ => Err(TglError::Context("Unknown payload subcommand".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;

    fn interp() -> Interpreter {
        Interpreter::new(InterpreterConfig::from_env())
    }

    #[test]
    fn whitespace_payload_iteration_matches_scenario_five() {
        let mut i = interp();
        i.payload.set_payload(TglString::from("a b c"));
        i.exec_code(&TglString::from("( rp . \" \" . ) ,e")).unwrap();
    }

    #[test]
    fn payload_item_count_and_index() {
        let mut i = interp();
        i.payload.set_payload(TglString::from("a b c"));
        i.exec_code(&TglString::from(",I")).unwrap();
        assert_eq!(i.stack.pop().unwrap().as_bytes(), b"3");
        i.stack.push(TglString::from_int(1));
        i.exec_code(&TglString::from(",i")).unwrap();
        assert_eq!(i.stack.pop().unwrap().as_bytes(), b"b");
    }
}
