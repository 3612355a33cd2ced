//! `d`/`D` (defun, context-gated defun), `v`/`V` (library-writing variants),
//! and `Q` (long-command dispatch).

use crate::commands::Command;
use crate::error::{Result, TglError};
use crate::interpreter::Interpreter;
use crate::value::TglString;
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

fn install(interp: &mut Interpreter, name: &TglString, body: TglString) -> Result<()> {
    if name.is_empty() {
        return Err(TglError::Semantic("Definition name must not be empty".into()));
    }
    if name.len() == 1 {
        let byte = name.as_bytes()[0];
        if interp.commands.is_bound(byte) {
            return Err(TglError::Semantic("Command already defined".into()));
        }
        interp.commands.bind_user(byte, body);
    } else {
        if interp.long_commands.contains(name) {
            return Err(TglError::Semantic("Long command already defined".into()));
        }
        interp.long_commands.prepend(name.clone(), Command::User(body));
    }
    Ok(())
}

/// `d`: pops (name, body) — `body` pushed first, `name` pushed last, so
/// `name` is the top of stack; installs unconditionally.
pub fn defun(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    let (name, body) = (values[0].clone(), values[1].clone());
    install(interp, &name, body)
}

/// `D`: pops (name, body); installs only when `context_active`, otherwise
/// silently drops both operands (no diagnostic).
pub fn contextual_defun(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    if !interp.context.is_active() {
        return Ok(());
    }
    let (name, body) = (values[0].clone(), values[1].clone());
    install(interp, &name, body)
}

fn build_entry(name: &TglString, body: &TglString, tag: u8) -> TglString {
    TglString::from("(").append(name).append(&TglString::from(")(")).append(body).append_bytes(b")").append_byte(tag)
}

fn append_library_line(interp: &Interpreter, name: &TglString, body: &TglString, tag: u8, prefix: Option<&str>) -> Result<()> {
    let user = std::env::var("USER").unwrap_or_else(|_| "unknown".into());
    let epoch = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);

    let mut line = format!("(Added by {user} on {epoch});\n");
    if let Some(p) = prefix {
        line.push_str(&format!("@= {p}\n"));
    }
    line.push('(');
    line.push_str(&String::from_utf8_lossy(name.as_bytes()));
    line.push_str(")(");
    line.push_str(&String::from_utf8_lossy(body.as_bytes()));
    line.push(')');
    line.push(tag as char);
    line.push('\n');

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&interp.config.library_path)
        .map_err(TglError::Io)?;
    file.write_all(line.as_bytes()).map_err(TglError::Io)
}

/// `v`: pops (name, body); installs and appends a library entry, via a
/// re-invocation of `exec_code` over the constructed `(name)(body)d`
/// entry so the command-table side effect and the later file append apply
/// atomically. On failure of that re-invocation the original `(name,
/// body)` are restored to the stack in their original order, rather than
/// the source's ownership bug of restoring the constructed entry string
/// (SPEC_FULL.md §9).
pub fn defun_library(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    let (name, body) = (values[0].clone(), values[1].clone());
    let entry = build_entry(&name, &body, b'd');
    if let Err(e) = interp.exec_code(&entry) {
        interp.stack.push(body);
        interp.stack.push(name);
        return Err(e);
    }
    append_library_line(interp, &name, &body, b'd', None)
}

/// `V`, `V<s>`, `V<e>`: like `v` but context-gated, optionally prefixing
/// the library entry with `@=<context>` (`s`) or `@=<extension>` (`e`).
pub fn contextual_defun_library(interp: &mut Interpreter) -> Result<()> {
    let mut prefix_kind = None;
    if let Some(next) = interp.code().as_bytes().get(interp.ip() + 1).copied() {
        if next == b's' || next == b'e' {
            interp.advance_ip(1);
            prefix_kind = Some(next);
        }
    }

    let values = interp.stack.pop_n(2)?;
    if !interp.context.is_active() {
        return Ok(());
    }
    let (name, body) = (values[0].clone(), values[1].clone());

    let entry = build_entry(&name, &body, b'D');
    if let Err(e) = interp.exec_code(&entry) {
        interp.stack.push(body);
        interp.stack.push(name);
        return Err(e);
    }

    let prefix = match prefix_kind {
        Some(b's') => Some(interp.context.name().to_string()),
        Some(b'e') => Some(interp.context.extension().to_string()),
        _ => None,
    };
    append_library_line(interp, &name, &body, b'D', prefix.as_deref())
}

/// `Q<name><ws>`: reads a long-command name and dispatches it.
pub fn long_command(interp: &mut Interpreter) -> Result<()> {
    let begin = interp.ip() + 1;
    let code = interp.code().clone();
    let bytes = code.as_bytes();
    let mut end = begin;
    while end < bytes.len() && !bytes[end].is_ascii_whitespace() {
        end += 1;
    }
    if begin >= bytes.len() || begin == end {
        return Err(TglError::Parse("Long command name expected".into()));
    }

    let name = TglString::from_bytes(bytes[begin..end].to_vec());
    let command = interp.long_commands.find(&name).cloned().ok_or(TglError::LongCommandNotFound)?;
    interp.set_ip(end - 1);

    match command {
        Command::Native(f) => f(interp),
        Command::User(body) => interp.exec_code(&body),
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
    fn defun_installs_short_command() {
        let mut i = interp();
        i.exec_code(&TglString::from("( \"hi\" . ) \"g\" d")).unwrap();
        i.exec_code(&TglString::from("g")).unwrap();
    }

    #[test]
    fn defun_rejects_redefinition() {
        let mut i = interp();
        i.exec_code(&TglString::from("( \"hi\" . ) \"g\" d")).unwrap();
        let err = i.exec_code(&TglString::from("( \"bye\" . ) \"g\" d")).unwrap_err();
        assert!(matches!(err, TglError::Semantic(_)));
    }

    #[test]
    fn long_command_dispatches_by_name() {
        let mut i = interp();
        i.exec_code(&TglString::from("( \"hi\" . ) \"greet\" d")).unwrap();
        i.exec_code(&TglString::from("Qgreet ")).unwrap();
    }

    #[test]
    fn contextual_defun_drops_silently_when_inactive() {
        let mut i = interp();
        i.context.set_active(false);
        i.exec_code(&TglString::from("( \"hi\" . ) \"g\" D")).unwrap();
        assert!(!i.commands.is_bound(b'g'));
    }
}
