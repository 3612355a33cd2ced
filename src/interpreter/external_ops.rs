//! `b`/`B` (shell invocation) and `j`/`J`/`t` (sed/perl/tclsh filters).

use crate::error::Result;
use crate::external;
use crate::interpreter::Interpreter;
use crate::value::TglString;

/// `b`: pops (script, stdin); runs `script` through `$SHELL -c`, feeding it
/// `stdin`, and pushes the captured stdout.
pub fn shell_script(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    let (script, stdin) = (&values[0], &values[1]);
    let output = external::invoke_shell_script(script, stdin.as_bytes())?;
    interp.stack.push(TglString::from_bytes(output));
    Ok(())
}

/// `B`: pops (command, stdin); splits `command` on whitespace into an argv
/// and runs it directly (no shell interpretation), feeding it `stdin`.
pub fn shell_command(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    let (command, stdin) = (&values[0], &values[1]);
    let argv: Vec<String> = String::from_utf8_lossy(command.as_bytes()).split_whitespace().map(str::to_string).collect();
    let output = external::invoke(&argv, stdin.as_bytes())?;
    interp.stack.push(TglString::from_bytes(output));
    Ok(())
}

/// `j`: pops (script, stdin); runs `script` as a `sed` expression over
/// `stdin`.
pub fn sed(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    let (script, stdin) = (&values[0], &values[1]);
    let argv = vec![interp.config.sed_bin.clone(), String::from_utf8_lossy(script.as_bytes()).into_owned()];
    let output = external::invoke(&argv, stdin.as_bytes())?;
    interp.stack.push(TglString::from_bytes(output));
    Ok(())
}

/// `J`: pops (script, stdin); runs `script` as a `perl -e` expression over
/// `stdin`.
pub fn perl(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    let (script, stdin) = (&values[0], &values[1]);
    let argv = vec![interp.config.perl_bin.clone(), "-e".to_string(), String::from_utf8_lossy(script.as_bytes()).into_owned()];
    let output = external::invoke(&argv, stdin.as_bytes())?;
    interp.stack.push(TglString::from_bytes(output));
    Ok(())
}

/// `t`: pops (script, stdin); runs `script` as a Tcl script file via
/// `tclsh`, feeding it `stdin`.
pub fn tcl(interp: &mut Interpreter) -> Result<()> {
    let values = interp.stack.pop_n(2)?;
    let (script, stdin) = (&values[0], &values[1]);
    let output = external::invoke_with_script_file(&interp.config.tcl_bin, script, stdin.as_bytes())?;
    interp.stack.push(TglString::from_bytes(output));
    Ok(())
}
