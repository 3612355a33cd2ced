//! Subprocess invocation: the common primitive behind `b`, `B`, `j`, `J`,
//! and `t`.

use crate::error::{Result, TglError};
use crate::value::TglString;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

/// Runs `argv[0]` with the remaining elements as arguments, feeding
/// `stdin_bytes` to its stdin and capturing stdout. Returns the captured
/// bytes and exit status; a non-zero exit or abnormal termination (killed
/// by signal) is reported as `TglError::Subprocess`.
pub fn invoke(argv: &[String], stdin_bytes: &[u8]) -> Result<Vec<u8>> {
    tracing::debug!(command = %argv.join(" "), "spawning subprocess");
    let (program, args) = argv.split_first().ok_or_else(|| TglError::Subprocess("Empty command".into()))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| TglError::Subprocess(format!("Failed to spawn {program}: {e}")))?;

    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(stdin_bytes)
        .map_err(|e| TglError::Subprocess(format!("Failed to write to subprocess stdin: {e}")))?;

    let output = child
        .wait_with_output()
        .map_err(|e| TglError::Subprocess(format!("Failed to wait for subprocess: {e}")))?;

    if !output.status.success() {
        return Err(TglError::Subprocess(format!("Subprocess exited with status {}", output.status)));
    }

    Ok(output.stdout)
}

/// Writes `script` to a fresh temp file and runs `interpreter <path>`,
/// feeding `stdin_bytes` to its stdin. Used by `t` (tclsh), which needs its
/// script as a file argument rather than on stdin. The temp file is removed
/// on every exit path via `NamedTempFile`'s drop.
pub fn invoke_with_script_file(interpreter_bin: &str, script: &TglString, stdin_bytes: &[u8]) -> Result<Vec<u8>> {
    let mut file = NamedTempFile::new().map_err(TglError::Io)?;
    file.write_all(script.as_bytes()).map_err(TglError::Io)?;
    let path = file.path().to_path_buf();
    invoke(&[interpreter_bin.to_string(), path.display().to_string()], stdin_bytes)
}

/// Runs `$SHELL -c <script>` with `stdin_bytes` on stdin.
pub fn invoke_shell_script(script: &TglString, stdin_bytes: &[u8]) -> Result<Vec<u8>> {
    let shell = std::env::var("SHELL").map_err(|_| TglError::Environment("SHELL is not set".into()))?;
    invoke(&[shell, "-c".to_string(), String::from_utf8_lossy(script.as_bytes()).into_owned()], stdin_bytes)
}
