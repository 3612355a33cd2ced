//! Register-persistence binary format and the history post-pass.
//!
//! Layout: 8-byte magic (`"TglV"` + the record size as a little `u32`,
//! native order, + 3 zero bytes of padding), a probe record
//! `(access_time=1, length=2)` used to detect struct-layout mismatches
//! across builds, then 256 records of `(access_time: u64, length: u32,
//! <length> bytes)`.

use crate::error::{Result, TglError};
use crate::registers::RegisterFile;
use crate::value::TglString;
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use std::path::Path;

const RECORD_HEADER_LEN: u32 = 12; // access_time: u64 + length: u32

fn write_record<W: Write>(w: &mut W, access_time: u64, bytes: &[u8]) -> Result<()> {
    w.write_u64::<NativeEndian>(access_time)?;
    w.write_u32::<NativeEndian>(bytes.len() as u32)?;
    w.write_all(bytes)?;
    Ok(())
}

fn read_record<R: Read>(r: &mut R) -> Result<(u64, Vec<u8>)> {
    let access_time = r.read_u64::<NativeEndian>()?;
    let length = r.read_u32::<NativeEndian>()?;
    let mut bytes = vec![0u8; length as usize];
    r.read_exact(&mut bytes)?;
    Ok((access_time, bytes))
}

/// Loads registers from `path`. An absent file is not an error: the
/// register file is left untouched (all registers stay at their initial
/// empty-string state).
pub fn load(path: &Path, registers: &mut RegisterFile) -> Result<()> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(TglError::Io(e)),
    };
    let mut cursor = std::io::Cursor::new(bytes);

    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic).map_err(|_| TglError::Persistence("Truncated register file".into()))?;
    let record_size = cursor.read_u32::<NativeEndian>().map_err(|_| TglError::Persistence("Truncated register file".into()))?;
    if &magic != crate::consts::PERSISTENCE_MAGIC || record_size != RECORD_HEADER_LEN {
        return Err(TglError::Persistence("Register file magic mismatch".into()));
    }

    let (probe_time, probe_bytes) = read_record(&mut cursor)?;
    if probe_time != 1 || probe_bytes.len() != 2 {
        return Err(TglError::Persistence("Register file layout probe mismatch".into()));
    }

    for i in 0..256 {
        let (access_time, bytes) = read_record(&mut cursor)?;
        registers.set_raw(i, TglString::from_bytes(bytes), access_time);
    }

    Ok(())
}

/// Truncates and rewrites `path` with the current register file contents.
pub fn save(path: &Path, registers: &RegisterFile) -> Result<()> {
    let mut out = Vec::new();
    out.extend_from_slice(crate::consts::PERSISTENCE_MAGIC);
    out.write_u32::<NativeEndian>(RECORD_HEADER_LEN)?;

    write_record(&mut out, 1, &[0u8; 2])?;

    for (value, access_time) in registers.iter() {
        write_record(&mut out, access_time, value.as_bytes())?;
    }

    std::fs::write(path, out).map_err(TglError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn round_trips_register_values() {
        let path = NamedTempFile::new().unwrap().into_temp_path();
        let mut regs = RegisterFile::new();
        regs.write(b'a', TglString::from("hi"));
        save(&path, &regs).unwrap();

        let mut loaded = RegisterFile::new();
        load(&path, &mut loaded).unwrap();
        assert_eq!(loaded.peek(b'a').as_bytes(), b"hi");
        assert!(loaded.access_time(b'a') >= regs.access_time(b'a'));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let mut regs = RegisterFile::new();
        load(Path::new("/nonexistent/path/for/tgl/tests"), &mut regs).unwrap();
        assert_eq!(regs.peek(b'a').as_bytes(), b"");
    }
}
