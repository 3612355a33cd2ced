//! The 256-slot register file, its access-time tracking, and the p-stack of
//! full register snapshots.

use crate::consts::HISTORY_REGISTERS;
use crate::error::{Result, TglError};
use crate::value::TglString;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed array of 256 owned byte-strings, each with a monotonic access
/// timestamp used for LRU selection by `a` (auto-write).
pub struct RegisterFile {
    values: Box<[TglString; 256]>,
    access: Box<[u64; 256]>,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            values: Box::new(std::array::from_fn(|_| TglString::empty())),
            access: Box::new([0; 256]),
        }
    }

    pub fn read(&mut self, reg: u8) -> TglString {
        self.touch(reg);
        self.values[reg as usize].clone()
    }

    pub fn write(&mut self, reg: u8, value: TglString) {
        self.values[reg as usize] = value;
        self.touch(reg);
    }

    pub fn peek(&self, reg: u8) -> &TglString {
        &self.values[reg as usize]
    }

    pub fn touch(&mut self, reg: u8) {
        self.access[reg as usize] = now();
    }

    pub fn access_time(&self, reg: u8) -> u64 {
        self.access[reg as usize]
    }

    /// Selects the least-recently-accessed register among
    /// `[A-Za-z0-9]`, ties broken by search order A,…,Z, a,…,z, 0,…,9.
    pub fn least_recently_used_alnum(&self) -> u8 {
        let candidates = (b'A'..=b'Z').chain(b'a'..=b'z').chain(b'0'..=b'9');
        let mut best = b'A';
        for r in candidates {
            if self.access[r as usize] < self.access[best as usize] {
                best = r;
            }
        }
        best
    }

    /// A full duplicate of all 256 registers, used by the p-stack.
    pub fn snapshot(&self) -> Box<[TglString; 256]> {
        Box::new(std::array::from_fn(|i| self.values[i].clone()))
    }

    pub fn restore(&mut self, values: Box<[TglString; 256]>) {
        self.values = values;
    }

    /// Shifts history registers `0x00..0x1E` up by one (`0x1E` moving into
    /// `0x1F`, the oldest entry falling off the end) and installs `entry`
    /// at `0x00`. Access times shift in parallel with the values.
    pub fn push_history(&mut self, entry: TglString) {
        for i in (1..HISTORY_REGISTERS).rev() {
            self.values[i] = self.values[i - 1].clone();
            self.access[i] = self.access[i - 1];
        }
        self.values[0] = entry;
        self.access[0] = now();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TglString, u64)> {
        self.values.iter().zip(self.access.iter().copied())
    }

    pub fn set_raw(&mut self, index: usize, value: TglString, access: u64) {
        self.values[index] = value;
        self.access[index] = access;
    }
}

fn now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// LIFO of full register snapshots, manipulated by `p` (push) and `P` (pop).
#[derive(Default)]
pub struct PStack {
    frames: Vec<Box<[TglString; 256]>>,
}

impl PStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, snapshot: Box<[TglString; 256]>) {
        self.frames.push(snapshot);
    }

    pub fn pop(&mut self) -> Result<Box<[TglString; 256]>> {
        self.frames.pop().ok_or(TglError::PStackUnderflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pstack_roundtrips_all_registers() {
        let mut regs = RegisterFile::new();
        regs.write(b'a', TglString::from("hello"));
        let mut pstack = PStack::new();
        pstack.push(regs.snapshot());
        regs.write(b'a', TglString::from("clobbered"));
        let restored = pstack.pop().unwrap();
        regs.restore(restored);
        assert_eq!(regs.peek(b'a').as_bytes(), b"hello");
    }

    #[test]
    fn lru_breaks_ties_in_search_order() {
        let regs = RegisterFile::new();
        assert_eq!(regs.least_recently_used_alnum(), b'A');
    }

    #[test]
    fn history_shift_installs_entry_at_zero() {
        let mut regs = RegisterFile::new();
        regs.write(0x00, TglString::from("old"));
        regs.push_history(TglString::from("new"));
        assert_eq!(regs.peek(0x00).as_bytes(), b"new");
        assert_eq!(regs.peek(0x01).as_bytes(), b"old");
    }
}
