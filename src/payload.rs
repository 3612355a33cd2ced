//! The payload subsystem: a delimiter-aware cursor over an auxiliary byte
//! buffer, used to read structured data (fields, key/value pairs) embedded
//! in or alongside the executing code.
//!
//! Delimiter sentinels are modeled as real enum variants (`Delim`) rather
//! than the source's invalid-pointer-constant encoding (SPEC_FULL.md §9).

use crate::error::{Result, TglError};
use crate::value::TglString;

/// A value or data-start delimiter: either a sentinel meaning "a run of
/// whitespace", a sentinel meaning "a line terminator", or an explicit byte
/// sequence.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Delim {
    Whitespace,
    Line,
    Bytes(TglString),
}

impl Default for Delim {
    fn default() -> Self {
        Delim::Whitespace
    }
}

#[derive(Clone, Copy, Default)]
pub struct BalanceFlags {
    pub paren: bool,
    pub bracket: bool,
    pub brace: bool,
    pub angle: bool,
}

#[derive(Clone, Copy, Default)]
pub struct TrimFlags {
    pub paren: bool,
    pub bracket: bool,
    pub brace: bool,
    pub angle: bool,
    pub space: bool,
}

/// The five configurable delimiters: data-start, per-item, and the three
/// output joiners used when printing.
pub struct PayloadState {
    data_base: TglString,
    offset: usize,
    global_code: Option<TglString>,
    pub data_start_delim: TglString,
    pub value_delim: Delim,
    pub output_v_delim: TglString,
    pub output_kv_delim: TglString,
    pub output_kvs_delim: TglString,
    pub balance: BalanceFlags,
    pub trim: TrimFlags,
}

impl Default for PayloadState {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadState {
    pub fn new() -> Self {
        Self {
            data_base: TglString::empty(),
            offset: 0,
            global_code: None,
            data_start_delim: TglString::from(",$"),
            value_delim: Delim::Whitespace,
            output_v_delim: TglString::from(", "),
            output_kv_delim: TglString::from(", "),
            output_kvs_delim: TglString::from("\n"),
            balance: BalanceFlags { paren: true, bracket: true, brace: true, angle: false },
            trim: TrimFlags { paren: true, bracket: true, brace: true, angle: false, space: true },
        }
    }

    pub fn set_global_code(&mut self, code: TglString) {
        self.global_code = Some(code);
    }

    /// Replaces the payload buffer; the single mutator for `data_base`.
    /// Performs an implicit skip of one leading delimiter instance when the
    /// new buffer starts with whitespace (under the whitespace sentinel) or
    /// a newline (under the line sentinel).
    pub fn set_payload(&mut self, data: TglString) {
        self.data_base = data;
        self.offset = 0;
        match self.value_delim {
            Delim::Whitespace => {
                while self.offset < self.data_base.len() && is_ws(self.data_base.as_bytes()[self.offset]) {
                    self.offset += 1;
                }
            }
            Delim::Line => {
                if self.offset < self.data_base.len() && matches!(self.data_base.as_bytes()[self.offset], b'\n' | b'\r') {
                    self.offset += 1;
                    if self.data_base.as_bytes().get(self.offset - 1) == Some(&b'\r')
                        && self.data_base.as_bytes().get(self.offset) == Some(&b'\n')
                    {
                        self.offset += 1;
                    }
                }
            }
            Delim::Bytes(_) => {}
        }
    }

    pub fn raw(&self) -> &TglString {
        &self.data_base
    }

    pub fn remaining(&self) -> &[u8] {
        self.data_base.slice(self.offset, self.data_base.len())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.data_base.len());
    }

    pub fn len(&self) -> usize {
        self.data_base.len()
    }

    /// Loads the payload from the top-level code: finds `data_start_delim`
    /// in it and installs everything after the delimiter.
    pub fn load_from_code(&mut self) -> Result<()> {
        let code = self.global_code.clone().ok_or_else(|| TglError::Context("No code available".into()))?;
        let delim = self.data_start_delim.as_bytes().to_vec();
        match code.find(&delim, 0) {
            Some(pos) => {
                let start = pos + delim.len();
                let bytes = code.slice(start, code.len()).to_vec();
                self.set_payload(TglString::from_bytes(bytes));
                Ok(())
            }
            None => Err(TglError::Context("Data-start delimiter not found".into())),
        }
    }

    /// Before executing top-level code: splits off the longest run of `|`
    /// as the payload buffer, returning `(prefix, rest)`. Mirrors the
    /// source's "longest run, not first" behaviour (SPEC_FULL.md §9).
    pub fn extract_prefix(code: &TglString) -> (Option<TglString>, TglString) {
        let bytes = code.as_bytes();
        let mut best: Option<(usize, usize)> = None; // (start, len)
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'|' {
                let start = i;
                while i < bytes.len() && bytes[i] == b'|' {
                    i += 1;
                }
                let len = i - start;
                if best.map(|(_, l)| len > l).unwrap_or(true) {
                    best = Some((start, len));
                }
            } else {
                i += 1;
            }
        }
        match best {
            None => (None, code.clone()),
            Some((start, len)) => {
                let prefix = TglString::from_bytes(bytes[..start].to_vec());
                let rest = TglString::from_bytes(bytes[start + len..].to_vec());
                (Some(prefix), rest)
            }
        }
    }

    /// Scans forward from `from` for the next delimiter occurrence,
    /// honouring bracket balancing. Returns `(item_end, next_start)`:
    /// `[from, item_end)` is the raw item, `next_start` is where the
    /// following item begins. `None` if no delimiter is found before the
    /// end of the buffer (the item runs to the end).
    fn scan_delim(&self, from: usize) -> Option<(usize, usize)> {
        let bytes = self.data_base.as_bytes();
        let mut i = from;
        while i < bytes.len() {
            if let Some(close) = self.balanced_skip(bytes, i) {
                i = close;
                continue;
            }
            if let Some(dlen) = self.delim_len_at(bytes, i) {
                let item_end = i;
                let mut next_start = i + dlen;
                if matches!(self.value_delim, Delim::Whitespace) {
                    while next_start < bytes.len() && is_ws(bytes[next_start]) {
                        next_start += 1;
                    }
                }
                return Some((item_end, next_start));
            }
            i += 1;
        }
        None
    }

    /// If `bytes[i]` opens a bracket whose balance flag is set, returns the
    /// index one past the matching closer (possibly past the end if
    /// unbalanced, in which case the caller treats it as "no match").
    fn balanced_skip(&self, bytes: &[u8], i: usize) -> Option<usize> {
        let (open, close, enabled) = match bytes[i] {
            b'(' if self.balance.paren => (b'(', b')', true),
            b'[' if self.balance.bracket => (b'[', b']', true),
            b'{' if self.balance.brace => (b'{', b'}', true),
            b'<' if self.balance.angle => (b'<', b'>', true),
            _ => (0, 0, false),
        };
        if !enabled {
            return None;
        }
        let mut depth = 0usize;
        let mut j = i;
        while j < bytes.len() {
            if bytes[j] == open {
                depth += 1;
            } else if bytes[j] == close {
                depth -= 1;
                if depth == 0 {
                    return Some(j + 1);
                }
            }
            j += 1;
        }
        None
    }

    fn delim_len_at(&self, bytes: &[u8], i: usize) -> Option<usize> {
        match &self.value_delim {
            Delim::Whitespace => is_ws(bytes[i]).then_some(1),
            Delim::Line => match bytes[i] {
                b'\r' => Some(if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 }),
                b'\n' => Some(1),
                _ => None,
            },
            Delim::Bytes(seq) => {
                let seq = seq.as_bytes();
                if !seq.is_empty() && bytes[i..].starts_with(seq) {
                    Some(seq.len())
                } else {
                    None
                }
            }
        }
    }

    /// Extracts `[from, end)` applying the configured trim rules.
    fn trim_item(&self, raw: &[u8]) -> Vec<u8> {
        let mut slice = raw;
        if self.trim.space {
            while slice.first().is_some_and(|b| is_ws(*b)) {
                slice = &slice[1..];
            }
            while slice.last().is_some_and(|b| is_ws(*b)) {
                slice = &slice[..slice.len() - 1];
            }
        }
        let pairs: &[(u8, u8, bool)] = &[
            (b'(', b')', self.trim.paren),
            (b'[', b']', self.trim.bracket),
            (b'{', b'}', self.trim.brace),
            (b'<', b'>', self.trim.angle),
        ];
        for &(open, close, enabled) in pairs {
            if enabled && slice.len() >= 2 && slice.first() == Some(&open) && slice.last() == Some(&close) {
                slice = &slice[1..slice.len() - 1];
                break;
            }
        }
        slice.to_vec()
    }

    /// Returns the current item (from the current offset up to the next
    /// delimiter or end of buffer) without advancing.
    pub fn current_item(&self) -> TglString {
        let bytes = self.data_base.as_bytes();
        let end = self.scan_delim(self.offset).map(|(e, _)| e).unwrap_or(bytes.len());
        TglString::from_bytes(self.trim_item(&bytes[self.offset..end]))
    }

    /// Advances past the current item and its delimiter, `n` times.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            let bytes_len = self.data_base.len();
            match self.scan_delim(self.offset) {
                Some((_, next)) => self.offset = next,
                None => self.offset = bytes_len,
            }
        }
    }

    /// Advances past a key then its value (for key/value iteration).
    pub fn advance_kv(&mut self) {
        self.advance(2);
    }

    /// Returns the item at the given index (0-based; negative counts from
    /// the end) without disturbing the current offset.
    pub fn item_at_index(&self, index: i64) -> Option<TglString> {
        let items = self.all_items();
        let idx = if index < 0 { items.len() as i64 + index } else { index };
        if idx < 0 {
            return None;
        }
        items.get(idx as usize).cloned()
    }

    pub fn item_count(&self) -> usize {
        self.all_items().len()
    }

    /// Returns the value paired with `key` among alternating key/value
    /// items, scanning from the start of the buffer.
    pub fn value_for_key(&self, key: &TglString) -> Option<TglString> {
        let items = self.all_items();
        let mut it = items.into_iter();
        loop {
            let k = it.next()?;
            let v = it.next()?;
            if k.as_bytes() == key.as_bytes() {
                return Some(v);
            }
        }
    }

    fn all_items(&self) -> Vec<TglString> {
        let bytes = self.data_base.as_bytes();
        let mut items = Vec::new();
        let mut pos = 0usize;
        loop {
            match self.scan_delim(pos) {
                Some((end, next)) => {
                    items.push(TglString::from_bytes(self.trim_item(&bytes[pos..end])));
                    if next <= pos {
                        break;
                    }
                    pos = next;
                    if pos >= bytes.len() {
                        break;
                    }
                }
                None => {
                    if pos < bytes.len() {
                        items.push(TglString::from_bytes(self.trim_item(&bytes[pos..])));
                    }
                    break;
                }
            }
        }
        items
    }
}

fn is_ws(b: u8) -> bool {
    b.is_ascii_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_iteration_matches_scenario_five() {
        let mut p = PayloadState::new();
        p.set_payload(TglString::from("a b c "));
        assert_eq!(p.current_item().as_bytes(), b"a");
        p.advance(1);
        assert_eq!(p.current_item().as_bytes(), b"b");
        p.advance(1);
        assert_eq!(p.current_item().as_bytes(), b"c");
    }

    #[test]
    fn extract_prefix_uses_longest_run() {
        // Equal-length runs: the source's strict `>` comparison keeps the
        // first one found, not the last.
        let code = TglString::from("|| payload || rest");
        let (prefix, rest) = PayloadState::extract_prefix(&code);
        assert_eq!(prefix.unwrap().as_bytes(), b"");
        assert_eq!(rest.as_bytes(), b" payload || rest");
    }

    #[test]
    fn extract_prefix_prefers_strictly_longer_run() {
        let code = TglString::from("| payload ||| rest");
        let (prefix, rest) = PayloadState::extract_prefix(&code);
        assert_eq!(prefix.unwrap().as_bytes(), b"| payload ");
        assert_eq!(rest.as_bytes(), b" rest");
    }

    #[test]
    fn bracket_balancing_skips_inner_delimiters() {
        let mut p = PayloadState::new();
        p.set_payload(TglString::from("(a b) c"));
        let items = p.all_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_bytes(), b"a b");
        assert_eq!(items[1].as_bytes(), b"c");
    }

    #[test]
    fn key_value_lookup() {
        let mut p = PayloadState::new();
        p.set_payload(TglString::from("name bob age 9"));
        assert_eq!(p.value_for_key(&TglString::from("age")).unwrap().as_bytes(), b"9");
    }
}
