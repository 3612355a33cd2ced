//! Context gating: the `@` family of commands matches an external label
//! (usually a filename) against a glob and toggles `context_active`, which
//! governs whether `D`/`V` install definitions.

use crate::error::{Result, TglError};
use glob::Pattern;

const MAX_GLOB_LEN: usize = 255;

pub struct Context {
    name: String,
    active: bool,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), active: true }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// The extension: the substring after the last '.', or the whole name
    /// if there is no '.'.
    pub fn extension(&self) -> &str {
        match self.name.rfind('.') {
            Some(i) => &self.name[i + 1..],
            None => &self.name,
        }
    }

    fn matches(&self, glob: &str) -> Result<bool> {
        if glob.len() > MAX_GLOB_LEN {
            return Err(TglError::Context("Glob too long".into()));
        }
        let pattern = Pattern::new(glob).map_err(|e| TglError::Context(format!("Invalid glob: {e}")))?;
        Ok(pattern.matches(&self.name))
    }

    pub fn set_match(&mut self, glob: &str) -> Result<()> {
        self.active = self.matches(glob)?;
        Ok(())
    }

    pub fn set_not_match(&mut self, glob: &str) -> Result<()> {
        self.active = !self.matches(glob)?;
        Ok(())
    }

    /// AND-combine: only re-evaluates (and can only stay true or go false)
    /// if currently active.
    pub fn and_match(&mut self, glob: &str) -> Result<()> {
        if self.active {
            self.active = self.matches(glob)?;
        }
        Ok(())
    }

    pub fn or_match(&mut self, glob: &str) -> Result<()> {
        self.active = self.active || self.matches(glob)?;
        Ok(())
    }

    /// `active = active XOR matches`.
    pub fn xor_match(&mut self, glob: &str) -> Result<()> {
        let m = self.matches(glob)?;
        self.active ^= m;
        Ok(())
    }

    /// `active = active XOR (NOT matches)`.
    pub fn xor_not_match(&mut self, glob: &str) -> Result<()> {
        let m = self.matches(glob)?;
        self.active ^= !m;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_falls_back_to_whole_name() {
        let ctx = Context::new("foo.txt");
        assert_eq!(ctx.extension(), "txt");
        let ctx = Context::new("noext");
        assert_eq!(ctx.extension(), "noext");
    }

    #[test]
    fn glob_gate_matches_spec_scenario() {
        let mut ctx = Context::new("foo.txt");
        ctx.set_match("*.txt").unwrap();
        assert!(ctx.is_active());
        ctx.set_match("*.md").unwrap();
        assert!(!ctx.is_active());
    }

    #[test]
    fn xor_variants() {
        let mut ctx = Context::new("foo.txt");
        ctx.active = true;
        ctx.xor_match("*.txt").unwrap(); // true XOR true = false
        assert!(!ctx.is_active());
        ctx.active = true;
        ctx.xor_not_match("*.txt").unwrap(); // true XOR false = true
        assert!(ctx.is_active());
    }
}
