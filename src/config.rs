//! Interpreter-scoped configuration, threaded in explicitly instead of the
//! source's process-wide globals (SPEC_FULL.md §9, "Context as process-wide
//! state").

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    pub library_path: PathBuf,
    pub register_path: PathBuf,
    pub initial_context: String,
    pub sed_bin: String,
    pub perl_bin: String,
    pub tcl_bin: String,
}

impl InterpreterConfig {
    /// Builds the default configuration from environment variables, the
    /// way the source derives its default paths from `HOME`.
    pub fn from_env() -> Self {
        let home = std::env::var("HOME").unwrap_or_default();
        Self {
            library_path: PathBuf::from(&home).join(".tgl"),
            register_path: PathBuf::from(&home).join(".tgl_registers"),
            initial_context: String::new(),
            sed_bin: std::env::var("TGL_SED").unwrap_or_else(|_| "sed".to_string()),
            perl_bin: std::env::var("TGL_PERL").unwrap_or_else(|_| "perl".to_string()),
            tcl_bin: std::env::var("TGL_TCL").unwrap_or_else(|_| "tclsh".to_string()),
        }
    }
}
