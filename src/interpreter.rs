//! The interpreter core: state aggregation and the byte-stream dispatcher.

mod arith;
mod context_ops;
mod control_flow;
mod definitions;
mod external_ops;
mod history_ops;
mod literals;
mod logic;
mod payload_ops;
mod register_ops;
mod secondary_ops;
mod stack_ops;
mod string_ops;

use crate::commands::{Command, CommandTable, LongCommandList};
use crate::config::InterpreterConfig;
use crate::consts::DIAGNOSTIC_CONTEXT_LEN;
use crate::context::Context;
use crate::error::{Result, TglError};
use crate::payload::PayloadState;
use crate::registers::{PStack, RegisterFile};
use crate::secondary_args::SecondaryArgs;
use crate::stack::Stack;
use crate::value::TglString;

/// Aggregates every piece of mutable interpreter state: registers, stacks,
/// the command table, context, payload, and the current code frame.
pub struct Interpreter {
    pub stack: Stack,
    pub registers: RegisterFile,
    pub pstack: PStack,
    pub commands: CommandTable,
    pub long_commands: LongCommandList,
    pub secondary_args: SecondaryArgs,
    pub context: Context,
    pub payload: PayloadState,
    pub config: InterpreterConfig,
    pub initial_whitespace: Option<TglString>,
    pub history_enabled: bool,
    pub history_offset: i64,
    code: TglString,
    ip: usize,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        let context = Context::new(config.initial_context.clone());
        let mut interp = Self {
            stack: Stack::new(),
            registers: RegisterFile::new(),
            pstack: PStack::new(),
            commands: CommandTable::new(),
            long_commands: LongCommandList::new(),
            secondary_args: SecondaryArgs::new(),
            context,
            payload: PayloadState::new(),
            config,
            initial_whitespace: None,
            history_enabled: true,
            history_offset: 0,
            code: TglString::empty(),
            ip: 0,
        };
        interp.install_builtins();
        interp
    }

    fn install_builtins(&mut self) {
        use crate::commands::NativeFn;
        let table: &[(u8, NativeFn)] = &[
            (b'#', literals::number),
            (b'0', literals::number),
            (b'1', literals::number),
            (b'2', literals::number),
            (b'3', literals::number),
            (b'4', literals::number),
            (b'5', literals::number),
            (b'6', literals::number),
            (b'7', literals::number),
            (b'8', literals::number),
            (b'9', literals::number),
            (b'(', literals::code_block),
            (b'\\', literals::escape),
            (b'"', literals::string),
            (b'+', arith::add),
            (b'-', arith::sub),
            (b'*', arith::mul),
            (b'/', arith::div),
            (b'%', arith::modulo),
            (b'<', arith::less),
            (b'>', arith::greater),
            (b'?', arith::rand),
            (b'&', logic::and),
            (b'|', logic::or),
            (b'^', logic::xor),
            (b'~', logic::not),
            (b'y', string_ops::empty_string),
            (b'.', string_ops::print),
            (b'\'', string_ops::char_of),
            (b'c', string_ops::concat),
            (b'l', string_ops::length),
            (b'C', string_ops::char_at),
            (b's', string_ops::substr),
            (b'S', string_ops::suffix),
            (b'm', string_ops::map),
            (b'=', string_ops::equal),
            (b'!', string_ops::not_equal),
            (b'{', string_ops::string_less),
            (b'}', string_ops::string_greater),
            (b'X', string_ops::eval),
            (b':', stack_ops::dupe),
            (b';', stack_ops::drop_n),
            (b'x', stack_ops::swap),
            (b'r', register_ops::read),
            (b'R', register_ops::write),
            (b'p', register_ops::stash),
            (b'P', register_ops::retrieve),
            (b'z', register_ops::stash_retrieve),
            (b'a', register_ops::auto_write),
            (b'i', control_flow::if_cmd),
            (b'I', control_flow::if_short),
            (b'w', control_flow::while_cmd),
            (b'W', control_flow::while_short),
            (b'f', control_flow::for_cmd),
            (b'F', control_flow::for_short),
            (b'e', control_flow::each),
            (b'@', context_ops::context),
            (b'd', definitions::defun),
            (b'D', definitions::contextual_defun),
            (b'v', definitions::defun_library),
            (b'V', definitions::contextual_defun_library),
            (b'Q', definitions::long_command),
            (b'u', secondary_ops::secondary_argument),
            (b',', payload_ops::payload),
            (b'b', external_ops::shell_script),
            (b'B', external_ops::shell_command),
            (b'j', external_ops::sed),
            (b'J', external_ops::perl),
            (b't', external_ops::tcl),
            (b'h', history_ops::history),
            (b'H', history_ops::suppress_history),
        ];
        for &(byte, f) in table {
            self.commands.bind_native(byte, f);
        }
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn set_ip(&mut self, ip: usize) {
        self.ip = ip;
    }

    pub fn code(&self) -> &TglString {
        &self.code
    }

    pub fn code_len(&self) -> usize {
        self.code.len()
    }

    pub fn curr_byte(&self) -> Option<u8> {
        self.code.as_bytes().get(self.ip).copied()
    }

    pub fn advance_ip(&mut self, k: usize) {
        self.ip += k;
    }

    pub fn ip_valid(&self) -> bool {
        self.ip < self.code.len()
    }

    /// Executes `code` in a fresh frame: saves (code, ip), runs to
    /// completion or first failure, restores (code, ip) regardless of
    /// outcome.
    pub fn exec_code(&mut self, code: &TglString) -> Result<()> {
        let old_code = std::mem::replace(&mut self.code, code.clone());
        let old_ip = std::mem::replace(&mut self.ip, 0);

        let mut result = Ok(());
        while self.ip < self.code.len() {
            if let Err(e) = self.step() {
                result = Err(e);
                break;
            }
        }

        self.code = old_code;
        self.ip = old_ip;
        result
    }

    /// Executes at most one command at the current IP.
    pub fn step(&mut self) -> Result<()> {
        while self.ip < self.code.len() && self.code.as_bytes()[self.ip].is_ascii_whitespace() {
            self.ip += 1;
        }
        if self.ip >= self.code.len() {
            return Ok(());
        }

        let old_ip = self.ip;
        let command = self.code.as_bytes()[self.ip];

        let span = tracing::trace_span!("dispatch", command = %(command as char), ip = old_ip);
        let _enter = span.enter();

        let bound = self.commands.get(command).cloned();
        let result = match bound {
            None => Err(TglError::NoSuchCommand),
            Some(Command::Native(f)) => f(self),
            Some(Command::User(body)) => self.exec_code(&body),
        };

        match result {
            Ok(()) => {
                self.ip += 1;
                Ok(())
            }
            Err(e) => {
                self.ip = old_ip;
                self.diagnostic(Some(&e));
                Err(e)
            }
        }
    }

    /// Emits a one-line diagnostic to stderr and a 32-byte code-context
    /// window with a caret at the instruction pointer.
    pub fn diagnostic(&self, error: Option<&TglError>) {
        if let Some(e) = error {
            eprintln!("tgl: error: {e}");
            tracing::error!(error = %e, ip = self.ip, "command failed");
        }

        let code_bytes = self.code.as_bytes();
        let offset = self.ip.saturating_sub(16);
        let len = (offset + DIAGNOSTIC_CONTEXT_LEN).min(code_bytes.len()) - offset;
        let mut context: Vec<u8> = code_bytes[offset..offset + len].to_vec();
        for b in &mut context {
            if b.is_ascii_whitespace() {
                *b = b' ';
            }
        }
        let context = String::from_utf8_lossy(&context);
        let prefix = "While executing: ";
        eprintln!("{prefix}{context}");
        let caret_pos = self.ip - offset + prefix.len();
        eprintln!("{:>width$}", "^", width = caret_pos + 1);
    }
}
