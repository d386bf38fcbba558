use std::{io::Write, path::Path};
use tracing::debug;

use crate::{
    error::{Error, Result},
    interpreter::Interpreter,
    parser::Parser,
    printer,
    scanner::Scanner,
    stmt::Stmt,
};

/// How a call to `Lox::run` ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// Scanning or parsing reported at least one error; nothing was executed.
    StaticError,
    /// Execution stopped at a runtime error.
    RuntimeError,
}

/// Runs source text through the whole pipeline, writing program output to
/// `Out` and one diagnostic line per error to `ErrOut`.
///
/// Bindings live as long as the `Lox` value, so successive calls to `run`
/// see each other's variables.
pub struct Lox<Out, ErrOut> {
    interpreter: Interpreter<Out>,
    err_out: ErrOut,
}

impl <Out: Write, ErrOut: Write> Lox<Out, ErrOut> {
    pub fn new(out: Out, err_out: ErrOut) -> Self {
        Self {
            interpreter: Interpreter::new(out),
            err_out,
        }
    }

    pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Status> {
        let contents = std::fs::read_to_string(path)?;
        self.run(contents.as_str())
    }

    /// Only a failure to write a diagnostic is returned as an error.
    pub fn run(&mut self, source: &str) -> Result<Status> {
        let statements = match self.parse(source)? {
            Some(statements) => statements,
            None => return Ok(Status::StaticError),
        };

        match self.interpreter.interpret(&statements) {
            Err(e) if e.is_runtime_error() => {
                self.report(&e)?;
                Ok(Status::RuntimeError)
            },
            Err(e) => Err(e),
            Ok(()) => Ok(Status::Ok),
        }
    }

    /// Writes the parenthesised form of each statement instead of running it.
    pub fn print_ast(&mut self, source: &str, out: &mut impl Write) -> Result<Status> {
        let statements = match self.parse(source)? {
            Some(statements) => statements,
            None => return Ok(Status::StaticError),
        };
        for s in statements.iter() {
            writeln!(out, "{}", printer::print_stmt(s))?;
        }
        Ok(Status::Ok)
    }

    /// Scans and parses, reporting every lexical and syntax error found.
    /// Returns `None` if anything was reported.
    fn parse(&mut self, source: &str) -> Result<Option<Vec<Stmt>>> {
        let (tokens, lexical_errors): (Vec<_>, Vec<_>) = Scanner::new(source)
            .scan_tokens()
            .into_iter()
            .partition(std::result::Result::is_ok);

        let mut had_error = !lexical_errors.is_empty();
        for e in lexical_errors.into_iter().filter_map(std::result::Result::err) {
            self.report(&e)?;
        }

        let tokens = tokens.into_iter().filter_map(std::result::Result::ok);
        let mut statements = Vec::new();
        for parsed in Parser::new(tokens).parse() {
            match parsed {
                Ok(statement) => statements.push(statement),
                Err(e) => {
                    had_error = true;
                    self.report(&e)?;
                },
            }
        }

        debug!(statements = statements.len(), had_error, "parsed source");
        Ok(if had_error { None } else { Some(statements) })
    }

    fn report(&mut self, e: &Error) -> Result<()> {
        writeln!(self.err_out, "{}", e)?;
        Ok(())
    }
}
