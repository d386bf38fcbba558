use std::result;
use std::fmt::{self, Display};

use crate::token::Token;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    Lexical { line: usize },
    Syntactic { token: Token },
    Runtime { token: Token },
    Unexpected,
    Io(std::io::Error),
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn lexical<S: Into<String>>(line: usize, message: S) -> Error {
        let kind = ErrorKind::Lexical { line };
        Error { kind, message: message.into() }
    }

    pub fn syntactic<S: Into<String>>(token: Token, message: S) -> Error {
        let kind = ErrorKind::Syntactic { token };
        Error { kind, message: message.into() }
    }

    pub fn runtime<S: Into<String>>(token: Token, message: S) -> Error {
        let kind = ErrorKind::Runtime { token };
        Error { kind, message: message.into() }
    }

    pub fn unexpected() -> Error {
        let kind = ErrorKind::Unexpected;
        Error { kind, message: "Unexpected end of input.".into() }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source line the error points at, if it has one.
    pub fn line(&self) -> Option<usize> {
        use ErrorKind::*;
        match self.kind() {
            Lexical { line } => Some(*line),
            Syntactic { token } | Runtime { token } => Some(token.line),
            Unexpected | Io(_) => None,
        }
    }

    /// The token a syntax or runtime error was raised at.
    pub fn token(&self) -> Option<&Token> {
        use ErrorKind::*;
        match self.kind() {
            Syntactic { token } | Runtime { token } => Some(token),
            _ => None,
        }
    }

    pub fn is_runtime_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Runtime { .. })
    }

    /// The `where` part of a diagnostic: ` at end`, ` at 'lexeme'` or nothing.
    pub fn location(&self) -> String {
        match self.token() {
            Some(token) if token.is_end_of_file() => " at end".to_string(),
            Some(token) => format!(" at '{}'", token.lexeme),
            None => "".to_string(),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let ErrorKind::Io(e) = self.kind() {
            return write!(f, "Error: {}: {}", self.message, e)
        }
        let line = self.line().unwrap_or(0);
        write!(f, "[line {}] Error{}: {}", line, self.location(), self.message)
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> std::io::Error {
        match e {
            Error { kind: ErrorKind::Io(inner), .. } => inner,
            e => std::io::Error::new(std::io::ErrorKind::Other, e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error { kind: ErrorKind::Io(e), message: "IO error".into() }
    }
}
