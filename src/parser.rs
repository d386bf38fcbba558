use std::iter::Peekable;
use tracing::trace;

use crate::{
    error::{Error, Result},
    expr::Expr,
    stmt::Stmt,
    token::*,
    value::Value,
};

const EQUALITY_TOKENS: &[&TokenKind] = &[
    &TokenKind::BangEqual,
    &TokenKind::EqualEqual,
];

const COMPARISON_TOKENS: &[&TokenKind] = &[
    &TokenKind::Greater,
    &TokenKind::GreaterEqual,
    &TokenKind::Less,
    &TokenKind::LessEqual,
];

const TERM_TOKENS: &[&TokenKind] = &[
    &TokenKind::Minus,
    &TokenKind::Plus,
];

const FACTOR_TOKENS: &[&TokenKind] = &[
    &TokenKind::Star,
    &TokenKind::Slash,
];

const UNARY_TOKENS: &[&TokenKind] = &[
    &TokenKind::Bang,
    &TokenKind::Minus,
];

pub struct Parser<T> {
    tokens: T,
}

impl <T: Iterator<Item = Token>> Parser<Peekable<T>> {
    pub fn new(tokens: T) -> Self {
        let tokens = tokens.peekable();
        Parser { tokens }
    }

    /// Parses declarations until the end of input. A declaration that fails
    /// leaves its error in place and parsing resumes at the next statement
    /// boundary.
    pub fn parse(&mut self) -> Vec<Result<Stmt>> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            let result = self.declaration();
            if result.is_err() {
                self.synchronise();
            }
            statements.push(result);
        }
        statements
    }

    fn declaration(&mut self) -> Result<Stmt> {
        if self.match_single(&TokenKind::Var).is_some() {
            self.var_declaration()
        } else {
            self.statement()
        }
    }

    fn var_declaration(&mut self) -> Result<Stmt> {
        let name = self.consume(&TokenKind::Identifier, "Expect variable name.")?;

        let initializer = if self.match_single(&TokenKind::Equal).is_some() {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(&TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::new_var(name, initializer))
    }

    fn statement(&mut self) -> Result<Stmt> {
        if self.match_single(&TokenKind::Print).is_some() {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let expression = self.expression()?;
        self.consume(&TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::new_print(expression))
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expression = self.expression()?;
        self.consume(&TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::new_expression(expression))
    }

    fn expression(&mut self) -> Result<Expr> {
        self.equality()
    }

    fn equality(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::comparison,
            EQUALITY_TOKENS
        )
    }

    fn comparison(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::term,
            COMPARISON_TOKENS
        )
    }

    fn term(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::factor,
            TERM_TOKENS
        )
    }

    fn factor(&mut self) -> Result<Expr> {
        self.match_binary_precedence_with_tokens(
            Self::unary,
            FACTOR_TOKENS
        )
    }

    fn unary(&mut self) -> Result<Expr> {
        if let Some(token) = self.match_any(UNARY_TOKENS) {
            let right = Box::new(self.unary()?);
            Ok(Expr::new_unary(token, right))
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        let kind = match self.tokens.peek() {
            Some(next) => next.kind.clone(),
            None => return Err(Error::unexpected()),
        };

        let value = match kind {
            TokenKind::True => Value::from(true),
            TokenKind::False => Value::from(false),
            TokenKind::Nil => Value::Nil,
            TokenKind::Number(n) => Value::from(n),
            TokenKind::String(s) => Value::from(s),
            TokenKind::Identifier => {
                let name = self.advance().ok_or_else(Error::unexpected)?;
                return Ok(Expr::new_variable(name))
            },
            TokenKind::LeftParen => {
                self.advance();
                let expression = Box::new(self.expression()?);
                self.consume(&TokenKind::RightParen, "Expect ')' after expression.")?;
                return Ok(Expr::new_grouping(expression))
            },
            _ => return Err(self.error_at_next("Expect expression.")),
        };

        self.advance();
        Ok(Expr::new_literal(value))
    }

    fn is_at_end(&mut self) -> bool {
        self.tokens.peek()
            .map(Token::is_end_of_file)
            .unwrap_or(true)
    }

    /// Consumes the next token unless it is the end of the input.
    fn advance(&mut self) -> Option<Token> {
        if self.is_at_end() {
            None
        } else {
            self.tokens.next()
        }
    }

    fn check_next(&mut self, kind: &TokenKind) -> bool {
        self.tokens.peek()
            .map(|t| &t.kind == kind)
            .unwrap_or(false)
    }

    fn consume(&mut self, kind: &TokenKind, error_msg: &str) -> Result<Token> {
        match self.match_single(kind) {
            Some(token) => Ok(token),
            None => Err(self.error_at_next(error_msg)),
        }
    }

    /// Builds an error at the next token without consuming it; recovery is
    /// left to `synchronise`.
    fn error_at_next(&mut self, message: &str) -> Error {
        match self.tokens.peek() {
            Some(t) => Error::syntactic(t.clone(), message),
            None => Error::unexpected(),
        }
    }

    fn match_binary_precedence_with_tokens(
        &mut self,
        parse: impl Fn(&mut Self) -> Result<Expr>,
        kinds: &[&TokenKind]
    ) -> Result<Expr> {
        let mut e = parse(self)?;

        while let Some(token) = self.match_any(kinds) {
            let right = Box::new(parse(self)?);
            e = Expr::new_binary(Box::new(e), token, right)
        }

        Ok(e)
    }

    fn match_single(&mut self, kind: &TokenKind) -> Option<Token> {
        if self.check_next(kind) {
            self.tokens.next()
        } else {
            None
        }
    }

    fn match_any(&mut self, kinds: &[&TokenKind]) -> Option<Token> {
        kinds.iter().find_map(|k| self.match_single(k))
    }

    /// Discards tokens until just past a `;` or just before a keyword that
    /// starts a statement. The end-of-file token is never discarded.
    fn synchronise(&mut self) {
        while let Some(token) = self.advance() {
            trace!(lexeme = %token.lexeme, line = token.line, "discarding token");
            if token.kind == TokenKind::Semicolon { break }

            if let Some(next) = self.tokens.peek() {
                if next.kind.starts_statement() { break }
            }
        }
    }
}
