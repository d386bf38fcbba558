use std::io::Write;
use tracing::debug;

use crate::{
    environment::Environment,
    error::{Error, Result},
    expr::{self, Expr},
    stmt::{self, Stmt},
    token::{TokenKind, Token},
    value::Value,
};

pub struct Interpreter<W> {
    environment: Environment,
    writer: W,
}

impl <W: Write> Interpreter<W> {
    pub fn new(writer: W) -> Self {
        Interpreter { environment: Environment::new(), writer }
    }

    /// Executes statements in order, stopping at the first runtime error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!(count = statements.len(), "interpreting statements");
        for s in statements.iter() {
            self.execute(s)?;
        }
        Ok(())
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn execute(&mut self, s: &Stmt) -> Result<()> {
        match s {
            Stmt::Expression(e) => self.execute_expression(e),
            Stmt::Print(p) => self.execute_print(p),
            Stmt::Var(v) => self.execute_var(v),
        }
    }

    fn execute_expression(&mut self, e: &stmt::Expression) -> Result<()> {
        self.evaluate(&e.expression)?;
        Ok(())
    }

    fn execute_print(&mut self, p: &stmt::Print) -> Result<()> {
        let value = self.evaluate(&p.expression)?;
        writeln!(self.writer, "{}", value)?;
        Ok(())
    }

    fn execute_var(&mut self, v: &stmt::Var) -> Result<()> {
        let value = if let Some(initializer) = &v.initializer {
            self.evaluate(initializer)?
        } else {
            Value::Nil
        };

        debug!(name = %v.name.lexeme, %value, "defining variable");
        self.environment.define(v.name.lexeme.clone(), value);
        Ok(())
    }

    fn evaluate(&mut self, e: &Expr) -> Result<Value> {
        match e {
            Expr::Binary(b) => self.evaluate_binary(b),
            Expr::Grouping(g) => self.evaluate(&g.expression),
            Expr::Literal(l) => Ok(l.value.clone()),
            Expr::Unary(u) => self.evaluate_unary(u),
            Expr::Variable(v) => self.environment.get(&v.name),
        }
    }

    fn evaluate_binary(&mut self, e: &expr::Binary) -> Result<Value> {
        let left = self.evaluate(e.left.as_ref())?;
        let right = self.evaluate(e.right.as_ref())?;

        use Value::{Number, String, Bool};
        match e.op.kind {
            TokenKind::Minus => compute_if_numbers(&e.op, left, right, |l, r| l - r),
            TokenKind::Plus => match (left, right) {
                (Number(left), Number(right)) => Ok(Number(left + right)),
                (String(mut left), String(right)) => {
                    left.push_str(right.as_str());
                    Ok(String(left))
                },
                _ => Err(Error::runtime(e.op.clone(), "Operands must be two numbers or two strings.")),
            },
            TokenKind::Slash => compute_if_numbers(&e.op, left, right, |l, r| l / r),
            TokenKind::Star => compute_if_numbers(&e.op, left, right, |l, r| l * r),
            TokenKind::Greater => compute_if_numbers(&e.op, left, right, |l, r| l > r),
            TokenKind::GreaterEqual => compute_if_numbers(&e.op, left, right, |l, r| l >= r),
            TokenKind::Less => compute_if_numbers(&e.op, left, right, |l, r| l < r),
            TokenKind::LessEqual => compute_if_numbers(&e.op, left, right, |l, r| l <= r),
            TokenKind::EqualEqual => Ok(Bool(left.is_equal(&right))),
            TokenKind::BangEqual => Ok(Bool(!left.is_equal(&right))),
            _ => unreachable!("The parser only builds binary expressions from binary operators."),
        }
    }

    fn evaluate_unary(&mut self, e: &expr::Unary) -> Result<Value> {
        let right = self.evaluate(e.right.as_ref())?;

        use Value::*;
        match (&e.op.kind, right) {
            (TokenKind::Minus, Number(right)) => Ok(Number(-right)),
            (TokenKind::Minus, _) => Err(Error::runtime(e.op.clone(), "Operand must be a number.")),
            (TokenKind::Bang, right) => Ok(Bool(!right.is_truthy())),
            _ => unreachable!("The parser only builds unary expressions from '!' and '-'."),
        }
    }
}

fn compute_if_numbers<T: Into<Value>>(
    op: &Token,
    left: Value,
    right: Value,
    f: impl Fn(f64, f64) -> T
) -> Result<Value> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Ok(f(left, right).into()),
        _ => Err(Error::runtime(op.clone(), "Operands must be numbers.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::Parser, scanner::Scanner};
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> Result<Vec<Stmt>> {
        let tokens = Scanner::new(src)
            .scan_tokens()
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        Parser::new(tokens.into_iter()).parse().into_iter().collect()
    }

    fn run(src: &str) -> (std::string::String, Result<()>) {
        let mut interpreter = Interpreter::new(Vec::new());
        let result = parse(src).and_then(|s| interpreter.interpret(&s));
        let output = std::string::String::from_utf8_lossy(interpreter.writer()).into_owned();
        (output, result)
    }

    fn output_of(src: &str) -> std::string::String {
        let (output, result) = run(src);
        if let Err(e) = result {
            panic!("{} failed: {}", src, e);
        }
        output
    }

    fn error_of(src: &str) -> Error {
        match run(src).1 {
            Ok(()) => panic!("{} should have failed", src),
            Err(e) => e,
        }
    }

    #[test]
    fn subtraction_folds_left() {
        assert_eq!("-4\n", output_of("print 1 - 2 - 3;"));
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!("7\n9\n2.5\n-3\n", output_of("print 1 + 2 * 3; print (1 + 2) * 3; print 5 / 2; print -3;"));
    }

    #[test]
    fn integral_literals_print_without_fraction() {
        assert_eq!("123\n", output_of("print 123;"));
    }

    #[test]
    fn division_by_zero_is_infinite() {
        assert_eq!("Infinity\n-Infinity\n", output_of("print 1 / 0; print -1 / 0;"));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!("ab\n", output_of("print \"a\" + \"b\";"));
    }

    #[test]
    fn comparisons() {
        assert_eq!(
            "true\nfalse\ntrue\ntrue\n",
            output_of("print 1 < 2; print 1 > 2; print 2 >= 2; print 2 <= 3;")
        );
    }

    #[test]
    fn equality_without_coercion() {
        assert_eq!(
            "true\nfalse\nfalse\ntrue\ntrue\n",
            output_of("print nil == nil; print nil == false; print 1 == \"1\"; print \"a\" == \"a\"; print 1 != 2;")
        );
    }

    #[test]
    fn negation_uses_truthiness() {
        assert_eq!(
            "true\nfalse\nfalse\nfalse\ntrue\n",
            output_of("print !nil; print !0; print !\"\"; print !true; print !!1;")
        );
    }

    #[test]
    fn variables() {
        assert_eq!("nil\n3\n", output_of("var a; print a; var b = 1 + 2; print b;"));
    }

    #[test]
    fn redeclaring_overwrites() {
        assert_eq!("2\n", output_of("var x = 1; var x = 2; print x;"));
    }

    #[test]
    fn falsy_bindings_are_found() {
        assert_eq!("0\n\nfalse\n", output_of("var z = 0; var e = \"\"; var f = false; print z; print e; print f;"));
    }

    #[test]
    fn expression_statements_print_nothing() {
        assert_eq!("", output_of("1 + 2; \"unused\";"));
    }

    #[test]
    fn undefined_variable() {
        let (output, result) = run("print x;");
        assert_eq!("", output);
        let error = result.unwrap_err();
        assert!(error.is_runtime_error());
        assert_eq!(Some("x"), error.token().map(|t| t.lexeme()));
        assert_eq!("[line 1] Error at 'x': Undefined variable 'x'.", error.to_string());
    }

    #[test]
    fn subtracting_from_a_string() {
        let error = error_of("print \"a\" - 1;");
        assert!(error.is_runtime_error());
        assert_eq!("Operands must be numbers.", error.message());
    }

    #[test]
    fn adding_mixed_operands() {
        let error = error_of("print \"a\" + 1;");
        assert_eq!("Operands must be two numbers or two strings.", error.message());
        assert_eq!(Some("+"), error.token().map(|t| t.lexeme()));
    }

    #[test]
    fn negating_a_string() {
        let error = error_of("print -\"a\";");
        assert_eq!("Operand must be a number.", error.message());
    }

    #[test]
    fn runtime_errors_stop_the_batch() {
        let (output, result) = run("print 1; print nope; print 2;");
        assert_eq!("1\n", output);
        assert!(result.is_err());
    }

    #[test]
    fn bindings_survive_between_batches() -> Result<()> {
        let mut interpreter = Interpreter::new(Vec::new());
        interpreter.interpret(&parse("var greeting = \"hi\";")?)?;
        interpreter.interpret(&parse("print greeting;")?)?;
        assert_eq!(b"hi\n".to_vec(), *interpreter.writer());
        Ok(())
    }
}
