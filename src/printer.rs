use crate::{
    expr::Expr,
    stmt::Stmt,
};

pub fn print(e: &Expr) -> String {
    let mut printer = AstPrinter {};
    printer.expr(e)
}

pub fn print_stmt(s: &Stmt) -> String {
    let mut printer = AstPrinter {};
    printer.stmt(s)
}

struct AstPrinter;

impl AstPrinter {
    fn parenthesize(&mut self, name: &str, exprs: &[&Expr]) -> String {
        let mut s = String::new();
        s.push('(');
        s.push_str(name);

        for e in exprs.iter() {
            s.push(' ');
            s.push_str(self.expr(e).as_str());
        }

        s.push(')');
        s
    }

    fn expr(&mut self, e: &Expr) -> String {
        match e {
            Expr::Binary(b) => self.parenthesize(
                b.op.lexeme.as_str(),
                &[b.left.as_ref(), b.right.as_ref()]
            ),
            Expr::Grouping(g) => self.parenthesize(
                "group",
                &[g.expression.as_ref()]
            ),
            Expr::Literal(l) => l.value.to_string(),
            Expr::Unary(u) => self.parenthesize(
                u.op.lexeme.as_str(),
                &[u.right.as_ref()]
            ),
            Expr::Variable(v) => v.name.lexeme.clone(),
        }
    }

    fn stmt(&mut self, s: &Stmt) -> String {
        match s {
            Stmt::Expression(e) => self.parenthesize(";", &[&e.expression]),
            Stmt::Print(p) => self.parenthesize("print", &[&p.expression]),
            Stmt::Var(v) => {
                let name = format!("var {}", v.name.lexeme);
                match &v.initializer {
                    Some(initializer) => self.parenthesize(&name, &[initializer]),
                    None => self.parenthesize(&name, &[]),
                }
            },
        }
    }
}
