use lox_walk::{Lox, Result, Status};
use pretty_assertions::assert_eq;

struct Run {
    status: Status,
    out: String,
    err: String,
}

fn run(source: &str) -> Result<Run> {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let status = Lox::new(&mut out, &mut err).run(source)?;
    Ok(Run {
        status,
        out: String::from_utf8_lossy(&out).into_owned(),
        err: String::from_utf8_lossy(&err).into_owned(),
    })
}

#[test]
fn prints_in_program_order() -> Result<()> {
    let run = run("
        // a small program
        var a = 1;
        var b = a + 2;
        print a;
        print b * 2;
        print \"done\";
    ")?;
    assert_eq!(Status::Ok, run.status);
    assert_eq!("1\n6\ndone\n", run.out);
    assert_eq!("", run.err);
    Ok(())
}

#[test]
fn subtraction_is_left_associative() -> Result<()> {
    assert_eq!("-4\n", run("print 1 - 2 - 3;")?.out);
    Ok(())
}

#[test]
fn integral_numbers_round_trip_through_print() -> Result<()> {
    assert_eq!("123\n0.5\n", run("print 123; print 0.5;")?.out);
    Ok(())
}

#[test]
fn undefined_variable_is_a_runtime_error() -> Result<()> {
    let run = run("print x;")?;
    assert_eq!(Status::RuntimeError, run.status);
    assert_eq!("", run.out);
    assert_eq!("[line 1] Error at 'x': Undefined variable 'x'.\n", run.err);
    Ok(())
}

#[test]
fn type_errors_and_concatenation() -> Result<()> {
    let failed = run("print \"a\" - 1;")?;
    assert_eq!(Status::RuntimeError, failed.status);
    assert_eq!("[line 1] Error at '-': Operands must be numbers.\n", failed.err);

    let joined = run("print \"a\" + \"b\";")?;
    assert_eq!(Status::Ok, joined.status);
    assert_eq!("ab\n", joined.out);
    Ok(())
}

#[test]
fn runtime_errors_abort_the_rest_of_the_program() -> Result<()> {
    let run = run("print 1;\nprint -true;\nprint 3;")?;
    assert_eq!(Status::RuntimeError, run.status);
    assert_eq!("1\n", run.out);
    assert_eq!("[line 2] Error at '-': Operand must be a number.\n", run.err);
    Ok(())
}

#[test]
fn every_syntax_error_is_reported_and_nothing_runs() -> Result<()> {
    let run = run("print ;\nprint 1;\nvar = 2;\nprint (3;")?;
    assert_eq!(Status::StaticError, run.status);
    assert_eq!("", run.out);
    assert_eq!(
        "[line 1] Error at ';': Expect expression.\n\
         [line 3] Error at '=': Expect variable name.\n\
         [line 4] Error at ';': Expect ')' after expression.\n",
        run.err
    );
    Ok(())
}

#[test]
fn lexical_errors_are_all_reported() -> Result<()> {
    let run = run("print 1 @ 2;\nvar s = \"unterminated;")?;
    assert_eq!(Status::StaticError, run.status);
    assert_eq!("", run.out);
    let lines: Vec<_> = run.err.lines().collect();
    assert_eq!("[line 1] Error: Unexpected character '@'.", lines[0]);
    assert_eq!("[line 2] Error: Unterminated string.", lines[1]);
    Ok(())
}

#[test]
fn missing_semicolon_at_end_of_input() -> Result<()> {
    let run = run("print 1")?;
    assert_eq!(Status::StaticError, run.status);
    assert_eq!("[line 1] Error at end: Expect ';' after value.\n", run.err);
    Ok(())
}

#[test]
fn whitespace_only_programs_do_nothing() -> Result<()> {
    let run = run("  \n\t// nothing here\n")?;
    assert_eq!(Status::Ok, run.status);
    assert_eq!("", run.out);
    assert_eq!("", run.err);
    Ok(())
}

#[test]
fn bindings_persist_across_runs() -> Result<()> {
    let mut out = Vec::new();
    let mut err = Vec::new();
    {
        let mut lox = Lox::new(&mut out, &mut err);
        assert_eq!(Status::Ok, lox.run("var count = 0;")?);
        assert_eq!(Status::RuntimeError, lox.run("print missing;")?);
        assert_eq!(Status::Ok, lox.run("print count;")?);
    }
    assert_eq!("0\n", String::from_utf8_lossy(&out));
    assert_eq!("[line 1] Error at 'missing': Undefined variable 'missing'.\n", String::from_utf8_lossy(&err));
    Ok(())
}

#[test]
fn print_ast_shows_the_tree() -> Result<()> {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut ast = Vec::new();
    let status = Lox::new(&mut out, &mut err).print_ast("var x = -(1 + 2) * 3; print x == nil;", &mut ast)?;
    assert_eq!(Status::Ok, status);
    assert_eq!(
        "(var x (* (- (group (+ 1 2))) 3))\n(print (== x nil))\n",
        String::from_utf8_lossy(&ast)
    );
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn missing_files_are_io_errors() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = Lox::new(&mut out, &mut err).run_file("no/such/script.lox");
    assert!(matches!(result, Err(e) if matches!(e.kind(), lox_walk::ErrorKind::Io(_))));
}
