use clap::{ArgAction, Parser};
use lox_walk::{Error, Lox, Status};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};
use tracing::{error, Level};

/// A tree-walking interpreter for Lox.
#[derive(Debug, Parser)]
#[command(name = "lox-walk", version)]
struct Cli {
    /// Script to run. Starts an interactive prompt when omitted.
    script: Option<PathBuf>,

    /// Print each parsed statement instead of executing it.
    #[arg(long)]
    print_ast: bool,

    /// Log more (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(cli.log_level())
        .with_target(false)
        .init();

    match &cli.script {
        Some(path) => run_file(path, cli.print_ast),
        None => run_prompt(cli.print_ast),
    }
}

fn run_file(path: &Path, print_ast: bool) -> io::Result<()> {
    let mut lox = Lox::new(io::stdout(), io::stderr());
    let result = if print_ast {
        std::fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|source| lox.print_ast(&source, &mut io::stdout()))
    } else {
        lox.run_file(path)
    };

    match result {
        Ok(Status::Ok) => Ok(()),
        Ok(Status::StaticError) => process::exit(65),
        Ok(Status::RuntimeError) => process::exit(70),
        Err(e) => {
            error!(path = %path.display(), "could not run script");
            writeln!(io::stderr(), "{}", e)?;
            process::exit(74)
        },
    }
}

fn run_prompt(print_ast: bool) -> io::Result<()> {
    let mut buffer = String::new();
    let stdin = io::stdin();
    let mut out = io::stdout();

    let mut lox = Lox::new(io::stdout(), io::stderr());

    loop {
        write!(out, "> ")?;
        out.flush()?;

        buffer.clear();

        let num_bytes = stdin.read_line(&mut buffer)?;
        if num_bytes == 0 { break };

        if print_ast {
            lox.print_ast(buffer.as_str(), &mut out)?;
        } else {
            lox.run(buffer.as_str())?;
        }
    }

    Ok(())
}
