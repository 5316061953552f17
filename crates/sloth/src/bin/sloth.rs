//! Command-line driver: evaluate files or one-liners, or run a REPL.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use sloth::Interpreter;

/// A Scheme-like language with per-parameter lazy evaluation.
#[derive(Parser)]
#[command(name = "sloth", version, about)]
struct Cli {
    /// Program file to evaluate; starts a REPL when omitted
    file: Option<PathBuf>,

    /// Evaluate an expression and print its value
    #[arg(short = 'e', long = "eval", value_name = "EXPR", conflicts_with = "file")]
    expr: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let session = Interpreter::new();

    if let Some(expr) = cli.expr {
        let value = session.eval_source(&expr)?;
        println!("{}", value);
        return Ok(());
    }

    if let Some(file) = cli.file {
        let source = fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        let value = session.eval_source(&source)?;
        println!("{}", value);
        return Ok(());
    }

    repl(&session)
}

fn repl(session: &Interpreter) -> Result<()> {
    println!("sloth {} (Ctrl-D to exit)", sloth::VERSION);

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("sloth> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match session.eval_source(line) {
                    Ok(value) => println!("{}", value),
                    Err(err) => eprintln!("error: {}", err),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
