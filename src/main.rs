// ABOUTME: CLI entry point — dispatches to the REPL, a piped-stdin run, or
// ABOUTME: file-argument interpretation per spec.md §6

use clap::Parser;
use monkey_interp::{driver, repl};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

/// A tree-walking interpreter for a small expression-oriented scripting
/// language. With no arguments it starts a REPL (or, if standard input is
/// piped, runs it as a single program); with one or more FILE arguments it
/// interprets each in turn.
#[derive(Parser, Debug)]
#[command(name = "monkey", version, about = "A tree-walking interpreter with a Pratt parser and quasiquotation macros")]
struct Cli {
    /// Script file(s) to execute, interpreted in order. With none given,
    /// starts a REPL unless standard input is piped.
    #[arg(value_name = "FILE")]
    paths: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = if !cli.paths.is_empty() {
        driver::run_files(&cli.paths)
    } else if std::io::stdin().is_terminal() {
        repl::run()
    } else {
        let mut source = String::new();
        match std::io::stdin().read_to_string(&mut source) {
            Ok(_) => driver::run_source(&source),
            Err(err) => {
                eprintln!("error reading standard input: {}", err);
                1
            }
        }
    };

    std::process::exit(exit_code);
}
