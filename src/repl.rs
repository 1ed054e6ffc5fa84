// ABOUTME: The interactive read-eval-print loop (spec.md §6) — a persistent
// ABOUTME: value environment and macro registry threaded across lines

use crate::builtins::register_builtins;
use crate::config;
use crate::env::Environment;
use crate::error::InterpreterError;
use crate::eval::eval_program;
use crate::highlighter::MonkeyHelper;
use crate::macros::{define_macros, expand_macros, MacroRegistry};
use crate::parser::parse;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::rc::Rc;

/// Run the REPL to completion (Ctrl-D or an unrecoverable readline error).
/// Returns the process exit code. REPL sessions always exit 0 on a clean
/// quit — only the file/stdin driver propagates evaluation failure into
/// the process exit code (spec.md §6).
pub fn run() -> i32 {
    println!("{}", config::WELCOME_MESSAGE);
    println!("{}", config::WELCOME_SUBTITLE);
    println!();

    let env = Environment::new();
    register_builtins(&env);
    // Macro definitions capture this separate environment, never the value
    // environment itself — macro values are not visible to the evaluator
    // (spec.md §4.7).
    let macro_env = Environment::new();
    let mut registry = MacroRegistry::new();

    let rl_config = Config::builder().auto_add_history(true).build();
    let mut editor: Editor<MonkeyHelper, rustyline::history::DefaultHistory> =
        match Editor::with_config(rl_config) {
            Ok(editor) => editor,
            Err(err) => {
                eprintln!("could not initialize REPL: {}", err);
                return 1;
            }
        };
    editor.set_helper(Some(MonkeyHelper::new()));

    if let Err(err) = editor.load_history(config::HISTORY_FILE) {
        if !matches!(&err, ReadlineError::Io(io) if io.kind() == std::io::ErrorKind::NotFound) {
            let wrapped = InterpreterError::HistoryRead {
                path: config::HISTORY_FILE.into(),
                source: std::io::Error::other(err.to_string()),
            };
            eprintln!("{}", wrapped);
        }
    }

    loop {
        match editor.readline(config::PROMPT) {
            Ok(line) => run_line(&line, &env, &macro_env, &mut registry),
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("readline error: {}", err);
                break;
            }
        }
    }

    if let Err(err) = editor.save_history(config::HISTORY_FILE) {
        eprintln!("could not save REPL history: {}", err);
    }

    0
}

/// Lex, parse, expand macros, and evaluate a single line, printing its
/// result exactly as spec.md §6 prescribes. A fatal macro-expansion
/// failure aborts the whole process rather than printing an ordinary
/// result (spec.md §7) — malformed macros are a programmer error, not
/// user-facing `ERROR:` data.
fn run_line(
    line: &str,
    env: &Rc<Environment>,
    macro_env: &Rc<Environment>,
    registry: &mut MacroRegistry,
) {
    let mut program = match parse(line) {
        Ok(program) => program,
        Err(errors) => {
            for message in errors {
                println!("\t{}", message);
            }
            return;
        }
    };

    define_macros(&mut program, registry, macro_env);
    let expanded = match expand_macros(program, registry) {
        Ok(expanded) => expanded,
        Err(message) => {
            eprintln!(
                "{}",
                InterpreterError::MacroExpansionNotQuote(message)
            );
            std::process::exit(1);
        }
    };

    let result = eval_program(&expanded, env);
    println!("{}", result);
}
