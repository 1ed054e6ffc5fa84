// ABOUTME: Non-interactive execution — piped stdin and file-argument modes
// ABOUTME: (spec.md §6), each running the pipeline in a fresh environment

use crate::builtins::register_builtins;
use crate::env::Environment;
use crate::error::InterpreterError;
use crate::eval::eval_program;
use crate::macros::{define_macros, expand_macros, MacroRegistry};
use crate::parser::parse;
use crate::value::Value;
use std::path::PathBuf;

/// Run `source` as a single program in a fresh environment. Used for piped
/// standard input: read to EOF, run once, exit (spec.md §6).
pub fn run_source(source: &str) -> i32 {
    let env = Environment::new();
    register_builtins(&env);
    let macro_env = Environment::new();
    let mut registry = MacroRegistry::new();

    run_program(source, &env, &macro_env, &mut registry)
}

/// Open and interpret each path in order, each in its own fresh value
/// environment and macro registry (programs do not share bindings across
/// files, spec.md §6). A file that fails to open reports the failure to
/// stderr and processing continues with the next file; an evaluation
/// error is fatal and exits the process immediately with a non-zero code.
pub fn run_files(paths: &[PathBuf]) -> i32 {
    let mut exit_code = 0;

    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(source) => {
                let env = Environment::new();
                register_builtins(&env);
                let macro_env = Environment::new();
                let mut registry = MacroRegistry::new();

                let code = run_program(&source, &env, &macro_env, &mut registry);
                if code != 0 {
                    return code;
                }
            }
            Err(source) => {
                eprintln!(
                    "{}",
                    InterpreterError::SourceRead {
                        path: path.clone(),
                        source,
                    }
                );
                exit_code = 1;
            }
        }
    }

    exit_code
}

fn run_program(
    source: &str,
    env: &std::rc::Rc<Environment>,
    macro_env: &std::rc::Rc<Environment>,
    registry: &mut MacroRegistry,
) -> i32 {
    let mut program = match parse(source) {
        Ok(program) => program,
        Err(errors) => {
            for message in errors {
                eprintln!("\t{}", message);
            }
            return 1;
        }
    };

    define_macros(&mut program, registry, macro_env);
    let expanded = match expand_macros(program, registry) {
        Ok(expanded) => expanded,
        Err(message) => {
            eprintln!("{}", InterpreterError::MacroExpansionNotQuote(message));
            return 1;
        }
    };

    match eval_program(&expanded, env) {
        Value::Error(message) => {
            eprintln!("ERROR: {}", message);
            1
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_source_returns_zero_on_clean_evaluation() {
        assert_eq!(run_source("let x = 1 + 1; x;"), 0);
    }

    #[test]
    fn run_source_returns_nonzero_on_evaluation_error() {
        assert_eq!(run_source("5 + true;"), 1);
    }

    #[test]
    fn run_source_returns_nonzero_on_parse_error() {
        assert_eq!(run_source("let = 5;"), 1);
    }

    #[test]
    fn run_files_reports_open_failure_and_continues() {
        let code = run_files(&[PathBuf::from("/nonexistent/path/to/a/script.monkey")]);
        assert_eq!(code, 1);
    }
}
