// ABOUTME: Process-level error types — failures the evaluator cannot turn
// ABOUTME: into an ordinary runtime Value::Error because there is no call
// ABOUTME: frame left to hand one to

use std::path::PathBuf;
use thiserror::Error;

/// Conditions fatal to the whole process, as opposed to a language-level
/// runtime error (spec.md §7), which is represented as `Value::Error` data
/// and handled entirely inside the evaluator.
#[derive(Error, Debug)]
pub enum InterpreterError {
    #[error("could not read {path}: {source}", path = path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read REPL history at {path}: {source}", path = path.display())]
    HistoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `unquote` calls a macro that expands to something other than an AST
    /// node (spec.md §6.2). This can only happen when a macro body itself
    /// misuses `quote`/`unquote`, not from ordinary evaluation mistakes, so
    /// it is treated as a fatal condition rather than a recoverable
    /// `Value::Error`.
    #[error("macro expansion did not produce a quoted AST node: {0}")]
    MacroExpansionNotQuote(String),
}
